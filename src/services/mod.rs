//! Console services: the pages and the screens built on top of them

pub mod auth;
pub mod dashboard;
pub mod reports;
pub mod settings;

use std::sync::Arc;

use crate::{
    client::{AccountApi, ApiClient, LoanActions, ResourceApi},
    config::ConsoleConfig,
    controller::{Lookups, Page},
    error::AppResult,
    models::{Author, Book, BookCopy, Employee, Entity, Loan, Publisher, RefKind, User},
    session::SessionContext,
};

/// Remote APIs the console talks to
#[derive(Clone)]
pub struct Backends {
    pub account: Arc<dyn AccountApi>,
    pub loan_actions: Arc<dyn LoanActions>,
    pub books: Arc<dyn ResourceApi<Book>>,
    pub authors: Arc<dyn ResourceApi<Author>>,
    pub publishers: Arc<dyn ResourceApi<Publisher>>,
    pub copies: Arc<dyn ResourceApi<BookCopy>>,
    pub loans: Arc<dyn ResourceApi<Loan>>,
    pub employees: Arc<dyn ResourceApi<Employee>>,
    pub users: Arc<dyn ResourceApi<User>>,
}

impl Backends {
    /// Every API served by one REST client.
    pub fn from_client(client: ApiClient) -> Self {
        let client = Arc::new(client);
        Self {
            account: client.clone(),
            loan_actions: client.clone(),
            books: client.clone(),
            authors: client.clone(),
            publishers: client.clone(),
            copies: client.clone(),
            loans: client.clone(),
            employees: client.clone(),
            users: client,
        }
    }
}

/// Container for every page of the console
pub struct Console {
    session: SessionContext,
    account: Arc<dyn AccountApi>,
    loan_actions: Arc<dyn LoanActions>,
    defaults: ConsoleConfig,
    pub books: Page<Book>,
    pub authors: Page<Author>,
    pub publishers: Page<Publisher>,
    pub copies: Page<BookCopy>,
    pub loans: Page<Loan>,
    pub employees: Page<Employee>,
    pub users: Page<User>,
}

impl Console {
    pub fn new(backends: Backends, session: SessionContext, defaults: ConsoleConfig) -> Self {
        Self {
            session,
            account: backends.account,
            loan_actions: backends.loan_actions,
            defaults,
            books: Page::new(backends.books),
            authors: Page::new(backends.authors),
            publishers: Page::new(backends.publishers),
            copies: Page::new(backends.copies),
            loans: Page::new(backends.loans),
            employees: Page::new(backends.employees),
            users: Page::new(backends.users),
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn defaults(&self) -> &ConsoleConfig {
        &self.defaults
    }

    /// Display names from every snapshot loaded so far.
    pub async fn lookups(&self) -> Lookups {
        let mut lookups = Lookups::default();
        lookups.insert(RefKind::Author, &self.authors.snapshot().await);
        lookups.insert(RefKind::Publisher, &self.publishers.snapshot().await);
        lookups.insert(RefKind::Book, &self.books.snapshot().await);
        lookups.insert(RefKind::Copy, &self.copies.snapshot().await);
        lookups.insert(RefKind::User, &self.users.snapshot().await);
        lookups
    }

    /// Mark a loan as returned, then reload the loans page.
    pub async fn return_loan(&self, id: i32) -> AppResult<Loan> {
        tracing::info!("Returning loan {}", id);
        self.loans
            .mutate("return", self.loan_actions.return_loan(id))
            .await
    }

    /// Extend a loan, then reload the loans page.
    pub async fn renew_loan(&self, id: i32) -> AppResult<Loan> {
        tracing::info!("Renewing loan {}", id);
        self.loans
            .mutate("renew", self.loan_actions.renew_loan(id))
            .await
    }
}

/// An entity with its own management page on the console.
pub trait ManagedEntity: Entity {
    fn page(console: &Console) -> &Page<Self>;
}

macro_rules! managed {
    ($($entity:ty => $field:ident),* $(,)?) => {
        $(
            impl ManagedEntity for $entity {
                fn page(console: &Console) -> &Page<Self> {
                    &console.$field
                }
            }
        )*
    };
}

managed! {
    Book => books,
    Author => authors,
    Publisher => publishers,
    BookCopy => copies,
    Loan => loans,
    Employee => employees,
    User => users,
}
