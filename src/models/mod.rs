//! Data models mirrored from the library backend

pub mod author;
pub mod book;
pub mod copy;
pub mod dashboard;
pub mod employee;
pub mod loan;
pub mod publisher;
pub mod settings;
pub mod user;

use serde::{de::DeserializeOwned, Serialize};

use crate::{listing::Listable, validation::FormValidator};

// Re-export commonly used types
pub use author::{Author, AuthorForm};
pub use book::{Book, BookForm};
pub use copy::{BookCopy, CopyCondition, CopyForm};
pub use dashboard::DashboardSummary;
pub use employee::{Employee, EmployeeForm};
pub use loan::{Loan, LoanForm, LoanStatus};
pub use publisher::{Publisher, PublisherForm};
pub use settings::{BackupInfo, SystemConfiguration, SystemConfigurationForm};
pub use user::{LoginForm, ProfileForm, Role, SessionUser, User, UserForm};

/// Kind of record a foreign key points to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefKind {
    Author,
    Publisher,
    Book,
    Copy,
    User,
}

impl RefKind {
    /// Key under which the resolved name is shown next to a row.
    pub fn label(&self) -> &'static str {
        match self {
            RefKind::Author => "author",
            RefKind::Publisher => "publisher",
            RefKind::Book => "book",
            RefKind::Copy => "copy",
            RefKind::User => "user",
        }
    }
}

/// A server-owned record managed by one console page.
pub trait Entity:
    Listable + Clone + Serialize + DeserializeOwned + Send + Sync + std::fmt::Debug + 'static
{
    /// Backend collection path, also used as the console page path.
    const RESOURCE: &'static str;

    /// Create/update payload edited in the page modal.
    type Form: FormValidator
        + Clone
        + Default
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + std::fmt::Debug
        + 'static;

    fn id(&self) -> i32;

    /// Human readable name used when other pages reference this record.
    fn display_name(&self) -> String;

    /// Form prefilled from this record, for the edit modal.
    fn to_form(&self) -> Self::Form;

    /// Foreign keys to resolve for display.
    fn references(&self) -> Vec<(RefKind, i32)> {
        Vec::new()
    }
}
