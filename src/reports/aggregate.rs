//! Report aggregation over already-loaded collections

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;

use super::{OverdueEntry, RankedEntry, ReportData, ReportTotals, ReportWindow, TOP_N};
use crate::models::{Author, Book, BookCopy, Loan, LoanStatus, Publisher, User};

/// Collections the report is computed from
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportInputs<'a> {
    pub loans: &'a [Loan],
    pub books: &'a [Book],
    pub users: &'a [User],
    pub copies: &'a [BookCopy],
    pub authors: &'a [Author],
    pub publishers: &'a [Publisher],
}

/// Count labels, most frequent first. Ties keep first-seen order.
pub fn rank<I>(labels: I, limit: Option<usize>) -> Vec<RankedEntry>
where
    I: IntoIterator<Item = String>,
{
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }

    let mut ranked: Vec<RankedEntry> = counts
        .into_iter()
        .map(|(label, count)| RankedEntry { label, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    ranked
}

/// Whether `loan` started within the trailing window ending at `now`.
pub fn in_window(loan: &Loan, window: ReportWindow, now: DateTime<Utc>) -> bool {
    let start = now - Duration::days(window.days().into());
    loan.loan_date >= start && loan.loan_date <= now
}

struct Resolver<'a> {
    book_titles: HashMap<i32, &'a str>,
    copy_books: HashMap<i32, i32>,
    user_names: HashMap<i32, &'a str>,
}

impl<'a> Resolver<'a> {
    fn new(inputs: &ReportInputs<'a>) -> Self {
        Self {
            book_titles: inputs.books.iter().map(|b| (b.id, b.title.as_str())).collect(),
            copy_books: inputs.copies.iter().map(|c| (c.id, c.book_id)).collect(),
            user_names: inputs.users.iter().map(|u| (u.id, u.name.as_str())).collect(),
        }
    }

    fn book_title(&self, loan: &Loan) -> String {
        if let Some(title) = loan.book_title.as_deref().filter(|t| !t.is_empty()) {
            return title.to_string();
        }
        self.copy_books
            .get(&loan.copy_id)
            .and_then(|book_id| self.book_titles.get(book_id))
            .map(|t| t.to_string())
            .unwrap_or_else(|| "Unknown book".to_string())
    }

    fn user_name(&self, loan: &Loan) -> String {
        if let Some(name) = loan.user_name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        self.user_names
            .get(&loan.user_id)
            .map(|n| n.to_string())
            .unwrap_or_else(|| format!("User #{}", loan.user_id))
    }
}

/// Compute the report for `window` as of `now`.
pub fn aggregate(inputs: &ReportInputs<'_>, window: ReportWindow, now: DateTime<Utc>) -> ReportData {
    let resolver = Resolver::new(inputs);

    let recent: Vec<&Loan> = inputs
        .loans
        .iter()
        .filter(|loan| in_window(loan, window, now))
        .collect();

    let most_borrowed_books = rank(recent.iter().map(|l| resolver.book_title(l)), Some(TOP_N));
    let most_active_users = rank(recent.iter().map(|l| resolver.user_name(l)), Some(TOP_N));

    let overdue_loans = inputs
        .loans
        .iter()
        .filter(|loan| loan.is_overdue_active())
        .map(|loan| OverdueEntry {
            loan_id: loan.id,
            book_title: resolver.book_title(loan),
            user_name: resolver.user_name(loan),
            due_date: loan.due_date,
            days_overdue: (now - loan.due_date).num_days().max(0),
        })
        .collect();

    let copies_by_condition = rank(
        inputs.copies.iter().map(|c| c.condition.to_string()),
        None,
    );

    let publisher_names: HashMap<i32, &str> = inputs
        .publishers
        .iter()
        .map(|p| (p.id, p.name.as_str()))
        .collect();
    let books_by_publisher = rank(
        inputs.books.iter().map(|b| {
            publisher_names
                .get(&b.publisher_id)
                .map(|n| n.to_string())
                .unwrap_or_else(|| "Unknown publisher".to_string())
        }),
        None,
    );

    let author_names: HashMap<i32, String> = inputs
        .authors
        .iter()
        .map(|a| (a.id, a.full_name()))
        .collect();
    let books_by_author = rank(
        inputs.books.iter().map(|b| {
            author_names
                .get(&b.author_id)
                .cloned()
                .unwrap_or_else(|| "Unknown author".to_string())
        }),
        Some(TOP_N),
    );

    let totals = ReportTotals {
        books: inputs.books.len(),
        users: inputs.users.len(),
        copies: inputs.copies.len(),
        active_loans: inputs
            .loans
            .iter()
            .filter(|l| l.status == LoanStatus::Active)
            .count(),
        loans_in_window: recent.len(),
    };

    ReportData {
        generated_at: now,
        window,
        totals,
        most_borrowed_books,
        most_active_users,
        overdue_loans,
        copies_by_condition,
        books_by_publisher,
        books_by_author,
    }
}
