//! Reports screen

use chrono::Utc;

use super::Console;
use crate::{
    error::AppResult,
    reports::{self, ReportData, ReportInputs, ReportWindow},
};

/// Title used on printed reports when the configuration cannot be read.
pub const DEFAULT_LIBRARY_NAME: &str = "Yeti Library";

impl Console {
    /// Reload every collection the report needs and aggregate them.
    pub async fn report(&self, window: ReportWindow) -> AppResult<ReportData> {
        self.session.user().await?.require_staff()?;

        // Every load runs to completion so no page is left in `loading`.
        let (loans, books, users, copies, authors, publishers) = tokio::join!(
            self.loans.load(),
            self.books.load(),
            self.users.load(),
            self.copies.load(),
            self.authors.load(),
            self.publishers.load(),
        );
        let (loans, books, users) = (loans?, books?, users?);
        let (copies, authors, publishers) = (copies?, authors?, publishers?);

        let inputs = ReportInputs {
            loans: &loans,
            books: &books,
            users: &users,
            copies: &copies,
            authors: &authors,
            publishers: &publishers,
        };
        let report = reports::aggregate(&inputs, window, Utc::now());
        tracing::info!(
            "Report over {} days: {} loans, {} overdue",
            window.days(),
            report.totals.loans_in_window,
            report.overdue_loans.len()
        );
        Ok(report)
    }

    /// Printable HTML version of [`Console::report`].
    pub async fn printable_report(&self, window: ReportWindow) -> AppResult<String> {
        let report = self.report(window).await?;
        let library_name = match self.account.configuration().await {
            Ok(config) => config.library_name,
            Err(e) => {
                tracing::debug!("Library name unavailable for report: {}", e);
                DEFAULT_LIBRARY_NAME.to_string()
            }
        };
        Ok(reports::render_html(&report, &library_name))
    }
}
