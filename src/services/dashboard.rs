//! Dashboard summary

use super::Console;
use crate::{error::AppResult, models::DashboardSummary};

impl Console {
    pub async fn dashboard(&self) -> AppResult<DashboardSummary> {
        self.session.user().await?.require_staff()?;
        let summary = self.account.dashboard().await.map_err(|e| {
            tracing::warn!("Loading dashboard failed: {}", e);
            e
        })?;
        tracing::debug!(
            "Dashboard: {} books, {} active loans, {} overdue",
            summary.total_books,
            summary.active_loans,
            summary.overdue_loans
        );
        Ok(summary)
    }
}
