//! Dashboard aggregate computed by the backend

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::loan::Loan;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummary {
    pub total_books: i64,
    pub total_users: i64,
    pub active_loans: i64,
    pub overdue_loans: i64,
    #[serde(default)]
    pub total_copies: i64,
    #[serde(default)]
    pub available_copies: i64,
    #[serde(default)]
    pub recent_loans: Vec<Loan>,
}
