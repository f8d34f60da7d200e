//! Library activity reports
//!
//! [`aggregate`] turns loaded collections into a [`ReportData`];
//! [`render`] turns a `ReportData` into a printable HTML document.

pub mod aggregate;
pub mod render;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

pub use aggregate::{aggregate, ReportInputs};
pub use render::render_html;

/// Rankings are cut to this many entries.
pub const TOP_N: usize = 10;

/// Trailing loan window selectable on the reports page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ReportWindow {
    Week,
    Month,
    Quarter,
}

impl ReportWindow {
    pub fn days(&self) -> u32 {
        match self {
            ReportWindow::Week => 7,
            ReportWindow::Month => 30,
            ReportWindow::Quarter => 90,
        }
    }
}

impl TryFrom<u32> for ReportWindow {
    type Error = AppError;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        match days {
            7 => Ok(ReportWindow::Week),
            30 => Ok(ReportWindow::Month),
            90 => Ok(ReportWindow::Quarter),
            other => Err(AppError::BadRequest(format!(
                "Report window must be 7, 30 or 90 days, got {}",
                other
            ))),
        }
    }
}

impl From<ReportWindow> for u32 {
    fn from(w: ReportWindow) -> Self {
        w.days()
    }
}

/// Label with its occurrence count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RankedEntry {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OverdueEntry {
    pub loan_id: i32,
    pub book_title: String,
    pub user_name: String,
    pub due_date: DateTime<Utc>,
    pub days_overdue: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ReportTotals {
    pub books: usize,
    pub users: usize,
    pub copies: usize,
    pub active_loans: usize,
    pub loans_in_window: usize,
}

/// Everything the reports page shows, independent of markup
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ReportData {
    pub generated_at: DateTime<Utc>,
    #[schema(value_type = u32)]
    pub window: ReportWindow,
    pub totals: ReportTotals,
    pub most_borrowed_books: Vec<RankedEntry>,
    pub most_active_users: Vec<RankedEntry>,
    pub overdue_loans: Vec<OverdueEntry>,
    pub copies_by_condition: Vec<RankedEntry>,
    pub books_by_publisher: Vec<RankedEntry>,
    pub books_by_author: Vec<RankedEntry>,
}
