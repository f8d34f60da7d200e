//! Reports page endpoints

use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::ConsoleUser;
use crate::{
    error::AppResult,
    reports::{ReportData, ReportWindow},
    AppState,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    /// Trailing window in days: 7, 30 or 90
    pub days: Option<u32>,
}

impl ReportQuery {
    fn window(&self, state: &AppState) -> AppResult<ReportWindow> {
        let days = self
            .days
            .unwrap_or(state.console.defaults().default_report_days);
        ReportWindow::try_from(days)
    }
}

/// Aggregated loan activity
#[utoipa::path(
    get,
    path = "/console/reports",
    tag = "reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Report data", body = ReportData),
        (status = 400, description = "Unsupported window", body = crate::error::ErrorResponse),
        (status = 401, description = "No session", body = crate::error::ErrorResponse)
    )
)]
pub async fn report(
    State(state): State<AppState>,
    ConsoleUser(_user): ConsoleUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<ReportData>> {
    let window = query.window(&state)?;
    Ok(Json(state.console.report(window).await?))
}

/// Printable, self-contained HTML report
#[utoipa::path(
    get,
    path = "/console/reports/print",
    tag = "reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "HTML document", content_type = "text/html", body = String),
        (status = 400, description = "Unsupported window", body = crate::error::ErrorResponse)
    )
)]
pub async fn print(
    State(state): State<AppState>,
    ConsoleUser(_user): ConsoleUser,
    Query(query): Query<ReportQuery>,
) -> AppResult<Html<String>> {
    let window = query.window(&state)?;
    Ok(Html(state.console.printable_report(window).await?))
}
