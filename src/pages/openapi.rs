//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::pages::{account, health, reports, resources, settings};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Yeti Admin Console API",
        version = "1.0.0",
        description = "Administration console of the Yeti library management system"
    ),
    paths(
        // Health
        health::health_check,
        // Auth
        account::login,
        account::logout,
        account::profile,
        account::update_profile,
        // Dashboard
        account::dashboard,
        // Loans
        resources::return_loan,
        resources::renew_loan,
        // Reports
        reports::report,
        reports::print,
        // Settings
        settings::configuration,
        settings::update_configuration,
        settings::backups,
        settings::create_backup,
    ),
    components(
        schemas(
            health::HealthResponse,
            crate::models::LoginForm,
            crate::models::ProfileForm,
            crate::models::SessionUser,
            crate::models::Role,
            crate::models::DashboardSummary,
            crate::models::Loan,
            crate::models::LoanStatus,
            crate::models::SystemConfiguration,
            crate::models::SystemConfigurationForm,
            crate::models::BackupInfo,
            crate::reports::ReportData,
            crate::reports::ReportTotals,
            crate::reports::RankedEntry,
            crate::reports::OverdueEntry,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check"),
        (name = "auth", description = "Console session and profile"),
        (name = "dashboard", description = "Dashboard"),
        (name = "loans", description = "Loan actions"),
        (name = "reports", description = "Activity reports"),
        (name = "settings", description = "System configuration")
    )
)]
pub struct ApiDoc;

pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
