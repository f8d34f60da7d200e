//! Console HTTP endpoints, one group per page

pub mod account;
pub mod health;
pub mod openapi;
pub mod reports;
pub mod resources;
pub mod settings;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::AppError,
    models::{Author, Book, BookCopy, Employee, Loan, Publisher, SessionUser, User},
    AppState,
};

/// Operator of the console session, admin or staff.
pub struct ConsoleUser(pub SessionUser);

#[async_trait]
impl FromRequestParts<AppState> for ConsoleUser {
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = state.console.session().user().await?;
        user.require_staff()?;
        Ok(ConsoleUser(user))
    }
}

/// The console application: every route plus request tracing, and CORS for
/// the configured origins only.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.allowed_origins);
    let app = router(state).layer(TraceLayer::new_for_http());
    match cors {
        Some(cors) => app.layer(cors),
        None => app,
    }
}

/// CORS policy for the listed origins; `None` when no origin is usable.
pub fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();
    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE]),
    )
}

/// Every console route, without the HTTP layers.
pub fn router(state: AppState) -> Router {
    let console = Router::new()
        .route("/login", post(account::login))
        .route("/logout", post(account::logout))
        .route("/profile", get(account::profile).put(account::update_profile))
        .route("/dashboard", get(account::dashboard))
        .route("/reports", get(reports::report))
        .route("/reports/print", get(reports::print))
        .route(
            "/settings",
            get(settings::configuration).put(settings::update_configuration),
        )
        .route(
            "/settings/backups",
            get(settings::backups).post(settings::create_backup),
        )
        .nest("/books", resources::routes::<Book>())
        .nest("/authors", resources::routes::<Author>())
        .nest("/publishers", resources::routes::<Publisher>())
        .nest("/copies", resources::routes::<BookCopy>())
        .nest(
            "/loans",
            resources::routes::<Loan>()
                .route("/:id/return", post(resources::return_loan))
                .route("/:id/renew", post(resources::renew_loan)),
        )
        .nest("/employees", resources::routes::<Employee>())
        .nest("/users", resources::routes::<User>());

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/console", console)
        .with_state(state)
        .merge(openapi::create_openapi_router())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_needs_configured_origins() {
        assert!(cors_layer(&[]).is_none());
        assert!(cors_layer(&["bad\norigin".to_string()]).is_none());
        assert!(cors_layer(&["http://localhost:5173".to_string()]).is_some());
    }
}
