//! Error types for the Yeti admin console

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::validation::FieldErrors;

/// Console error codes returned in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthenticated = 2,
    NotAuthorized = 3,
    NoSuchData = 4,
    BadValue = 5,
    Busy = 6,
    ConfirmationRequired = 7,
    BackendFailure = 8,
    BackendUnreachable = 9,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Confirmation required: {0}")]
    ConfirmationRequired(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Message shown to the operator in a banner or alert.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Authentication(_) => {
                "Session expired or missing, please log in again".to_string()
            }
            AppError::Authorization(_) => "Access denied".to_string(),
            AppError::Server { .. } => {
                "The server encountered an error, please try again later".to_string()
            }
            AppError::Validation(errors) => {
                format!("Please correct the highlighted fields ({})", errors.len())
            }
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Conflict(msg)
            | AppError::ConfirmationRequired(msg) => msg.clone(),
            AppError::Network(msg) | AppError::Internal(msg) => {
                format!("Something went wrong: {}", msg)
            }
        }
    }

    fn status_and_code(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::Authentication(_) => (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthenticated),
            AppError::Authorization(_) => (StatusCode::FORBIDDEN, ErrorCode::NotAuthorized),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchData),
            AppError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::BadValue),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, ErrorCode::BadValue),
            AppError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::Busy),
            AppError::ConfirmationRequired(_) => {
                (StatusCode::PRECONDITION_REQUIRED, ErrorCode::ConfirmationRequired)
            }
            AppError::Server { .. } => (StatusCode::BAD_GATEWAY, ErrorCode::BackendFailure),
            AppError::Network(_) => (StatusCode::BAD_GATEWAY, ErrorCode::BackendUnreachable),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Failure),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AppError::Internal(format!("Unexpected response from backend: {}", e))
        } else {
            AppError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    /// Per-field messages for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub fields: Option<FieldErrors>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        match &self {
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            AppError::Server { status, message } => {
                tracing::error!("Backend error {}: {}", status, message)
            }
            AppError::Network(msg) => tracing::warn!("Backend unreachable: {}", msg),
            _ => tracing::debug!("Request failed: {}", self),
        }

        let message = self.user_message();
        let fields = match self {
            AppError::Validation(errors) => Some(errors),
            _ => None,
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            fields,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
