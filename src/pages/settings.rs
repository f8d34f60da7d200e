//! System configuration endpoints (administrators only)

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::{BackupInfo, SystemConfiguration, SystemConfigurationForm},
    AppState,
};

/// Current system configuration
#[utoipa::path(
    get,
    path = "/console/settings",
    tag = "settings",
    responses(
        (status = 200, description = "Configuration", body = SystemConfiguration),
        (status = 403, description = "Administrator only", body = crate::error::ErrorResponse)
    )
)]
pub async fn configuration(State(state): State<AppState>) -> AppResult<Json<SystemConfiguration>> {
    Ok(Json(state.console.configuration().await?))
}

/// Update system configuration
#[utoipa::path(
    put,
    path = "/console/settings",
    tag = "settings",
    request_body = SystemConfigurationForm,
    responses(
        (status = 200, description = "Configuration updated", body = SystemConfiguration),
        (status = 403, description = "Administrator only", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid configuration", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_configuration(
    State(state): State<AppState>,
    Json(form): Json<SystemConfigurationForm>,
) -> AppResult<Json<SystemConfiguration>> {
    Ok(Json(state.console.update_configuration(&form).await?))
}

/// Existing backups
#[utoipa::path(
    get,
    path = "/console/settings/backups",
    tag = "settings",
    responses(
        (status = 200, description = "Backups", body = Vec<BackupInfo>),
        (status = 403, description = "Administrator only", body = crate::error::ErrorResponse)
    )
)]
pub async fn backups(State(state): State<AppState>) -> AppResult<Json<Vec<BackupInfo>>> {
    Ok(Json(state.console.backups().await?))
}

/// Start a new backup
#[utoipa::path(
    post,
    path = "/console/settings/backups",
    tag = "settings",
    responses(
        (status = 201, description = "Backup created", body = BackupInfo),
        (status = 403, description = "Administrator only", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_backup(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<BackupInfo>)> {
    let backup = state.console.create_backup().await?;
    Ok((StatusCode::CREATED, Json(backup)))
}
