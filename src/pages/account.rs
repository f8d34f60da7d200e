//! Login, logout, own profile and dashboard endpoints

use axum::{extract::State, http::StatusCode, Json};

use super::ConsoleUser;
use crate::{
    error::AppResult,
    models::{DashboardSummary, LoginForm, ProfileForm, SessionUser},
    AppState,
};

/// Open the console session
#[utoipa::path(
    post,
    path = "/console/login",
    tag = "auth",
    request_body = LoginForm,
    responses(
        (status = 200, description = "Logged in", body = SessionUser),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse),
        (status = 403, description = "Account may not use the console", body = crate::error::ErrorResponse),
        (status = 422, description = "Missing username or password", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(form): Json<LoginForm>,
) -> AppResult<Json<SessionUser>> {
    Ok(Json(state.console.login(&form).await?))
}

/// Close the console session
#[utoipa::path(
    post,
    path = "/console/logout",
    tag = "auth",
    responses((status = 204, description = "Logged out"))
)]
pub async fn logout(State(state): State<AppState>) -> AppResult<StatusCode> {
    state.console.logout().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Current operator
#[utoipa::path(
    get,
    path = "/console/profile",
    tag = "auth",
    responses(
        (status = 200, description = "Operator identity", body = SessionUser),
        (status = 401, description = "No session", body = crate::error::ErrorResponse)
    )
)]
pub async fn profile(State(state): State<AppState>) -> AppResult<Json<SessionUser>> {
    Ok(Json(state.console.profile().await?))
}

/// Update own name, email, phone or password
#[utoipa::path(
    put,
    path = "/console/profile",
    tag = "auth",
    request_body = ProfileForm,
    responses(
        (status = 200, description = "Profile updated", body = SessionUser),
        (status = 401, description = "No session", body = crate::error::ErrorResponse),
        (status = 422, description = "Invalid profile", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Json(form): Json<ProfileForm>,
) -> AppResult<Json<SessionUser>> {
    Ok(Json(state.console.update_profile(&form).await?))
}

/// Library-wide counters and recent loans
#[utoipa::path(
    get,
    path = "/console/dashboard",
    tag = "dashboard",
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardSummary),
        (status = 401, description = "No session", body = crate::error::ErrorResponse)
    )
)]
pub async fn dashboard(
    State(state): State<AppState>,
    ConsoleUser(_user): ConsoleUser,
) -> AppResult<Json<DashboardSummary>> {
    Ok(Json(state.console.dashboard().await?))
}
