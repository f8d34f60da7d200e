//! Management page endpoints shared by every entity
//!
//! The same handlers serve books, authors, publishers, copies, loans, employees
//! and users; [`ManagedEntity`] picks the page out of the console.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;

use super::ConsoleUser;
use crate::{
    controller::{ModalState, PageView},
    error::AppResult,
    listing::ListQuery,
    models::Loan,
    services::ManagedEntity,
    validation::FieldErrors,
    AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

pub fn routes<E: ManagedEntity>() -> Router<AppState> {
    Router::new()
        .route("/", get(list::<E>))
        .route("/refresh", post(refresh::<E>))
        .route("/banner", delete(dismiss_banner::<E>))
        .route("/modal", delete(close_modal::<E>))
        .route("/modal/create", post(open_create::<E>))
        .route("/modal/edit/:id", post(open_edit::<E>))
        .route("/modal/form", put(update_form::<E>))
        .route("/modal/submit", post(submit::<E>))
        .route("/:id", delete(remove::<E>))
        .route("/:id/toggle-status", post(toggle_status::<E>))
}

/// Filtered, sorted and paginated page view. Loads the collection on first use.
pub async fn list<E: ManagedEntity>(
    State(state): State<AppState>,
    ConsoleUser(_user): ConsoleUser,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<PageView<E>>> {
    let page = E::page(&state.console);
    page.mount().await;

    let query = list_query(&state, &params);
    let lookups = state.console.lookups().await;
    Ok(Json(page.view(&query, &lookups).await))
}

/// Reload the list, then answer with the view the query asks for.
pub async fn refresh<E: ManagedEntity>(
    State(state): State<AppState>,
    ConsoleUser(_user): ConsoleUser,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<PageView<E>>> {
    let page = E::page(&state.console);
    page.refresh().await;

    let query = list_query(&state, &params);
    let lookups = state.console.lookups().await;
    Ok(Json(page.view(&query, &lookups).await))
}

fn list_query(state: &AppState, params: &HashMap<String, String>) -> ListQuery {
    let mut query = ListQuery::from_params(params);
    if query.per_page.is_none() {
        query.per_page = Some(state.console.defaults().default_page_size);
    }
    query
}

pub async fn open_create<E: ManagedEntity>(
    State(state): State<AppState>,
    ConsoleUser(_user): ConsoleUser,
) -> AppResult<Json<ModalState<E::Form>>> {
    Ok(Json(E::page(&state.console).open_create().await?))
}

pub async fn open_edit<E: ManagedEntity>(
    State(state): State<AppState>,
    ConsoleUser(_user): ConsoleUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ModalState<E::Form>>> {
    Ok(Json(E::page(&state.console).open_edit(id).await?))
}

/// Replace the form in the open modal; answers with its current field errors.
pub async fn update_form<E: ManagedEntity>(
    State(state): State<AppState>,
    ConsoleUser(_user): ConsoleUser,
    Json(form): Json<E::Form>,
) -> AppResult<Json<FieldErrors>> {
    Ok(Json(E::page(&state.console).update_form(form).await?))
}

pub async fn submit<E: ManagedEntity>(
    State(state): State<AppState>,
    ConsoleUser(user): ConsoleUser,
) -> AppResult<Json<E>> {
    let saved = E::page(&state.console).submit().await?;
    tracing::info!("{} saved {} #{}", user.name, E::RESOURCE, saved.id());
    Ok(Json(saved))
}

pub async fn close_modal<E: ManagedEntity>(
    State(state): State<AppState>,
    ConsoleUser(_user): ConsoleUser,
) -> AppResult<StatusCode> {
    E::page(&state.console).close_modal().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a record; `?confirm=true` is mandatory.
pub async fn remove<E: ManagedEntity>(
    State(state): State<AppState>,
    ConsoleUser(user): ConsoleUser,
    Path(id): Path<i32>,
    Query(query): Query<DeleteQuery>,
) -> AppResult<StatusCode> {
    E::page(&state.console).delete(id, query.confirm).await?;
    tracing::info!("{} deleted {} #{}", user.name, E::RESOURCE, id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_status<E: ManagedEntity>(
    State(state): State<AppState>,
    ConsoleUser(_user): ConsoleUser,
    Path(id): Path<i32>,
) -> AppResult<Json<E>> {
    Ok(Json(E::page(&state.console).toggle_status(id).await?))
}

pub async fn dismiss_banner<E: ManagedEntity>(
    State(state): State<AppState>,
    ConsoleUser(_user): ConsoleUser,
) -> StatusCode {
    E::page(&state.console).dismiss_banner().await;
    StatusCode::NO_CONTENT
}

/// Return a borrowed copy
#[utoipa::path(
    post,
    path = "/console/loans/{id}/return",
    tag = "loans",
    params(("id" = i32, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan returned", body = Loan),
        (status = 401, description = "No session", body = crate::error::ErrorResponse),
        (status = 404, description = "Loan not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_loan(
    State(state): State<AppState>,
    ConsoleUser(_user): ConsoleUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Loan>> {
    Ok(Json(state.console.return_loan(id).await?))
}

/// Renew a loan
#[utoipa::path(
    post,
    path = "/console/loans/{id}/renew",
    tag = "loans",
    params(("id" = i32, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan renewed", body = Loan),
        (status = 401, description = "No session", body = crate::error::ErrorResponse),
        (status = 400, description = "Renewal refused by the backend", body = crate::error::ErrorResponse)
    )
)]
pub async fn renew_loan(
    State(state): State<AppState>,
    ConsoleUser(_user): ConsoleUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Loan>> {
    Ok(Json(state.console.renew_loan(id).await?))
}
