//! Console integration tests
//!
//! Each test starts a small in-process stand-in for the library backend on an
//! ephemeral port and drives the console router with `oneshot` requests.

use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use yeti_admin::{
    client::ApiClient,
    config::{AppConfig, BackendConfig},
    pages,
    services::{Backends, Console},
    session::SessionContext,
    AppState,
};

const TOKEN: &str = "test-token";

#[derive(Default)]
struct FakeBackend {
    books: Vec<Value>,
    loans: Vec<Value>,
    /// Number of upcoming book list calls that fail with 503
    list_failures: usize,
}

type Shared = Arc<Mutex<FakeBackend>>;

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(&format!("Bearer {}", TOKEN)[..])
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Missing token" })),
    )
        .into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    let role = match body["username"].as_str() {
        Some("reader") => "reader",
        _ => "admin",
    };
    if body["password"] != "secret" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
            .into_response();
    }
    Json(json!({
        "token": TOKEN,
        "user": { "id": 1, "name": "Maya", "email": "maya@yeti.org", "role": role }
    }))
    .into_response()
}

async fn list_books(State(backend): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut backend = backend.lock().unwrap();
    if backend.list_failures > 0 {
        backend.list_failures -= 1;
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "database unavailable" })),
        )
            .into_response();
    }
    Json(Value::Array(backend.books.clone())).into_response()
}

async fn create_book(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Json(form): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut backend = backend.lock().unwrap();
    let book = json!({
        "id": backend.books.len() + 1,
        "title": form["title"],
        "isbn": form["isbn"],
        "author_id": form["author_id"],
        "publisher_id": form["publisher_id"],
        "is_active": true
    });
    backend.books.push(book.clone());
    (StatusCode::CREATED, Json(book)).into_response()
}

async fn list_loans(State(backend): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(Value::Array(backend.lock().unwrap().loans.clone())).into_response()
}

async fn loan_action(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Path((id, action)): Path<(i64, String)>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut backend = backend.lock().unwrap();
    let Some(loan) = backend.loans.iter_mut().find(|l| l["id"] == id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": format!("Loan {} not found", id) })),
        )
            .into_response();
    };
    if loan["status"] == "returned" {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": format!("Loan {} is already returned", id) })),
        )
            .into_response();
    }
    match action.as_str() {
        "return" => {
            loan["status"] = json!("returned");
            loan["return_date"] = json!("2026-03-10T10:00:00Z");
        }
        "renew" => {
            let renewals = loan["renewals"].as_i64().unwrap_or(0);
            loan["renewals"] = json!(renewals + 1);
            loan["due_date"] = json!("2026-03-29T10:00:00Z");
        }
        _ => return StatusCode::NOT_FOUND.into_response(),
    }
    Json(loan.clone()).into_response()
}

async fn dashboard(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "total_books": 42,
        "total_users": 17,
        "active_loans": 5,
        "overdue_loans": 1
    }))
    .into_response()
}

async fn empty_list(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!([])).into_response()
}

async fn configuration(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "library_name": "Yeti Public Library",
        "contact_email": "desk@yeti.org",
        "loan_duration_days": 14,
        "max_renewals": 2,
        "max_loans_per_user": 5,
        "fine_per_day": "0.25",
        "email_notifications": true
    }))
    .into_response()
}

/// Start the fake backend and return its base URL.
async fn spawn_backend(backend: Shared) -> String {
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/books", get(list_books).post(create_book))
        .route("/api/configuration", get(configuration))
        .route("/api/dashboard/summary", get(dashboard))
        .route("/api/loans", get(list_loans))
        .route("/api/loans/:id/:action", post(loan_action))
        .route("/api/:resource", get(empty_list))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", addr)
}

async fn console_app(backend: Shared) -> Router {
    console_app_with_origins(backend, Vec::new()).await
}

async fn console_app_with_origins(backend: Shared, allowed_origins: Vec<String>) -> Router {
    let mut config = AppConfig::default();
    config.server.allowed_origins = allowed_origins;
    config.backend = BackendConfig {
        url: spawn_backend(backend).await,
        timeout_secs: 5,
    };

    let session = SessionContext::in_memory();
    let client = ApiClient::new(&config.backend, session.clone()).unwrap();
    let console = Console::new(
        Backends::from_client(client),
        session,
        config.console.clone(),
    );

    pages::app(AppState {
        config: Arc::new(config),
        console: Arc::new(console),
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send_raw(app, method, uri, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn send_raw(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(match body {
            Some(v) => Body::from(v.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

/// GET with an `Origin` header; answers the status and the allowed origin.
async fn get_from_origin(app: &Router, uri: &str, origin: &str) -> (StatusCode, Option<String>) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::ORIGIN, origin)
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let allowed = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .map(|v| v.to_str().unwrap().to_string());
    (response.status(), allowed)
}

fn loan(id: i64) -> Value {
    json!({
        "id": id,
        "user_id": 3,
        "copy_id": 9,
        "loan_date": "2026-03-01T10:00:00Z",
        "due_date": "2026-03-15T10:00:00Z",
        "status": "active",
        "renewals": 0
    })
}

async fn log_in(app: &Router) {
    let (status, _) = send(
        app,
        "POST",
        "/console/login",
        Some(json!({ "username": "maya", "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_check() {
    let app = console_app(Shared::default()).await;

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_pages_require_session() {
    let app = console_app(Shared::default()).await;

    let (status, body) = send(&app, "GET", "/console/books", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 2);
    assert_eq!(body["message"], "Session expired or missing, please log in again");
}

#[tokio::test]
async fn test_login_validation_and_credentials() {
    let app = console_app(Shared::default()).await;

    let (status, body) = send(
        &app,
        "POST",
        "/console/login",
        Some(json!({ "username": "", "password": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["username"].is_string());

    let (status, _) = send(
        &app,
        "POST",
        "/console/login",
        Some(json!({ "username": "maya", "password": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/console/login",
        Some(json!({ "username": "reader", "password": "secret" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_book_then_list() {
    let app = console_app(Shared::default()).await;
    log_in(&app).await;

    let (status, modal) = send(&app, "POST", "/console/books/modal/create", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(modal["state"], "open");

    let (status, errors) = send(
        &app,
        "PUT",
        "/console/books/modal/form",
        Some(json!({ "title": "Dune", "isbn": "978-0-441-17271-9", "author_id": 1, "publisher_id": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(errors, json!({}));

    let (status, book) = send(&app, "POST", "/console/books/modal/submit", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book["id"], 1);

    let (status, view) = send(&app, "GET", "/console/books?q=dune", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["state"]["status"], "loaded");
    assert_eq!(view["listing"]["total"], 1);
    assert_eq!(view["listing"]["items"][0]["title"], "Dune");
    assert_eq!(view["listing"]["items"][0]["labels"]["author"], "#1");
    assert_eq!(view["modal"]["state"], "closed");
}

#[tokio::test]
async fn test_invalid_form_stays_open() {
    let app = console_app(Shared::default()).await;
    log_in(&app).await;

    send(&app, "POST", "/console/books/modal/create", None).await;
    send(
        &app,
        "PUT",
        "/console/books/modal/form",
        Some(json!({ "title": "", "isbn": "123" })),
    )
    .await;

    let (status, body) = send(&app, "POST", "/console/books/modal/submit", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["title"].is_string());
    assert!(body["fields"]["isbn"].is_string());

    let (_, view) = send(&app, "GET", "/console/books", None).await;
    assert_eq!(view["modal"]["state"], "open");
}

#[tokio::test]
async fn test_failed_load_then_retry() {
    let backend = Shared::default();
    {
        let mut b = backend.lock().unwrap();
        b.list_failures = 1;
        b.books.push(json!({
            "id": 1, "title": "Emma", "isbn": "0141439580",
            "author_id": 1, "publisher_id": 1
        }));
    }
    let app = console_app(backend).await;
    log_in(&app).await;

    let (status, view) = send(&app, "GET", "/console/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["state"]["status"], "error");
    assert_eq!(view["can_retry"], true);
    assert_eq!(view["listing"]["total"], 0);
    assert!(view["banner"].as_str().unwrap().contains("try again later"));

    let (_, view) = send(&app, "POST", "/console/books/refresh", None).await;
    assert_eq!(view["state"]["status"], "loaded");
    assert_eq!(view["listing"]["items"][0]["title"], "Emma");

    let (status, _) = send(&app, "DELETE", "/console/books/banner", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, view) = send(&app, "GET", "/console/books", None).await;
    assert!(view["banner"].is_null());
}

#[tokio::test]
async fn test_delete_needs_confirmation() {
    let app = console_app(Shared::default()).await;
    log_in(&app).await;

    let (status, body) = send(&app, "DELETE", "/console/books/3", None).await;
    assert_eq!(status, StatusCode::PRECONDITION_REQUIRED);
    assert_eq!(body["code"], 7);
}

#[tokio::test]
async fn test_report_window_and_print() {
    let app = console_app(Shared::default()).await;
    log_in(&app).await;

    let (status, _) = send(&app, "GET", "/console/reports?days=14", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, report) = send(&app, "GET", "/console/reports?days=7", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["window"], 7);
    assert_eq!(report["totals"]["loans_in_window"], 0);

    let (status, html) = send_raw(&app, "GET", "/console/reports/print", None).await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(html).unwrap();
    assert!(html.contains("Yeti Public Library"));
    assert!(html.contains("Last 30 days"));
}

#[tokio::test]
async fn test_dashboard_summary() {
    let app = console_app(Shared::default()).await;

    let (status, _) = send(&app, "GET", "/console/dashboard", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    log_in(&app).await;
    let (status, summary) = send(&app, "GET", "/console/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_books"], 42);
    assert_eq!(summary["overdue_loans"], 1);
    assert_eq!(summary["recent_loans"], json!([]));
}

#[tokio::test]
async fn test_renew_then_return_loan() {
    let backend = Shared::default();
    backend.lock().unwrap().loans.push(loan(7));
    let app = console_app(backend).await;
    log_in(&app).await;

    let (status, renewed) = send(&app, "POST", "/console/loans/7/renew", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renewed["renewals"], 1);

    let (status, returned) = send(&app, "POST", "/console/loans/7/return", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(returned["status"], "returned");

    let (_, view) = send(&app, "GET", "/console/loans", None).await;
    assert_eq!(view["listing"]["items"][0]["status"], "returned");
    assert_eq!(view["listing"]["items"][0]["renewals"], 1);
    assert!(view["banner"].is_null());

    let (status, _) = send(&app, "POST", "/console/loans/7/renew", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (_, view) = send(&app, "GET", "/console/loans", None).await;
    assert_eq!(view["banner"], "Loan 7 is already returned");
}

#[tokio::test]
async fn test_refresh_applies_query() {
    let backend = Shared::default();
    {
        let mut b = backend.lock().unwrap();
        b.books.push(json!({
            "id": 1, "title": "Emma", "isbn": "0141439580",
            "author_id": 1, "publisher_id": 1
        }));
        b.books.push(json!({
            "id": 2, "title": "Dune", "isbn": "9780441172719",
            "author_id": 2, "publisher_id": 1
        }));
    }
    let app = console_app(backend).await;
    log_in(&app).await;

    let (status, view) = send(&app, "POST", "/console/books/refresh?q=emma", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["listing"]["total"], 1);
    assert_eq!(view["listing"]["items"][0]["title"], "Emma");

    let (_, view) = send(&app, "POST", "/console/books/refresh?per_page=1&page=2", None).await;
    assert_eq!(view["listing"]["total"], 2);
    assert_eq!(view["listing"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(view["listing"]["page"], 2);
}

#[tokio::test]
async fn test_foreign_origin_gets_no_cors_access() {
    let app = console_app(Shared::default()).await;
    log_in(&app).await;

    let (status, allowed) = get_from_origin(&app, "/console/users", "http://evil.example").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(allowed, None);
}

#[tokio::test]
async fn test_configured_origin_is_allowed() {
    let app = console_app_with_origins(
        Shared::default(),
        vec!["http://localhost:5173".to_string()],
    )
    .await;
    log_in(&app).await;

    let (_, allowed) = get_from_origin(&app, "/console/users", "http://localhost:5173").await;
    assert_eq!(allowed.as_deref(), Some("http://localhost:5173"));

    let (_, allowed) = get_from_origin(&app, "/console/users", "http://evil.example").await;
    assert_eq!(allowed, None);
}
