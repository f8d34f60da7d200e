//! REST client for the library backend
//!
//! Wraps the backend HTTP API with [`reqwest`]. Every request carries the bearer
//! token of the [`SessionContext`] it was built with; backend failures are mapped
//! onto [`AppError`] by status code.

pub mod account;
pub mod resource;

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    config::BackendConfig,
    error::{AppError, AppResult},
    session::SessionContext,
};

pub use account::{AccountApi, LoanActions, LoginResponse};
pub use resource::ResourceApi;

/// HTTP client for one backend instance.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    session: SessionContext,
}

/// Error body the backend sends along with non-2xx statuses
#[derive(Debug, Deserialize)]
struct BackendError {
    #[serde(alias = "error")]
    message: Option<String>,
}

impl ApiClient {
    pub fn new(config: &BackendConfig, session: SessionContext) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Request builder with the session's bearer token attached.
    async fn authed(&self, method: Method, path: &str) -> AppResult<RequestBuilder> {
        let token = self.session.token().await?;
        Ok(self
            .client
            .request(method, self.url(path))
            .bearer_auth(token))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let response = self.authed(Method::GET, path).await?.send().await?;
        Self::parse_response(response).await
    }

    pub(crate) async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.authed(method, path).await?.json(body).send().await?;
        Self::parse_response(response).await
    }

    /// Body-less call whose response is decoded.
    pub(crate) async fn call<T: DeserializeOwned>(&self, method: Method, path: &str) -> AppResult<T> {
        let response = self.authed(method, path).await?.send().await?;
        Self::parse_response(response).await
    }

    /// Body-less call whose response body is ignored.
    pub(crate) async fn call_empty(&self, method: Method, path: &str) -> AppResult<()> {
        let response = self.authed(method, path).await?.send().await?;
        Self::ensure_success(response).await.map(|_| ())
    }

    /// Unauthenticated POST, used to open a session.
    pub(crate) async fn post_anonymous<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::parse_response(response).await
    }

    // ---- private helpers ----

    async fn parse_response<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Map a non-2xx status onto the console error taxonomy.
    async fn ensure_success(response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<BackendError>(&body)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| {
                if body.is_empty() {
                    status.canonical_reason().unwrap_or("error").to_string()
                } else {
                    body.clone()
                }
            });

        tracing::warn!("Backend responded {}: {}", status, message);
        Err(status_error(status, message))
    }
}

fn status_error(status: StatusCode, message: String) -> AppError {
    match status {
        StatusCode::UNAUTHORIZED => AppError::Authentication(message),
        StatusCode::FORBIDDEN => AppError::Authorization(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::CONFLICT => AppError::Conflict(message),
        s if s.is_server_error() => AppError::Server {
            status: s.as_u16(),
            message,
        },
        _ => AppError::BadRequest(message),
    }
}
