//! Yeti library administration console
//!
//! Management pages for the Yeti library backend: catalog, loans, staff and
//! users, reports and system configuration, served as JSON endpoints by an
//! axum application that talks to the backend REST API.

use std::sync::Arc;

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod listing;
pub mod models;
pub mod pages;
pub mod reports;
pub mod services;
pub mod session;
pub mod validation;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub console: Arc<services::Console>,
}
