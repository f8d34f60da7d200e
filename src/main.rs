//! Yeti Admin - library administration console
//!
//! Serves the console endpoints in front of the library backend REST API.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yeti_admin::{
    client::ApiClient,
    config::AppConfig,
    pages,
    services::{Backends, Console},
    session::{SessionContext, SessionStore},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("yeti_admin={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Yeti Admin v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Backend API at {}", config.backend.url);

    let session = SessionContext::restore(SessionStore::new(&config.session.path)).await;
    let client = ApiClient::new(&config.backend, session.clone())
        .context("Failed to create backend client")?;
    let console = Console::new(
        Backends::from_client(client),
        session,
        config.console.clone(),
    );

    let addr = SocketAddr::new(
        config
            .server
            .host
            .parse()
            .context("Invalid host address")?,
        config.server.port,
    );

    let state = AppState {
        config: Arc::new(config),
        console: Arc::new(console),
    };

    if state.config.server.allowed_origins.is_empty() {
        tracing::info!("No CORS origins configured, cross-origin requests are refused");
    }
    let app = pages::app(state);

    tracing::info!("Console listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
