//! HTTP server initialization and runtime setup.
//!
//! Handles logging, storage backend selection, registry wiring and the Axum
//! server lifecycle.

use crate::application::services::RegistryService;
use crate::config::Config;
use crate::infrastructure::persistence::connect_repository;
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::CodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber.
///
/// Uses `config.log_level` as the filter directive (falling back to `info`
/// when it does not parse) and emits JSON lines when `log_format` is `json`.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if config.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Builds the registry over the configured storage backend.
///
/// # Errors
///
/// Returns an error if the backend cannot be opened.
pub async fn build_registry(config: &Config) -> Result<Arc<RegistryService>> {
    let repository = connect_repository(config).await?;
    Ok(Arc::new(RegistryService::new(
        repository,
        CodeGenerator::default(),
    )))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - the storage backend (memory, file snapshot or Redis)
/// - the registry service
/// - the Axum HTTP server, stopped gracefully on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - the storage backend cannot be opened
/// - server bind fails
/// - a server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let registry = build_registry(&config).await?;

    let state = AppState::new(registry, config.base_url.clone());
    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
