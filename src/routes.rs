//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`             - Short link redirect
//! - `GET  /health`             - Storage health check
//! - `POST /shorten`            - Create or look up a short code
//! - `GET  /stats/{code}`       - Click statistics
//! - `GET  /keyword/{keyword}`  - Keyword lookup
//!
//! Static routes take precedence over `/{code}`, so the keywords `shorten`
//! and `health` are refused. `/stats/{code}` and `/keyword/{keyword}` never
//! match a single segment and do not shadow anything.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .merge(api::routes::registry_routes())
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
