//! API route configuration.

use crate::api::handlers::{keyword_handler, shorten_handler, stats_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Registry API routes.
///
/// # Endpoints
///
/// - `POST /shorten`            - Create or look up a short code
/// - `GET  /stats/{code}`       - Click statistics for a short code
/// - `GET  /keyword/{keyword}`  - Long URL and clicks for a keyword
pub fn registry_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/stats/{code}", get(stats_handler))
        .route("/keyword/{keyword}", get(keyword_handler))
}
