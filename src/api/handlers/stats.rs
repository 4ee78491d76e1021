//! Handlers for read-only lookups: click statistics and keyword resolution.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::stats::StatsResponse;
use crate::domain::entities::KeywordInfo;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the click count and metadata of a short code.
///
/// # Endpoint
///
/// `GET /stats/{code}`
///
/// Does not count as a click.
///
/// # Response
///
/// ```json
/// {
///   "short_code": "aB3xY9",
///   "long_url": "https://example.com",
///   "clicks": 1,
///   "created_at": "2026-01-01T00:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<StatsResponse>, AppError> {
    let record = state.registry.record(&code).await?;
    Ok(Json(StatsResponse::from(record)))
}

/// Looks up the long URL and click count registered under a keyword.
///
/// # Endpoint
///
/// `GET /keyword/{keyword}`
///
/// # Errors
///
/// Returns 404 Not Found if the keyword is not registered.
pub async fn keyword_handler(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
) -> Result<Json<KeywordInfo>, AppError> {
    let info = state.registry.lookup_by_keyword(&keyword).await?;
    Ok(Json(info))
}
