//! Handler for link shortening endpoint.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::api::extract::ClientAddr;
use crate::application::services::RegistryService;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short code for a long URL, or returns the existing one.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com", "custom_keyword": "promo" }
/// ```
///
/// `custom_keyword` is optional. Without it, repeated requests for the same
/// URL return the code issued first.
///
/// # Response
///
/// ```json
/// {
///   "short_code": "aB3xY9",
///   "short_url": "http://localhost:3000/aB3xY9",
///   "long_url": "https://example.com",
///   "created": true
/// }
/// ```
///
/// - **201 Created**: a new record was stored
/// - **200 OK**: the URL was already shortened; the existing code is returned
///
/// # Errors
///
/// - 400 Bad Request if validation fails
/// - 409 Conflict if the custom keyword is taken
/// - 500 Internal Server Error on storage failures or code exhaustion
pub async fn shorten_handler(
    State(state): State<AppState>,
    ClientAddr(ip_address): ClientAddr,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    payload.validate()?;

    let outcome = state
        .registry
        .shorten(payload.url, payload.custom_keyword, ip_address)
        .await?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    let short_url = RegistryService::short_url(&state.base_url, &outcome.record.short_code);

    Ok((status, Json(ShortenResponse::from_outcome(outcome, short_url))))
}
