//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its long URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Each successful redirect increments the record's click counter exactly
/// once before the response is sent.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let long_url = state.registry.resolve(&code).await?;

    Ok((
        StatusCode::TEMPORARY_REDIRECT,
        [(header::LOCATION, location_header(&long_url))],
    )
        .into_response())
}

/// Controls and space; non-ASCII bytes are always encoded.
const NON_GRAPHIC: &AsciiSet = &CONTROLS.add(b' ');

/// Builds a `Location` header value.
///
/// Stored URLs are arbitrary strings, so bytes outside visible ASCII are
/// percent-encoded instead of being rejected.
fn location_header(long_url: &str) -> HeaderValue {
    if let Ok(value) = HeaderValue::from_str(long_url)
        && long_url.bytes().all(|b| b.is_ascii_graphic())
    {
        return value;
    }

    let encoded = utf8_percent_encode(long_url, NON_GRAPHIC).to_string();

    // Only visible ASCII remains.
    HeaderValue::from_str(&encoded).unwrap_or_else(|_| HeaderValue::from_static("/"))
}
