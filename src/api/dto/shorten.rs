//! DTOs for the shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::entities::ShortenOutcome;

/// Single-segment static routes; keywords with these names would be shadowed.
const RESERVED_KEYWORDS: &[&str] = &["shorten", "health"];

/// Request to shorten a URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The long URL. Any non-empty string is accepted; it is not parsed.
    #[validate(length(min = 1, message = "URL must not be empty"))]
    pub url: String,

    /// Optional caller-chosen short code.
    #[serde(default, alias = "customKeyword")]
    #[validate(length(min = 1))]
    #[validate(custom(function = "validate_keyword"))]
    pub custom_keyword: Option<String>,
}

/// Rejects keywords that cannot be served from `/{code}`.
fn validate_keyword(keyword: &str) -> Result<(), ValidationError> {
    if keyword.contains('/') {
        return Err(ValidationError::new("keyword_contains_slash"));
    }

    if RESERVED_KEYWORDS.contains(&keyword) {
        return Err(ValidationError::new("keyword_reserved"));
    }

    Ok(())
}

/// Result of a shorten request.
///
/// `created` is `true` for a newly stored record and `false` when an existing
/// code for the same URL was returned.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub short_code: String,
    pub short_url: String,
    pub long_url: String,
    pub created: bool,
}

impl ShortenResponse {
    pub fn from_outcome(outcome: ShortenOutcome, short_url: String) -> Self {
        Self {
            short_code: outcome.record.short_code,
            short_url,
            long_url: outcome.record.long_url,
            created: outcome.created,
        }
    }
}
