//! DTOs for the statistics and keyword lookup endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::UrlRecord;

/// Click statistics for a short code.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub short_code: String,
    pub long_url: String,
    pub clicks: u64,
    pub created_at: DateTime<Utc>,
}

impl From<UrlRecord> for StatsResponse {
    fn from(record: UrlRecord) -> Self {
        Self {
            short_code: record.short_code,
            long_url: record.long_url,
            clicks: record.clicks,
            created_at: record.created_at,
        }
    }
}
