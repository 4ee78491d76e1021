//! URL record entity representing a short code mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered short code and the long URL it resolves to.
///
/// Records are created once and afterwards only mutated by click increments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    pub short_code: String,
    pub long_url: String,
    pub clicks: u64,
    pub created_at: DateTime<Utc>,
    /// Address of the client that created the record, if known.
    pub ip_address: Option<String>,
}

impl UrlRecord {
    /// Creates a fresh record with a zero click counter, stamped with the current time.
    pub fn new(
        short_code: impl Into<String>,
        long_url: impl Into<String>,
        ip_address: Option<String>,
    ) -> Self {
        Self {
            short_code: short_code.into(),
            long_url: long_url.into(),
            clicks: 0,
            created_at: Utc::now(),
            ip_address,
        }
    }
}

/// Result of a shorten request.
///
/// `created` distinguishes a freshly stored record from an existing one
/// returned by long-URL deduplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenOutcome {
    pub record: UrlRecord,
    pub created: bool,
}

/// Read-only view returned by keyword lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordInfo {
    pub long_url: String,
    pub clicks: u64,
}

impl From<UrlRecord> for KeywordInfo {
    fn from(record: UrlRecord) -> Self {
        Self {
            long_url: record.long_url,
            clicks: record.clicks,
        }
    }
}
