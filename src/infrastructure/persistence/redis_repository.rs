//! Redis document-store implementation of the URL repository.
//!
//! Each record is a Redis hash at `{prefix}record:{code}` with the fields
//! `short_code`, `long_url`, `clicks`, `created_at` and `ip_address`. The
//! reverse index lives in the store as `{prefix}long_url:{url}` → code, so
//! lookups never consult process memory.
//!
//! Reservation and click increments run as Lua scripts, which Redis executes
//! atomically; no process-wide lock is needed.

use std::collections::HashMap;
use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{AsyncCommands, Client, Script, aio::ConnectionManager};
use tracing::{debug, info};

use crate::domain::entities::UrlRecord;
use crate::domain::repositories::{PutMode, UrlRepository};
use crate::error::RepositoryError;

/// KEYS: record key, reverse key.
/// ARGV: code, long URL, created_at, ip address (or empty), mode.
/// Returns `{status, code}`: 0 stored, 1 code taken, 2 URL already indexed.
static PUT_SCRIPT: LazyLock<Script> = LazyLock::new(|| {
    Script::new(
        r#"
        if redis.call('EXISTS', KEYS[1]) == 1 then
            return {1, ARGV[1]}
        end
        local indexed = redis.call('GET', KEYS[2])
        if indexed and ARGV[5] == 'dedup' then
            return {2, indexed}
        end
        redis.call('HSET', KEYS[1],
            'short_code', ARGV[1],
            'long_url', ARGV[2],
            'clicks', 0,
            'created_at', ARGV[3])
        if ARGV[4] ~= '' then
            redis.call('HSET', KEYS[1], 'ip_address', ARGV[4])
        end
        if not indexed then
            redis.call('SET', KEYS[2], ARGV[1])
        end
        return {0, ARGV[1]}
        "#,
    )
});

/// KEYS: record key. Returns the new count, or -1 when the record is missing.
static INCREMENT_SCRIPT: LazyLock<Script> = LazyLock::new(|| {
    Script::new(
        r#"
        if redis.call('EXISTS', KEYS[1]) == 0 then
            return -1
        end
        return redis.call('HINCRBY', KEYS[1], 'clicks', 1)
        "#,
    )
});

const PUT_STORED: i64 = 0;
const PUT_CODE_TAKEN: i64 = 1;
const PUT_URL_INDEXED: i64 = 2;

/// Repository storing one Redis hash per record.
///
/// Uses `ConnectionManager` for automatic reconnection; clones share the
/// underlying multiplexed connection.
pub struct RedisUrlRepository {
    client: ConnectionManager,
    key_prefix: String,
}

impl RedisUrlRepository {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `key_prefix` - namespace prepended to every key (e.g., `"links:"`)
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Redis`] if the URL is invalid, the connection
    /// cannot be established, or the PING fails.
    pub async fn connect(
        redis_url: &str,
        key_prefix: impl Into<String>,
    ) -> Result<Self, RepositoryError> {
        let client = Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;

        let mut test_conn = manager.clone();
        test_conn.ping::<()>().await?;

        info!("✓ Connected to Redis document store");

        Ok(Self {
            client: manager,
            key_prefix: key_prefix.into(),
        })
    }

    fn record_key(&self, code: &str) -> String {
        format!("{}record:{}", self.key_prefix, code)
    }

    fn long_url_key(&self, long_url: &str) -> String {
        format!("{}long_url:{}", self.key_prefix, long_url)
    }
}

/// Converts a stored hash into a record.
fn record_from_hash(
    code: &str,
    mut fields: HashMap<String, String>,
) -> Result<UrlRecord, RepositoryError> {
    let corrupt = |reason: String| RepositoryError::Corrupt {
        code: code.to_string(),
        reason,
    };

    let long_url = fields
        .remove("long_url")
        .ok_or_else(|| corrupt("missing long_url".to_string()))?;

    let clicks = match fields.remove("clicks") {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|e| corrupt(format!("invalid clicks `{}`: {}", raw, e)))?,
        None => 0,
    };

    let created_at = fields
        .remove("created_at")
        .ok_or_else(|| corrupt("missing created_at".to_string()))
        .and_then(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| corrupt(format!("invalid created_at `{}`: {}", raw, e)))
        })?;

    let ip_address = fields.remove("ip_address").filter(|ip| !ip.is_empty());

    Ok(UrlRecord {
        short_code: code.to_string(),
        long_url,
        clicks,
        created_at,
        ip_address,
    })
}

#[async_trait]
impl UrlRepository for RedisUrlRepository {
    async fn get(&self, code: &str) -> Result<Option<UrlRecord>, RepositoryError> {
        let mut conn = self.client.clone();
        let fields: HashMap<String, String> = conn.hgetall(self.record_key(code)).await?;

        if fields.is_empty() {
            return Ok(None);
        }

        record_from_hash(code, fields).map(Some)
    }

    async fn put(&self, record: UrlRecord, mode: PutMode) -> Result<(), RepositoryError> {
        let mut conn = self.client.clone();
        let mode_arg = match mode {
            PutMode::Reserve => "reserve",
            PutMode::Deduplicate => "dedup",
        };

        let (status, code): (i64, String) = PUT_SCRIPT
            .key(self.record_key(&record.short_code))
            .key(self.long_url_key(&record.long_url))
            .arg(&record.short_code)
            .arg(&record.long_url)
            .arg(record.created_at.to_rfc3339())
            .arg(record.ip_address.as_deref().unwrap_or(""))
            .arg(mode_arg)
            .invoke_async(&mut conn)
            .await?;

        match status {
            PUT_STORED => {
                debug!("Stored record {}", code);
                Ok(())
            }
            PUT_CODE_TAKEN => Err(RepositoryError::AlreadyExists(code)),
            PUT_URL_INDEXED => Err(RepositoryError::DuplicateLongUrl(code)),
            other => Err(RepositoryError::Corrupt {
                code: record.short_code,
                reason: format!("unexpected put status {}", other),
            }),
        }
    }

    async fn find_by_long_url(
        &self,
        long_url: &str,
    ) -> Result<Option<UrlRecord>, RepositoryError> {
        let mut conn = self.client.clone();
        let code: Option<String> = conn.get(self.long_url_key(long_url)).await?;

        match code {
            Some(code) => self.get(&code).await,
            None => Ok(None),
        }
    }

    async fn increment_clicks(&self, code: &str) -> Result<Option<u64>, RepositoryError> {
        let mut conn = self.client.clone();

        let clicks: i64 = INCREMENT_SCRIPT
            .key(self.record_key(code))
            .invoke_async(&mut conn)
            .await?;

        Ok(u64::try_from(clicks).ok())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
