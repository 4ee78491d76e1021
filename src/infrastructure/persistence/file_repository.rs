//! Single-document JSON snapshot implementation of the URL repository.
//!
//! The whole registry is serialized into one file and rewritten on every
//! mutation. Writes go to a temporary file in the same directory, are fsynced
//! and then renamed over the snapshot, so a crash mid-write leaves the previous
//! snapshot intact.
//!
//! # Document Layout
//!
//! ```json
//! {
//!   "url_database":   { "aB3xY9": "https://example.com" },
//!   "reverse_lookup": { "https://example.com": "aB3xY9" },
//!   "click_counts":   { "aB3xY9": 1 },
//!   "metadata":       { "aB3xY9": { "created_at": "2026-01-01T00:00:00Z", "ip_address": null } }
//! }
//! ```
//!
//! `click_counts` and `metadata` are optional when loading, so snapshots that
//! only carry the two URL maps still open.

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, warn};

use super::record_table::RecordTable;
use crate::domain::entities::UrlRecord;
use crate::domain::repositories::{PutMode, UrlRepository};
use crate::error::RepositoryError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct SnapshotDocument {
    #[serde(default)]
    url_database: BTreeMap<String, String>,
    #[serde(default)]
    reverse_lookup: BTreeMap<String, String>,
    #[serde(default)]
    click_counts: BTreeMap<String, u64>,
    #[serde(default)]
    metadata: BTreeMap<String, RecordMetadata>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RecordMetadata {
    created_at: DateTime<Utc>,
    #[serde(default)]
    ip_address: Option<String>,
}

impl SnapshotDocument {
    fn from_table(table: &RecordTable) -> Self {
        let mut doc = Self::default();

        for (code, record) in table.records() {
            doc.url_database.insert(code.clone(), record.long_url.clone());
            doc.click_counts.insert(code.clone(), record.clicks);
            doc.metadata.insert(
                code.clone(),
                RecordMetadata {
                    created_at: record.created_at,
                    ip_address: record.ip_address.clone(),
                },
            );
        }

        doc.reverse_lookup = table
            .reverse()
            .iter()
            .map(|(url, code)| (url.clone(), code.clone()))
            .collect();

        doc
    }

    /// Rebuilds the table, using `loaded_at` for records without metadata.
    fn into_table(mut self, loaded_at: DateTime<Utc>) -> RecordTable {
        let mut records = HashMap::with_capacity(self.url_database.len());

        for (code, long_url) in self.url_database {
            let clicks = self.click_counts.remove(&code).unwrap_or(0);
            let (created_at, ip_address) = match self.metadata.remove(&code) {
                Some(meta) => (meta.created_at, meta.ip_address),
                None => (loaded_at, None),
            };

            records.insert(
                code.clone(),
                UrlRecord {
                    short_code: code,
                    long_url,
                    clicks,
                    created_at,
                    ip_address,
                },
            );
        }

        let mut reverse = HashMap::with_capacity(self.reverse_lookup.len());
        for (long_url, code) in self.reverse_lookup {
            match records.get(&code) {
                Some(record) if record.long_url == long_url => {
                    reverse.insert(long_url, code);
                }
                _ => warn!("Dropping stale reverse index entry {} -> {}", long_url, code),
            }
        }

        // Index URLs the snapshot left out, oldest record first.
        let mut unindexed: Vec<&UrlRecord> = records
            .values()
            .filter(|r| !reverse.contains_key(&r.long_url))
            .collect();
        unindexed.sort_by(|a, b| {
            (a.created_at, &a.short_code).cmp(&(b.created_at, &b.short_code))
        });
        for record in unindexed {
            reverse
                .entry(record.long_url.clone())
                .or_insert_with(|| record.short_code.clone());
        }

        RecordTable::from_parts(records, reverse)
    }
}

/// Repository persisting the registry as one JSON snapshot file.
///
/// The in-memory table only advances after the snapshot has been renamed into
/// place; a failed write leaves memory and disk at the previous state.
///
/// Mutations run on a spawned task holding the table lock, so a caller that
/// is dropped mid-write cannot leave a stray temp file or a snapshot that
/// memory never saw.
pub struct FileUrlRepository {
    path: Arc<Path>,
    table: Arc<Mutex<RecordTable>>,
}

impl FileUrlRepository {
    /// Opens a snapshot, starting empty if the file does not exist.
    ///
    /// Creates the parent directory when missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed. The
    /// file is never overwritten in that case.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();

        let table = match fs::read(&path).await {
            Ok(bytes) => {
                let doc: SnapshotDocument = serde_json::from_slice(&bytes)?;
                doc.into_table(Utc::now())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if let Some(parent) = parent_dir(&path) {
                    fs::create_dir_all(parent).await?;
                }
                RecordTable::default()
            }
            Err(e) => return Err(e.into()),
        };

        info!("Loaded {} records from {}", table.len(), path.display());

        Ok(Self {
            path: Arc::from(path),
            table: Arc::new(Mutex::new(table)),
        })
    }

    /// Location of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `mutate` to a copy of the table, writes it and swaps it in.
    ///
    /// `Ok(None)` from `mutate` means nothing changed and nothing is written.
    async fn commit<T, F>(&self, mutate: F) -> Result<Option<T>, RepositoryError>
    where
        T: Send + 'static,
        F: FnOnce(&mut RecordTable) -> Result<Option<T>, RepositoryError> + Send + 'static,
    {
        let table = Arc::clone(&self.table).lock_owned().await;
        let path = Arc::clone(&self.path);

        tokio::spawn(apply(table, path, mutate))
            .await
            .map_err(|e| RepositoryError::Io(io::Error::other(e)))?
    }
}

async fn apply<T, F>(
    mut table: OwnedMutexGuard<RecordTable>,
    path: Arc<Path>,
    mutate: F,
) -> Result<Option<T>, RepositoryError>
where
    F: FnOnce(&mut RecordTable) -> Result<Option<T>, RepositoryError>,
{
    let mut next = (*table).clone();
    let Some(value) = mutate(&mut next)? else {
        return Ok(None);
    };

    persist(&path, &next).await?;

    *table = next;
    Ok(Some(value))
}

async fn persist(path: &Path, table: &RecordTable) -> Result<(), RepositoryError> {
    let content = serde_json::to_vec_pretty(&SnapshotDocument::from_table(table))?;
    let tmp_path = temp_path(path);

    if let Err(e) = write_synced(&tmp_path, &content).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(e.into());
    }

    if let Err(e) = fs::rename(&tmp_path, path).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(e.into());
    }

    // Memory must follow the renamed snapshot even if this fails.
    if let Err(e) = sync_dir(path).await {
        warn!("Failed to sync directory of {}: {}", path.display(), e);
    }

    debug!("Snapshot written: {} records", table.len());
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "snapshot".to_string());

    path.with_file_name(format!(".{}.{:016x}.tmp", file_name, rand::random::<u64>()))
}

fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

async fn write_synced(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(content).await?;
    file.sync_all().await
}

/// Flushes the directory entry of `path` so the rename itself is durable.
async fn sync_dir(path: &Path) -> io::Result<()> {
    let dir = parent_dir(path).unwrap_or_else(|| Path::new("."));
    fs::File::open(dir).await?.sync_all().await
}

#[async_trait]
impl UrlRepository for FileUrlRepository {
    async fn get(&self, code: &str) -> Result<Option<UrlRecord>, RepositoryError> {
        Ok(self.table.lock().await.get(code))
    }

    async fn put(&self, record: UrlRecord, mode: PutMode) -> Result<(), RepositoryError> {
        self.commit(move |table| table.insert(record, mode).map(Some))
            .await
            .map(|_| ())
    }

    async fn find_by_long_url(
        &self,
        long_url: &str,
    ) -> Result<Option<UrlRecord>, RepositoryError> {
        Ok(self.table.lock().await.find_by_long_url(long_url))
    }

    async fn increment_clicks(&self, code: &str) -> Result<Option<u64>, RepositoryError> {
        let code = code.to_string();
        self.commit(move |table| Ok(table.increment_clicks(&code)))
            .await
    }

    async fn health_check(&self) -> bool {
        let dir = parent_dir(&self.path).unwrap_or_else(|| Path::new("."));
        fs::metadata(dir).await.is_ok_and(|m| m.is_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_sync_dir_accepts_relative_and_nested_paths() {
        let dir = tempfile::tempdir().unwrap();

        sync_dir(&dir.path().join("links.json")).await.unwrap();
        sync_dir(Path::new("links.json")).await.unwrap();
    }

    #[test]
    fn test_legacy_document_loads_with_zero_clicks() {
        let doc: SnapshotDocument = serde_json::from_value(json!({
            "url_database": { "aB3xY9": "https://example.com" },
            "reverse_lookup": { "https://example.com": "aB3xY9" }
        }))
        .unwrap();

        let loaded_at = Utc::now();
        let table = doc.into_table(loaded_at);

        let record = table.get("aB3xY9").unwrap();
        assert_eq!(record.long_url, "https://example.com");
        assert_eq!(record.clicks, 0);
        assert_eq!(record.created_at, loaded_at);
        assert_eq!(
            table.find_by_long_url("https://example.com").unwrap().short_code,
            "aB3xY9"
        );
    }

    #[test]
    fn test_stale_reverse_entries_are_dropped() {
        let doc: SnapshotDocument = serde_json::from_value(json!({
            "url_database": { "aB3xY9": "https://example.com" },
            "reverse_lookup": {
                "https://example.com": "aB3xY9",
                "https://gone.com": "zzzzzz"
            }
        }))
        .unwrap();

        let table = doc.into_table(Utc::now());
        assert!(table.find_by_long_url("https://gone.com").is_none());
        assert_eq!(table.reverse().len(), 1);
    }

    #[test]
    fn test_missing_reverse_entries_are_rebuilt() {
        let doc: SnapshotDocument = serde_json::from_value(json!({
            "url_database": { "promo": "https://other.com" }
        }))
        .unwrap();

        let table = doc.into_table(Utc::now());
        assert_eq!(
            table.find_by_long_url("https://other.com").unwrap().short_code,
            "promo"
        );
    }

    #[test]
    fn test_document_round_trips_through_table() {
        let mut table = RecordTable::default();
        let mut record = UrlRecord::new("promo", "https://other.com", Some("10.0.0.1".into()));
        record.clicks = 5;
        table.insert(record.clone(), PutMode::Reserve).unwrap();

        let value = serde_json::to_value(SnapshotDocument::from_table(&table)).unwrap();
        assert_eq!(value["url_database"]["promo"], "https://other.com");
        assert_eq!(value["reverse_lookup"]["https://other.com"], "promo");
        assert_eq!(value["click_counts"]["promo"], 5);
        assert_eq!(value["metadata"]["promo"]["ip_address"], "10.0.0.1");

        let doc: SnapshotDocument = serde_json::from_value(value).unwrap();
        assert_eq!(doc.into_table(Utc::now()).get("promo").unwrap(), record);
    }
}
