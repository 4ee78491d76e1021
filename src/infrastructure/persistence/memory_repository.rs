//! Volatile in-memory implementation of the URL repository.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::record_table::RecordTable;
use crate::domain::entities::UrlRecord;
use crate::domain::repositories::{PutMode, UrlRepository};
use crate::error::RepositoryError;

/// Repository holding all records in process memory.
///
/// State is lost on restart. A single lock guards both the record map and the
/// reverse index, so reservation and increments are serialized.
#[derive(Default)]
pub struct MemoryUrlRepository {
    table: RwLock<RecordTable>,
}

impl MemoryUrlRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UrlRepository for MemoryUrlRepository {
    async fn get(&self, code: &str) -> Result<Option<UrlRecord>, RepositoryError> {
        Ok(self.table.read().await.get(code))
    }

    async fn put(&self, record: UrlRecord, mode: PutMode) -> Result<(), RepositoryError> {
        self.table.write().await.insert(record, mode)
    }

    async fn find_by_long_url(
        &self,
        long_url: &str,
    ) -> Result<Option<UrlRecord>, RepositoryError> {
        Ok(self.table.read().await.find_by_long_url(long_url))
    }

    async fn increment_clicks(&self, code: &str) -> Result<Option<u64>, RepositoryError> {
        Ok(self.table.write().await.increment_clicks(code))
    }

    async fn health_check(&self) -> bool {
        true
    }
}
