//! In-process record table shared by the memory and file backends.

use std::collections::HashMap;

use crate::domain::entities::UrlRecord;
use crate::domain::repositories::PutMode;
use crate::error::RepositoryError;

/// Records keyed by short code plus the long URL reverse index.
///
/// Not synchronized; owners wrap it in a lock.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordTable {
    records: HashMap<String, UrlRecord>,
    reverse: HashMap<String, String>,
}

impl RecordTable {
    /// Rebuilds a table from stored parts without re-checking uniqueness.
    pub(crate) fn from_parts(
        records: HashMap<String, UrlRecord>,
        reverse: HashMap<String, String>,
    ) -> Self {
        Self { records, reverse }
    }

    pub(crate) fn records(&self) -> &HashMap<String, UrlRecord> {
        &self.records
    }

    pub(crate) fn reverse(&self) -> &HashMap<String, String> {
        &self.reverse
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn get(&self, code: &str) -> Option<UrlRecord> {
        self.records.get(code).cloned()
    }

    pub(crate) fn find_by_long_url(&self, long_url: &str) -> Option<UrlRecord> {
        self.reverse
            .get(long_url)
            .and_then(|code| self.records.get(code))
            .cloned()
    }

    /// Inserts a record, indexing its long URL if no earlier record claimed it.
    pub(crate) fn insert(&mut self, record: UrlRecord, mode: PutMode) -> Result<(), RepositoryError> {
        if self.records.contains_key(&record.short_code) {
            return Err(RepositoryError::AlreadyExists(record.short_code));
        }

        if mode == PutMode::Deduplicate
            && let Some(existing) = self.reverse.get(&record.long_url)
        {
            return Err(RepositoryError::DuplicateLongUrl(existing.clone()));
        }

        self.reverse
            .entry(record.long_url.clone())
            .or_insert_with(|| record.short_code.clone());
        self.records.insert(record.short_code.clone(), record);

        Ok(())
    }

    pub(crate) fn increment_clicks(&mut self, code: &str) -> Option<u64> {
        let record = self.records.get_mut(code)?;
        record.clicks += 1;
        Some(record.clicks)
    }
}
