//! Storage contract shared by every registry backend.

use crate::domain::entities::UrlRecord;
use crate::error::RepositoryError;
use async_trait::async_trait;

/// How [`UrlRepository::put`] treats an already indexed long URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutMode {
    /// Custom keyword reservation: only the short code must be free.
    Reserve,
    /// Generated code: the short code must be free and the long URL must not
    /// already be indexed.
    Deduplicate,
}

/// Persistence adapter for URL records.
///
/// All implementations share the same semantics regardless of the medium:
/// `put` never overwrites, and `put` / `increment_clicks` are atomic with
/// respect to concurrent callers of the same backend.
///
/// The reverse index maps a long URL to the first short code stored for it.
/// Later records for the same URL (custom keywords) leave it untouched.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryUrlRepository`] - process memory
/// - [`crate::infrastructure::persistence::FileUrlRepository`] - JSON snapshot file
/// - [`crate::infrastructure::persistence::RedisUrlRepository`] - Redis hashes
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Finds a record by its short code.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend cannot be read.
    async fn get(&self, code: &str) -> Result<Option<UrlRecord>, RepositoryError>;

    /// Stores a new record.
    ///
    /// # Errors
    ///
    /// - [`RepositoryError::AlreadyExists`] if the short code is taken
    /// - [`RepositoryError::DuplicateLongUrl`] in [`PutMode::Deduplicate`] when
    ///   the long URL is already indexed; carries the existing code
    /// - a storage error if the write fails, in which case nothing is stored
    async fn put(&self, record: UrlRecord, mode: PutMode) -> Result<(), RepositoryError>;

    /// Reverse lookup of the record indexed for a long URL.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend cannot be read.
    async fn find_by_long_url(&self, long_url: &str)
    -> Result<Option<UrlRecord>, RepositoryError>;

    /// Atomically increments the click counter.
    ///
    /// Returns the new count, or `None` if the code is unknown (nothing is
    /// mutated in that case).
    ///
    /// # Errors
    ///
    /// Returns a storage error if the update cannot be applied.
    async fn increment_clicks(&self, code: &str) -> Result<Option<u64>, RepositoryError>;

    /// Checks whether the backend is reachable.
    async fn health_check(&self) -> bool;
}
