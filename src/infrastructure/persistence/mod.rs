//! Storage backend implementations of [`UrlRepository`].
//!
//! # Repositories
//!
//! - [`MemoryUrlRepository`] - Volatile map guarded by a lock
//! - [`FileUrlRepository`] - JSON snapshot rewritten atomically on every change
//! - [`RedisUrlRepository`] - One Redis hash per record, atomic via Lua scripts
//!
//! Exactly one backend is active per process, selected by
//! [`connect_repository`] from the startup configuration.

mod file_repository;
mod memory_repository;
mod record_table;
mod redis_repository;

pub use file_repository::FileUrlRepository;
pub use memory_repository::MemoryUrlRepository;
pub use redis_repository::RedisUrlRepository;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::{Config, StorageBackend};
use crate::domain::repositories::UrlRepository;

/// Builds the repository for the configured backend.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded or Redis is unreachable.
pub async fn connect_repository(config: &Config) -> Result<Arc<dyn UrlRepository>> {
    let repository: Arc<dyn UrlRepository> = match config.storage_backend {
        StorageBackend::Memory => {
            tracing::info!("Storage: in-memory (state is lost on restart)");
            Arc::new(MemoryUrlRepository::new())
        }
        StorageBackend::File => {
            let repo = FileUrlRepository::open(&config.snapshot_path)
                .await
                .with_context(|| {
                    format!(
                        "Failed to open snapshot {}",
                        config.snapshot_path.display()
                    )
                })?;
            tracing::info!("Storage: file snapshot at {}", repo.path().display());
            Arc::new(repo)
        }
        StorageBackend::Redis => {
            let redis_url = config
                .redis_url
                .as_deref()
                .context("REDIS_URL must be set for the redis backend")?;
            let repo = RedisUrlRepository::connect(redis_url, config.redis_key_prefix.clone())
                .await
                .context("Failed to connect to Redis")?;
            tracing::info!("Storage: redis document store");
            Arc::new(repo)
        }
    };

    Ok(repository)
}
