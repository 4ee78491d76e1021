//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server
//! starts. The storage backend chosen here is used for the whole process
//! lifetime.
//!
//! ## Storage Backends
//!
//! ```bash
//! # Volatile, lost on restart (default)
//! export STORAGE_BACKEND="memory"
//!
//! # Single JSON snapshot rewritten on every change
//! export STORAGE_BACKEND="file"
//! export SNAPSHOT_PATH="/var/lib/link-registry/url_database.json"
//!
//! # One Redis hash per record
//! export STORAGE_BACKEND="redis"
//! export REDIS_URL="redis://localhost:6379/0"
//! ```
//!
//! `REDIS_URL` may be replaced by `REDIS_HOST`, `REDIS_PORT`, `REDIS_PASSWORD`
//! and `REDIS_DB`.
//!
//! ## Optional Variables
//!
//! - `SNAPSHOT_PATH` - Snapshot file (default: `url_database.json`)
//! - `REDIS_KEY_PREFIX` - Namespace for Redis keys (default: `links:`)
//! - `BASE_URL` - Prefix of generated short URLs (default: `http://localhost:3000`)
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Storage backend selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    File,
    Redis,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            "redis" => Ok(Self::Redis),
            other => anyhow::bail!(
                "STORAGE_BACKEND must be 'memory', 'file' or 'redis', got '{}'",
                other
            ),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::File => write!(f, "file"),
            Self::Redis => write!(f, "redis"),
        }
    }
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub storage_backend: StorageBackend,
    pub snapshot_path: PathBuf,
    pub redis_url: Option<String>,
    pub redis_key_prefix: String,
    /// Base used to build fully-qualified short URLs in responses.
    pub base_url: String,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `STORAGE_BACKEND` holds an unknown value.
    pub fn from_env() -> Result<Self> {
        let storage_backend = env::var("STORAGE_BACKEND")
            .ok()
            .map(|v| v.parse::<StorageBackend>())
            .transpose()
            .context("Failed to load storage configuration")?
            .unwrap_or(StorageBackend::Memory);

        let snapshot_path = env::var("SNAPSHOT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("url_database.json"));

        let redis_url = Self::load_redis_url();
        let redis_key_prefix =
            env::var("REDIS_KEY_PREFIX").unwrap_or_else(|_| "links:".to_string());

        let base_url =
            env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        Ok(Self {
            storage_backend,
            snapshot_path,
            redis_url,
            redis_key_prefix,
            base_url,
            listen_addr,
            log_level,
            log_format,
        })
    }

    /// Loads Redis URL with fallback to component-based configuration.
    ///
    /// Priority:
    /// 1. `REDIS_URL` environment variable
    /// 2. Constructed from `REDIS_HOST`, `REDIS_PORT`, `REDIS_PASSWORD`, `REDIS_DB`
    ///
    /// Returns `None` if Redis is not configured.
    fn load_redis_url() -> Option<String> {
        if let Ok(url) = env::var("REDIS_URL") {
            return Some(url);
        }

        let host = env::var("REDIS_HOST").ok()?;
        let port = env::var("REDIS_PORT").unwrap_or_else(|_| "6379".to_string());
        let password = env::var("REDIS_PASSWORD").ok();
        let db = env::var("REDIS_DB").unwrap_or_else(|_| "0".to_string());

        let url = match password {
            // Empty password means no authentication
            Some(pwd) if !pwd.is_empty() => format!("redis://:{}@{}:{}/{}", pwd, host, port, db),
            _ => format!("redis://{}:{}/{}", host, port, db),
        };

        Some(url)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the Redis backend is selected without a Redis URL, or the URL has the wrong scheme
    /// - the file backend has an empty snapshot path
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is not `host:port`
    /// - `base_url` is not an `http(s)://` URL
    pub fn validate(&self) -> Result<()> {
        match self.storage_backend {
            StorageBackend::Redis => {
                let Some(ref redis_url) = self.redis_url else {
                    anyhow::bail!("REDIS_URL or REDIS_HOST must be set when STORAGE_BACKEND=redis");
                };
                if !redis_url.starts_with("redis://") && !redis_url.starts_with("rediss://") {
                    anyhow::bail!(
                        "REDIS_URL must start with 'redis://' or 'rediss://', got '{}'",
                        redis_url
                    );
                }
            }
            StorageBackend::File => {
                if self.snapshot_path.as_os_str().is_empty() {
                    anyhow::bail!("SNAPSHOT_PATH must not be empty when STORAGE_BACKEND=file");
                }
            }
            StorageBackend::Memory => {}
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!(
                "BASE_URL must start with 'http://' or 'https://', got '{}'",
                self.base_url
            );
        }

        Ok(())
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Base URL: {}", self.base_url);
        tracing::info!("  Storage backend: {}", self.storage_backend);

        match self.storage_backend {
            StorageBackend::File => {
                tracing::info!("  Snapshot: {}", self.snapshot_path.display());
            }
            StorageBackend::Redis => {
                if let Some(ref redis_url) = self.redis_url {
                    tracing::info!("  Redis: {}", mask_connection_string(redis_url));
                }
                tracing::info!("  Redis key prefix: {}", self.redis_key_prefix);
            }
            StorageBackend::Memory => {}
        }

        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Masks sensitive information in connection strings for logging.
///
/// `redis://:password@host:port/db` → `redis://:***@host:port/db`
fn mask_connection_string(url: &str) -> String {
    if let Some(start) = url.find("://") {
        let scheme_end = start + 3;
        let rest = &url[scheme_end..];

        if let Some(at_pos) = rest.find('@') {
            let credentials = &rest[..at_pos];
            let host_part = &rest[at_pos..];

            if let Some(colon_pos) = credentials.rfind(':') {
                let username = &credentials[..colon_pos];
                return format!("{}://{}:***{}", &url[..start], username, host_part);
            }
        }
    }

    url.to_string()
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if variables are malformed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
