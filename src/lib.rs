//! # Link Registry
//!
//! A URL shortener core: maps long URLs to short codes and back, counts
//! clicks, and lets callers reserve custom keywords. Served over Axum.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Records and the storage contract
//! - **Application Layer** ([`application`]) - The registry service
//! - **Infrastructure Layer** ([`infrastructure`]) - In-memory, file snapshot and Redis backends
//! - **API Layer** ([`api`]) - REST handlers, DTOs and middleware
//!
//! ## Features
//!
//! - Random 6-character codes with collision retry
//! - Deduplication by long URL for generated codes
//! - Exclusive custom keyword reservation
//! - Atomic click counters
//! - Storage backend chosen once at startup
//!
//! ## Quick Start
//!
//! ```bash
//! export STORAGE_BACKEND="file"
//! export SNAPSHOT_PATH="url_database.json"
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::{AppError, RegistryError, RepositoryError};
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::RegistryService;
    pub use crate::domain::entities::{KeywordInfo, ShortenOutcome, UrlRecord};
    pub use crate::domain::repositories::{PutMode, UrlRepository};
    pub use crate::error::{AppError, RegistryError, RepositoryError};
    pub use crate::state::AppState;
    pub use crate::utils::code_generator::CodeGenerator;
}
