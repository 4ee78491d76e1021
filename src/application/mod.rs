//! Application layer services implementing business logic.
//!
//! Services consume the repository trait and provide a transport-agnostic API
//! for the HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::registry_service::RegistryService`] - Shortening, resolution and statistics

pub mod services;
