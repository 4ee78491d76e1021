//! Domain layer containing business entities and storage contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Storage trait implemented by the infrastructure layer
//!
//! The domain layer has no dependency on storage backends or HTTP. Business
//! rules live in [`crate::application::services`].

pub mod entities;
pub mod repositories;
