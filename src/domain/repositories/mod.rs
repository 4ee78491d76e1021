//! Repository trait definitions for the domain layer.
//!
//! The [`UrlRepository`] trait abstracts the registry's storage so the
//! business logic never branches on the active backend. Implementations live
//! in `crate::infrastructure::persistence`; a mock is generated via `mockall`
//! for unit tests.

pub mod url_repository;

pub use url_repository::{PutMode, UrlRepository};

#[cfg(test)]
pub use url_repository::MockUrlRepository;
