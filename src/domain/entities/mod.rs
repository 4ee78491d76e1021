//! Core domain entities representing the registry's data model.
//!
//! - [`UrlRecord`] - A short code mapped to a long URL with its click counter
//! - [`ShortenOutcome`] - A record plus whether the shorten call created it
//! - [`KeywordInfo`] - The public view of a record returned by keyword lookups

pub mod url_record;

pub use url_record::{KeywordInfo, ShortenOutcome, UrlRecord};
