//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::RegistryService;

/// State cloned into each request; the registry itself is shared.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RegistryService>,
    /// Base used to build fully-qualified short URLs.
    pub base_url: String,
}

impl AppState {
    pub fn new(registry: Arc<RegistryService>, base_url: impl Into<String>) -> Self {
        Self {
            registry,
            base_url: base_url.into(),
        }
    }
}
