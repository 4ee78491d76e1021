//! URL registry service: shortening, resolution and click statistics.

use std::sync::Arc;

use crate::domain::entities::{KeywordInfo, ShortenOutcome, UrlRecord};
use crate::domain::repositories::{PutMode, UrlRepository};
use crate::error::{RegistryError, RepositoryError};
use crate::utils::code_generator::CodeGenerator;
use tracing::{debug, info, warn};

/// Upper bound on generated codes tried before giving up.
pub const MAX_GENERATION_ATTEMPTS: usize = 64;

/// Business logic over an injected [`UrlRepository`].
///
/// Enforces the two uniqueness axes of the registry:
///
/// - custom keywords are a namespace reservation; the first caller wins and
///   every later request for the same keyword fails with
///   [`RegistryError::KeywordTaken`]
/// - generated codes are deduplicated by long URL; repeated requests for the
///   same URL return the code issued first
///
/// Both checks are delegated to the repository's atomic `put`, so concurrent
/// requests cannot produce duplicate reservations or duplicate generated codes.
pub struct RegistryService {
    repository: Arc<dyn UrlRepository>,
    generator: CodeGenerator,
}

impl RegistryService {
    /// Creates a registry over a repository and code generator.
    pub fn new(repository: Arc<dyn UrlRepository>, generator: CodeGenerator) -> Self {
        Self {
            repository,
            generator,
        }
    }

    /// Shortens a long URL, optionally under a custom keyword.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::InvalidInput`] if the URL or keyword is empty
    /// - [`RegistryError::KeywordTaken`] if the custom keyword is reserved
    /// - [`RegistryError::ExhaustedKeyspace`] if no free code was found
    /// - [`RegistryError::Persistence`] on storage failures
    pub async fn shorten(
        &self,
        long_url: String,
        custom_keyword: Option<String>,
        ip_address: Option<String>,
    ) -> Result<ShortenOutcome, RegistryError> {
        if long_url.is_empty() {
            return Err(RegistryError::InvalidInput("long URL must not be empty"));
        }

        match custom_keyword {
            Some(keyword) => self.reserve_keyword(long_url, keyword, ip_address).await,
            None => self.shorten_generated(long_url, ip_address).await,
        }
    }

    /// Resolves a short code to its long URL, counting one click.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] for unknown codes; nothing is
    /// mutated in that case.
    pub async fn resolve(&self, short_code: &str) -> Result<String, RegistryError> {
        let record = self.record(short_code).await?;

        let clicks = self
            .repository
            .increment_clicks(short_code)
            .await?
            .ok_or_else(|| RegistryError::NotFound(short_code.to_string()))?;

        debug!("Resolved {} -> {} (clicks: {})", short_code, record.long_url, clicks);
        Ok(record.long_url)
    }

    /// Returns the click count for a short code.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] for unknown codes.
    pub async fn stats(&self, short_code: &str) -> Result<u64, RegistryError> {
        Ok(self.record(short_code).await?.clicks)
    }

    /// Looks up the long URL and click count registered under a keyword.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] for unknown keywords.
    pub async fn lookup_by_keyword(&self, keyword: &str) -> Result<KeywordInfo, RegistryError> {
        self.record(keyword).await.map(KeywordInfo::from)
    }

    /// Returns the full record for a short code without side effects.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] for unknown codes.
    pub async fn record(&self, short_code: &str) -> Result<UrlRecord, RegistryError> {
        self.repository
            .get(short_code)
            .await?
            .ok_or_else(|| RegistryError::NotFound(short_code.to_string()))
    }

    /// Reports whether the storage backend is reachable.
    pub async fn health_check(&self) -> bool {
        self.repository.health_check().await
    }

    /// Builds the fully-qualified short URL for a code.
    pub fn short_url(base_url: &str, short_code: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), short_code)
    }

    async fn reserve_keyword(
        &self,
        long_url: String,
        keyword: String,
        ip_address: Option<String>,
    ) -> Result<ShortenOutcome, RegistryError> {
        if keyword.is_empty() {
            return Err(RegistryError::InvalidInput("custom keyword must not be empty"));
        }

        let record = UrlRecord::new(keyword, long_url, ip_address);

        match self.repository.put(record.clone(), PutMode::Reserve).await {
            Ok(()) => {
                info!("Reserved keyword {} -> {}", record.short_code, record.long_url);
                Ok(ShortenOutcome {
                    record,
                    created: true,
                })
            }
            Err(RepositoryError::AlreadyExists(keyword)) => {
                debug!("Keyword {} already taken", keyword);
                Err(RegistryError::KeywordTaken(keyword))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn shorten_generated(
        &self,
        long_url: String,
        ip_address: Option<String>,
    ) -> Result<ShortenOutcome, RegistryError> {
        if let Some(existing) = self.repository.find_by_long_url(&long_url).await? {
            debug!("Reusing {} for {}", existing.short_code, long_url);
            return Ok(ShortenOutcome {
                record: existing,
                created: false,
            });
        }

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let record = UrlRecord::new(self.generator.generate(), long_url.clone(), ip_address.clone());

            match self.repository.put(record.clone(), PutMode::Deduplicate).await {
                Ok(()) => {
                    info!("Created {} -> {}", record.short_code, record.long_url);
                    return Ok(ShortenOutcome {
                        record,
                        created: true,
                    });
                }
                Err(RepositoryError::AlreadyExists(code)) => {
                    debug!("Code collision on {} (attempt {})", code, attempt);
                }
                Err(RepositoryError::DuplicateLongUrl(code)) => {
                    // Another request indexed this URL between lookup and put.
                    let existing = self.repository.get(&code).await?.ok_or_else(|| {
                        RegistryError::Persistence(RepositoryError::Corrupt {
                            code: code.clone(),
                            reason: "reverse index points at a missing record".to_string(),
                        })
                    })?;

                    return Ok(ShortenOutcome {
                        record: existing,
                        created: false,
                    });
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!(
            "Gave up generating a code for {} after {} attempts",
            long_url, MAX_GENERATION_ATTEMPTS
        );
        Err(RegistryError::ExhaustedKeyspace {
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }
}
