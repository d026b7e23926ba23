//! Cached fact retrieval
//!
//! `FactFetcher` answers from the cache while an entry is fresh and goes to
//! the remote source only on a miss. Failures are logged here and handed back
//! as a single [`FetchError`]; nothing is cached on failure.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, instrument};

use crate::cache::Cache;
use crate::data::{FactSet, FactSource, FetchError};

/// Default lifetime of a cached fact set
pub const FACT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Fetches fact sets through a TTL cache
pub struct FactFetcher<S> {
    source: Arc<S>,
    cache: Arc<dyn Cache<FactSet>>,
    ttl: Duration,
}

impl<S> Clone for FactFetcher<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            cache: Arc::clone(&self.cache),
            ttl: self.ttl,
        }
    }
}

impl<S: FactSource> FactFetcher<S> {
    pub fn new(source: Arc<S>, cache: Arc<dyn Cache<FactSet>>) -> Self {
        Self {
            source,
            cache,
            ttl: FACT_CACHE_TTL,
        }
    }

    /// Overrides the cache lifetime for fetched sets
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the fact set for `language`
    ///
    /// # Behavior
    /// - A fresh cache entry is returned without touching the remote source
    /// - On a miss, exactly one remote call is made
    /// - A successful fetch is cached for the configured TTL
    #[instrument(skip(self))]
    pub async fn fetch(&self, language: &str) -> Result<FactSet, FetchError> {
        if let Some(facts) = self.cache.get(language) {
            debug!(count = facts.len(), "Fact cache hit");
            return Ok(facts);
        }

        debug!("Fact cache miss, fetching from API");
        match self.source.fetch_facts(language).await {
            Ok(facts) => {
                self.cache.put(language, facts.clone(), self.ttl);
                Ok(facts)
            }
            Err(e) => {
                log_fetch_failure(&e);
                Err(e)
            }
        }
    }
}

fn log_fetch_failure(err: &FetchError) {
    match err {
        FetchError::Transport(e) => error!(error = %e, "Unable to retrieve DigiFacts at this time"),
        FetchError::BadStatus(code) => {
            error!(status = code, "Unexpected response code received from the API")
        }
        FetchError::Parse(e) => error!(error = %e, "Error decoding DigiFacts"),
        other => error!(error = %other, "DigiFacts fetch failed"),
    }
}
