//! Supported-language catalog
//!
//! The list of language codes the API serves is cached with its own TTL and
//! refreshed explicitly or on expiry, never on every page view. When a refresh
//! fails the last list that was successfully fetched keeps being used.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{Cache, MemoryCache};
use crate::data::{FactSource, FetchError, DEFAULT_LANGUAGE};

/// Default lifetime of the cached language list
pub const LANGUAGES_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// How long a failed language-list fetch suppresses further attempts
pub const LANGUAGES_RETRY_DELAY: Duration = Duration::from_secs(60);

/// Cache key for the language list
const LANGUAGES_CACHE_KEY: &str = "supported_languages";

/// Set of supported language codes
pub type LanguageSet = Arc<BTreeSet<String>>;

/// Checks `code` against `supported`
pub fn validate(code: &str, supported: &BTreeSet<String>) -> Result<(), FetchError> {
    if supported.contains(code) {
        Ok(())
    } else {
        Err(FetchError::InvalidLanguage(code.to_string()))
    }
}

/// Cached view of the languages offered by a [`FactSource`]
pub struct LanguageCatalog<S> {
    source: Arc<S>,
    cache: MemoryCache<LanguageSet>,
    /// Marks a recent failed fetch so page views don't retry it each time
    failed: MemoryCache<()>,
    last_known: RwLock<Option<LanguageSet>>,
    ttl: Duration,
    retry_delay: Duration,
}

impl<S: FactSource> LanguageCatalog<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            cache: MemoryCache::new(),
            failed: MemoryCache::new(),
            last_known: RwLock::new(None),
            ttl: LANGUAGES_CACHE_TTL,
            retry_delay: LANGUAGES_RETRY_DELAY,
        }
    }

    /// Overrides the cache lifetime for the language list
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Overrides how long a failed fetch is remembered before retrying
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Fetches the language list now, replacing the cached one
    pub async fn refresh(&self) -> Result<LanguageSet, FetchError> {
        match self.source.fetch_languages().await {
            Ok(codes) => {
                let set: LanguageSet = Arc::new(codes.into_iter().collect());
                info!(count = set.len(), "Reloaded supported languages");
                self.cache.put(LANGUAGES_CACHE_KEY, Arc::clone(&set), self.ttl);
                *self.last_known.write() = Some(Arc::clone(&set));
                Ok(set)
            }
            Err(FetchError::Parse(e)) => {
                warn!(error = %e, "Invalid languages array received from the API");
                Err(FetchError::Parse(e))
            }
            Err(e) => {
                warn!(error = %e, "Unable to fetch languages from the API");
                Err(e)
            }
        }
    }

    /// Returns the supported set, refreshing it if the cached copy expired
    ///
    /// Falls back to the last successfully fetched list when the refresh
    /// fails, and to `None` if no list was ever fetched. After a failure no
    /// further fetch is attempted until the retry delay has passed.
    pub async fn supported(&self) -> Option<LanguageSet> {
        if let Some(set) = self.cache.get(LANGUAGES_CACHE_KEY) {
            return Some(set);
        }
        if self.failed.get(LANGUAGES_CACHE_KEY).is_some() {
            return self.last_known.read().clone();
        }
        match self.refresh().await {
            Ok(set) => Some(set),
            Err(_) => {
                self.failed.put(LANGUAGES_CACHE_KEY, (), self.retry_delay);
                self.last_known.read().clone()
            }
        }
    }

    /// Maps a configured language code to one the API supports
    ///
    /// Unknown, empty or placeholder codes fall back to the default language
    /// rather than failing.
    pub async fn resolve(&self, code: &str) -> String {
        let code = code.trim();
        if code.is_empty() || code == "0" {
            warn!(code, "Invalid language code in settings, using default");
            return DEFAULT_LANGUAGE.to_string();
        }

        let Some(supported) = self.supported().await else {
            debug!(code, "No supported-language list available, using default");
            return DEFAULT_LANGUAGE.to_string();
        };

        match validate(code, &supported) {
            Ok(()) => code.to_string(),
            Err(e) => {
                warn!(error = %e, fallback = DEFAULT_LANGUAGE, "Falling back to default language");
                DEFAULT_LANGUAGE.to_string()
            }
        }
    }
}
