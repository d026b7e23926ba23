//! The fetch, select and render pipeline behind every entry point
//!
//! `DigiFacts` ties the settings, fact fetcher, language catalog and token
//! issuer together. The HTTP server and the CLI both go through it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cache::{Cache, MemoryCache};
use crate::config::{DisplayMode, Settings};
use crate::data::{Fact, FactSet, FactSource, FetchError};
use crate::fetcher::FactFetcher;
use crate::languages::LanguageCatalog;
use crate::render::{self, SafeFact, UNAVAILABLE_MESSAGE};
use crate::select;
use crate::token::TokenIssuer;

/// Message returned when a refresh request carries a bad token
pub const REJECTED_MESSAGE: &str = "Invalid request.";

/// Result of a refresh request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A newly selected fact
    Fact(SafeFact),
    /// Facts could not be loaded
    Unavailable,
    /// The token was missing, unknown or expired
    Rejected,
}

/// JSON body returned to the refreshing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshPayload {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<SafeFact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RefreshPayload {
    fn failure(message: &str) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.to_string()),
        }
    }
}

impl From<RefreshOutcome> for RefreshPayload {
    fn from(outcome: RefreshOutcome) -> Self {
        match outcome {
            RefreshOutcome::Fact(fact) => Self {
                success: true,
                data: Some(fact),
                message: None,
            },
            RefreshOutcome::Unavailable => Self::failure(UNAVAILABLE_MESSAGE),
            RefreshOutcome::Rejected => Self::failure(REJECTED_MESSAGE),
        }
    }
}

/// Fact pipeline bound to one set of settings
pub struct DigiFacts<S> {
    settings: Settings,
    fetcher: FactFetcher<S>,
    catalog: LanguageCatalog<S>,
    tokens: TokenIssuer,
}

impl<S: FactSource> DigiFacts<S> {
    /// Creates a pipeline with its own in-memory fact cache
    pub fn new(settings: Settings, source: S) -> Self {
        Self::with_cache(settings, Arc::new(source), Arc::new(MemoryCache::<FactSet>::new()))
    }

    /// Creates a pipeline around a caller-supplied fact cache
    pub fn with_cache(
        settings: Settings,
        source: Arc<S>,
        cache: Arc<dyn Cache<FactSet>>,
    ) -> Self {
        let fetcher = FactFetcher::new(Arc::clone(&source), cache).with_ttl(settings.fact_ttl());
        let catalog = LanguageCatalog::new(source).with_ttl(settings.languages_ttl());
        let tokens = TokenIssuer::new(settings.token_ttl());
        Self {
            settings,
            fetcher,
            catalog,
            tokens,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn display(&self) -> DisplayMode {
        self.settings.display
    }

    pub fn source(&self) -> &S {
        self.fetcher.source()
    }

    pub fn catalog(&self) -> &LanguageCatalog<S> {
        &self.catalog
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// The configured language, or the default if it is not supported
    pub async fn active_language(&self) -> String {
        self.catalog.resolve(&self.settings.language).await
    }

    /// Fact set for the active language
    pub async fn facts(&self) -> Result<FactSet, FetchError> {
        let language = self.active_language().await;
        self.fetcher.fetch(&language).await
    }

    /// One randomly selected fact for the active language
    pub async fn random_fact(&self) -> Result<Fact, FetchError> {
        let facts = self.facts().await?;
        select::select(&facts).cloned().ok_or(FetchError::EmptyResult)
    }

    /// Renders a random fact, or the unavailable message on any failure
    pub async fn render_fragment(&self) -> String {
        match self.random_fact().await {
            Ok(fact) => render::render(&fact, self.settings.display),
            Err(_) => render::render_unavailable(self.settings.display),
        }
    }

    /// Expands every `[digifacts]` placeholder in `page`
    ///
    /// The fact set is fetched once and each placeholder gets its own
    /// independently selected fact.
    pub async fn expand_shortcodes(&self, page: &str) -> String {
        if !page.contains(render::SHORTCODE) {
            return page.to_string();
        }

        let display = self.settings.display;
        match self.facts().await {
            Ok(facts) => render::expand_with(page, || match select::select(&facts) {
                Some(fact) => render::render(fact, display),
                None => render::render_unavailable(display),
            }),
            Err(_) => render::expand_with(page, || render::render_unavailable(display)),
        }
    }

    /// Handles a refresh request from the host page
    ///
    /// The token is checked before any fetch happens.
    pub async fn refresh(&self, token: Option<&str>) -> RefreshOutcome {
        if !self.tokens.verify(token) {
            warn!("Rejected refresh request with invalid token");
            return RefreshOutcome::Rejected;
        }

        match self.random_fact().await {
            Ok(fact) => RefreshOutcome::Fact(SafeFact::from(&fact)),
            Err(_) => RefreshOutcome::Unavailable,
        }
    }

    /// Loads the language list and the active language's facts ahead of traffic
    pub async fn prefetch(&self) -> Result<(), FetchError> {
        self.catalog.refresh().await?;
        let language = self.active_language().await;
        let facts = self.fetcher.fetch(&language).await?;
        info!(language = %language, count = facts.len(), "Prefetched facts");
        Ok(())
    }
}
