//! DigiFacts API client
//!
//! This module defines the [`FactSource`] seam used by the fetch pipeline and
//! the `reqwest`-backed implementation that talks to the public DigiFacts API.

use std::future::Future;

use reqwest::{Client, RequestBuilder, StatusCode};
use thiserror::Error;

use super::FactSet;

/// Base URL for the DigiFacts API
pub const DEFAULT_API_BASE_URL: &str = "https://digifacts.digibyte.help/";

/// Errors that can occur when fetching facts or languages
#[derive(Debug, Error)]
pub enum FetchError {
    /// The API could not be reached
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with something other than 200 OK
    #[error("Unexpected response code: {0}")]
    BadStatus(u16),

    /// The body was not the expected JSON document
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The API returned a valid but empty fact list
    #[error("No facts returned for the requested language")]
    EmptyResult,

    /// The language code is not one the API supports
    #[error("Unsupported language code: '{0}'")]
    InvalidLanguage(String),
}

/// Remote provider of fact sets and supported language codes
///
/// The fetch pipeline only depends on this trait so tests can substitute an
/// in-memory source and count calls.
pub trait FactSource: Send + Sync {
    /// Fetches every fact for `language`
    fn fetch_facts(
        &self,
        language: &str,
    ) -> impl Future<Output = Result<FactSet, FetchError>> + Send;

    /// Fetches the list of language codes the API can serve
    fn fetch_languages(&self) -> impl Future<Output = Result<Vec<String>, FetchError>> + Send;
}

/// Client for the DigiFacts HTTP API
#[derive(Debug, Clone)]
pub struct HttpFactSource {
    client: Client,
    base_url: String,
}

impl Default for HttpFactSource {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpFactSource {
    /// Create a client pointed at the public API
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_BASE_URL)
    }

    /// Create a client pointed at a custom base URL (mirrors, local stubs)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn facts_request(&self, language: &str) -> RequestBuilder {
        self.client
            .get(&self.base_url)
            .query(&[("format", "html"), ("lang", language)])
    }

    /// The endpoint only checks that `get_langs` is present, so it carries no value
    fn languages_request(&self) -> RequestBuilder {
        self.client.get(&self.base_url).query(&[("get_langs", "")])
    }

    /// Sends a GET and returns the body of a 200 response
    async fn get_body(&self, request: RequestBuilder) -> Result<String, FetchError> {
        let response = request.send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::BadStatus(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

impl FactSource for HttpFactSource {
    async fn fetch_facts(&self, language: &str) -> Result<FactSet, FetchError> {
        let body = self.get_body(self.facts_request(language)).await?;
        let facts: FactSet = serde_json::from_str(&body)?;

        if facts.is_empty() {
            return Err(FetchError::EmptyResult);
        }
        Ok(facts)
    }

    async fn fetch_languages(&self) -> Result<Vec<String>, FetchError> {
        let body = self.get_body(self.languages_request()).await?;
        Ok(serde_json::from_str(&body)?)
    }
}
