//! In-memory fact source for unit tests

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::data::{FactSet, FactSource, FetchError};

/// What the mock answers for fact requests
#[derive(Debug, Clone)]
enum FactReply {
    Facts(FactSet),
    Status(u16),
    Garbage,
}

/// Counting stand-in for the DigiFacts API
#[derive(Debug)]
pub struct MockSource {
    facts: FactReply,
    languages: Option<Vec<String>>,
    fact_calls: AtomicUsize,
    language_calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl MockSource {
    fn new(facts: FactReply) -> Self {
        Self {
            facts,
            languages: Some(vec!["en".to_string(), "de".to_string(), "es".to_string()]),
            fact_calls: AtomicUsize::new(0),
            language_calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn with_facts(facts: FactSet) -> Self {
        Self::new(FactReply::Facts(facts))
    }

    pub fn failing_status(status: u16) -> Self {
        Self::new(FactReply::Status(status))
    }

    pub fn garbage() -> Self {
        Self::new(FactReply::Garbage)
    }

    /// Replaces the supported languages; `None` makes the language call fail
    pub fn languages(mut self, languages: Option<&[&str]>) -> Self {
        self.languages = languages.map(|codes| codes.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn fact_calls(&self) -> usize {
        self.fact_calls.load(Ordering::SeqCst)
    }

    pub fn language_calls(&self) -> usize {
        self.language_calls.load(Ordering::SeqCst)
    }

    pub fn requested_languages(&self) -> Vec<String> {
        self.requested.lock().clone()
    }
}

impl FactSource for MockSource {
    async fn fetch_facts(&self, language: &str) -> Result<FactSet, FetchError> {
        self.fact_calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().push(language.to_string());

        match &self.facts {
            FactReply::Facts(facts) if facts.is_empty() => Err(FetchError::EmptyResult),
            FactReply::Facts(facts) => Ok(facts.clone()),
            FactReply::Status(status) => Err(FetchError::BadStatus(*status)),
            FactReply::Garbage => {
                Err(serde_json::from_str::<FactSet>("not json").unwrap_err().into())
            }
        }
    }

    async fn fetch_languages(&self) -> Result<Vec<String>, FetchError> {
        self.language_calls.fetch_add(1, Ordering::SeqCst);
        self.languages.clone().ok_or(FetchError::BadStatus(503))
    }
}
