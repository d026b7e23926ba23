//! Core data models for DigiFacts
//!
//! This module contains the fact types fetched from the DigiFacts API and the
//! source abstraction used to retrieve them.

pub mod source;

pub use source::{FactSource, FetchError, HttpFactSource, DEFAULT_API_BASE_URL};

use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Language used when the configured one is missing or unsupported
pub const DEFAULT_LANGUAGE: &str = "en";

/// A single educational snippet
///
/// `content` is rich text as delivered by the API and must be sanitized before
/// it is placed in a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    /// Short heading for the fact
    pub title: String,
    /// HTML body of the fact
    pub content: String,
}

/// All facts available for one language
///
/// Cloning is cheap: the facts are shared behind an `Arc` and never mutated
/// after the set is built. A refetch replaces the whole set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<Fact>")]
pub struct FactSet {
    facts: Arc<[Fact]>,
}

impl FactSet {
    pub fn new(facts: Vec<Fact>) -> Self {
        Self {
            facts: facts.into(),
        }
    }

    pub fn as_slice(&self) -> &[Fact] {
        &self.facts
    }
}

impl From<Vec<Fact>> for FactSet {
    fn from(facts: Vec<Fact>) -> Self {
        Self::new(facts)
    }
}

impl Deref for FactSet {
    type Target = [Fact];

    fn deref(&self) -> &[Fact] {
        &self.facts
    }
}
