//! DigiFacts library
//!
//! Fetches language-specific fact sets from the DigiFacts API, caches them
//! briefly, picks one at random and renders it as an embeddable fragment.

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod fetcher;
pub mod languages;
pub mod refresh;
pub mod render;
pub mod select;
pub mod server;
pub mod token;

#[cfg(test)]
mod testing;

pub use app::{DigiFacts, RefreshOutcome, RefreshPayload};
pub use config::{DisplayMode, Settings};
pub use data::{Fact, FactSet, FactSource, FetchError, HttpFactSource};
