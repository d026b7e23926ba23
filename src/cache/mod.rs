//! Cache module for holding API responses in memory
//!
//! This module provides a small time-bounded store used for fact sets, the
//! supported-language list and issued refresh tokens. Entries whose TTL has
//! elapsed read exactly like missing ones.

mod manager;

use std::time::Duration;

pub(crate) use manager::expiry;
pub use manager::MemoryCache;

/// Key/value store with per-entry expiry
///
/// The pipeline takes caches through this trait so callers can supply their
/// own store or a test double.
pub trait Cache<V>: Send + Sync {
    /// Returns the value for `key` if it exists and has not expired
    fn get(&self, key: &str) -> Option<V>;

    /// Stores `value` under `key` for `ttl`, replacing any previous entry
    fn put(&self, key: &str, value: V, ttl: Duration);
}
