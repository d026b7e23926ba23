//! Anti-forgery tokens for the refresh endpoint
//!
//! Tokens are random strings handed to the host page when it is rendered.
//! Every page rendered within the same half-TTL window gets the same token, so
//! at most a few tokens are live at once. Each stays valid, and reusable, until
//! its TTL elapses.

use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::cache::{self, Cache, MemoryCache};

/// Length of an issued token
const TOKEN_LEN: usize = 32;

/// Default lifetime of an issued token
pub const TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Token currently handed out and when it is replaced
#[derive(Debug)]
struct CurrentToken {
    value: String,
    rotate_at: DateTime<Utc>,
}

/// Issues and checks refresh tokens
#[derive(Debug)]
pub struct TokenIssuer {
    issued: MemoryCache<()>,
    current: Mutex<Option<CurrentToken>>,
    ttl: Duration,
}

impl Default for TokenIssuer {
    fn default() -> Self {
        Self::new(TOKEN_TTL)
    }
}

impl TokenIssuer {
    pub fn new(ttl: Duration) -> Self {
        Self {
            issued: MemoryCache::new(),
            current: Mutex::new(None),
            ttl,
        }
    }

    /// Returns the current token, minting a new one once half the TTL has passed
    ///
    /// A rotated-out token keeps verifying until its own TTL ends.
    pub fn issue(&self) -> String {
        let now = Utc::now();
        let mut current = self.current.lock();
        if let Some(token) = current.as_ref().filter(|token| now < token.rotate_at) {
            return token.value.clone();
        }

        self.issued.purge_expired();

        let value: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LEN)
            .map(char::from)
            .collect();
        self.issued.put(&value, (), self.ttl);
        *current = Some(CurrentToken {
            value: value.clone(),
            rotate_at: cache::expiry(now, self.ttl / 2),
        });
        value
    }

    /// Returns true if `token` was issued here and has not expired
    pub fn verify(&self, token: Option<&str>) -> bool {
        match token {
            Some(token) if !token.is_empty() => self.issued.get(token).is_some(),
            _ => false,
        }
    }
}
