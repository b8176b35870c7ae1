//! Cache Entry Module
//!
//! A stored network response together with the request it answers.

use chrono::{DateTime, Utc};

use crate::network::{FetchResponse, RequestKey};

// == Cache Entry ==
/// A cached response. Owned by exactly one generation.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Identity of the request this entry answers
    pub key: RequestKey,
    /// Stored response: status, headers, body
    pub response: FetchResponse,
    /// When the entry was written
    pub cached_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(key: RequestKey, response: FetchResponse) -> Self {
        Self {
            key,
            response,
            cached_at: Utc::now(),
        }
    }

    /// Body size in bytes.
    pub fn size(&self) -> usize {
        self.response.body.len()
    }

    /// Milliseconds since the entry was written.
    pub fn age_ms(&self) -> i64 {
        (Utc::now() - self.cached_at).num_milliseconds().max(0)
    }
}
