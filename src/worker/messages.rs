//! Messages exchanged between the worker and its consumers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether an intercepted GET was answered from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HitStatus {
    Hit,
    Miss,
}

/// Wire shape: `{"type": "SKIP_WAITING"}` or
/// `{"type": "CACHE_PERFORMANCE", "url": .., "status": "hit", "timestamp": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerMessage {
    /// Activate a waiting worker right away
    SkipWaiting,
    /// Diagnostic report sent after each intercepted GET
    CachePerformance {
        url: String,
        status: HitStatus,
        timestamp: DateTime<Utc>,
    },
}

impl WorkerMessage {
    pub fn performance(url: impl Into<String>, status: HitStatus) -> Self {
        WorkerMessage::CachePerformance {
            url: url.into(),
            status,
            timestamp: Utc::now(),
        }
    }
}
