//! Response DTOs for the edge API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::tasks::PerformanceTally;
use crate::worker::{WorkerState, WorkerStatus};

/// Response body for the health endpoint (GET /api/ping)
#[derive(Debug, Clone, Serialize)]
pub struct PingResponse {
    /// Always "ok"
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    pub message: String,
}

impl PingResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            message: "Server is awake".to_string(),
        }
    }
}

/// A registered worker as reported by the stats endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerSummary {
    pub version: String,
    pub state: WorkerState,
}

impl From<WorkerStatus> for WorkerSummary {
    fn from(status: WorkerStatus) -> Self {
        Self {
            version: status.version,
            state: status.state,
        }
    }
}

/// Response body for the stats endpoint (GET /api/edge/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub cache: CacheStats,
    /// Store lookup hit rate
    pub hit_rate: f64,
    pub generations: Vec<String>,
    pub controller: Option<WorkerSummary>,
    pub waiting: Option<WorkerSummary>,
    /// Per-request served-from-cache tally
    pub performance: PerformanceTally,
}

/// Response body for POST /api/edge/message
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// Whether the message changed worker state
    pub applied: bool,
    pub controller: Option<String>,
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
