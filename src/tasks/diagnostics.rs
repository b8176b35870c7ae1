//! Diagnostics Task
//!
//! Consumes `CACHE_PERFORMANCE` reports from the worker broadcast channel
//! and keeps a running hit/miss tally.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::worker::{HitStatus, WorkerMessage};

/// Served-from-cache tally over intercepted GETs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PerformanceTally {
    pub hits: u64,
    pub misses: u64,
    pub last_url: Option<String>,
}

impl PerformanceTally {
    pub fn record(&mut self, url: &str, status: HitStatus) {
        match status {
            HitStatus::Hit => self.hits += 1,
            HitStatus::Miss => self.misses += 1,
        }
        self.last_url = Some(url.to_string());
    }
}

/// Spawns the consumer. It ends when every sender is dropped.
pub fn spawn_diagnostics_task(
    mut events: broadcast::Receiver<WorkerMessage>,
    tally: Arc<RwLock<PerformanceTally>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(WorkerMessage::CachePerformance { url, status, .. }) => {
                    debug!("cache {:?}: {}", status, url);
                    tally.write().await.record(&url, status);
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Diagnostics lagged, skipped {} reports", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
