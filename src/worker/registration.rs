//! Worker Registration
//!
//! Tracks the controlling worker and at most one waiting successor, and
//! routes fetches to whichever worker currently controls.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::error::Result;
use crate::network::{FetchRequest, FetchResponse, Network};
use crate::worker::{Worker, WorkerMessage, WorkerState};

/// Version and state of a registered worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerStatus {
    pub version: String,
    pub state: WorkerState,
}

pub struct Registration {
    controller: RwLock<Option<Arc<Worker>>>,
    waiting: RwLock<Option<Arc<Worker>>>,
    /// Used when no worker controls yet
    network: Arc<dyn Network>,
}

impl Registration {
    pub fn new(network: Arc<dyn Network>) -> Self {
        Self {
            controller: RwLock::new(None),
            waiting: RwLock::new(None),
            network,
        }
    }

    // == Register ==
    /// Installs `worker`. With no controller it activates at once;
    /// otherwise it waits until `activate_waiting` or a `SKIP_WAITING`
    /// message. A previous waiting worker is superseded.
    pub async fn register(&self, worker: Arc<Worker>) -> Result<()> {
        worker.install().await?;

        // Held across the decision so concurrent registrations serialize.
        let mut controller = self.controller.write().await;
        if controller.is_none() {
            worker.activate().await?;
            *controller = Some(worker);
            return Ok(());
        }

        let previous = self.waiting.write().await.replace(worker.clone());
        drop(controller);
        if let Some(previous) = previous {
            previous.supersede().await?;
        }
        info!("Worker {} installed and waiting", worker.version());
        Ok(())
    }

    // == Activate Waiting ==
    /// Hands control to the waiting worker. Returns false when nothing waits.
    /// A worker that fails to activate stays waiting.
    pub async fn activate_waiting(&self) -> Result<bool> {
        let mut controller = self.controller.write().await;
        let mut waiting = self.waiting.write().await;
        let Some(next) = waiting.take() else {
            return Ok(false);
        };

        if let Err(err) = next.activate().await {
            warn!("Worker {} failed to activate: {}", next.version(), err);
            *waiting = Some(next);
            return Err(err);
        }
        drop(waiting);

        if let Some(previous) = controller.replace(next) {
            if let Err(err) = previous.supersede().await {
                warn!("Failed to supersede worker {}: {}", previous.version(), err);
            }
        }
        Ok(true)
    }

    // == Post Message ==
    /// Handles a message from a consumer. Returns whether it changed anything.
    pub async fn post_message(&self, message: WorkerMessage) -> Result<bool> {
        match message {
            WorkerMessage::SkipWaiting => {
                info!("SKIP_WAITING received");
                self.activate_waiting().await
            }
            WorkerMessage::CachePerformance { .. } => Ok(false),
        }
    }

    // == Fetch ==
    pub async fn handle_fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        let controller = self.controller.read().await.clone();
        match controller {
            Some(worker) => worker.handle_fetch(request).await,
            None => self.network.fetch(request).await,
        }
    }

    pub async fn controller(&self) -> Option<WorkerStatus> {
        let worker = self.controller.read().await.clone()?;
        Some(status_of(&worker).await)
    }

    pub async fn waiting(&self) -> Option<WorkerStatus> {
        let worker = self.waiting.read().await.clone()?;
        Some(status_of(&worker).await)
    }
}

async fn status_of(worker: &Worker) -> WorkerStatus {
    WorkerStatus {
        version: worker.version().to_string(),
        state: worker.state().await,
    }
}
