//! Keep-Alive Task
//!
//! Periodically pings the backend health endpoint so an idle host does not
//! suspend it. Active only in production mode.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::RunMode;
use crate::error::{EdgeError, Result};
use crate::network::resolve_under;

/// Path of the health endpoint on the backend.
pub const PING_PATH: &str = "/api/ping";

/// Outcome of one successful ping. Only logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingRecord {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
}

/// Something the keep-alive task can ping.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> Result<PingRecord>;
}

// == HTTP Probe ==
/// Calls `GET <api_base>/api/ping`; non-2xx statuses are failures.
#[derive(Debug, Clone)]
pub struct HttpHealthProbe {
    client: reqwest::Client,
    url: Url,
}

impl HttpHealthProbe {
    pub fn new(client: reqwest::Client, api_base: &Url) -> Result<Self> {
        Ok(Self {
            client,
            url: resolve_under(api_base, PING_PATH, None)?,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn ping(&self) -> Result<PingRecord> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| EdgeError::Ping(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EdgeError::Ping(format!("{} returned {}", self.url, status)));
        }

        Ok(PingRecord {
            timestamp: Utc::now(),
            status: status.as_u16(),
        })
    }
}

// == Keep Alive ==
/// Owns the ping schedule. `start` pings immediately and then once per
/// interval; `stop` cancels the schedule. Outside production mode `start`
/// does nothing.
pub struct KeepAlive {
    probe: Arc<dyn HealthProbe>,
    interval: Duration,
    mode: RunMode,
    handle: Option<JoinHandle<()>>,
}

impl KeepAlive {
    pub fn new(probe: Arc<dyn HealthProbe>, interval: Duration, mode: RunMode) -> Self {
        Self {
            probe,
            interval: interval.max(Duration::from_secs(1)),
            mode,
            handle: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    // == Start ==
    /// Starts the schedule. Returns false when not in production mode or
    /// already running.
    pub fn start(&mut self) -> bool {
        if !self.mode.is_production() {
            debug!("Keep-alive disabled outside production mode");
            return false;
        }
        if self.is_running() {
            return false;
        }

        let probe = self.probe.clone();
        let interval = self.interval;
        info!("Starting keep-alive pings every {} seconds", interval.as_secs());

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                match probe.ping().await {
                    Ok(record) => info!(
                        "Keep-alive ping ok ({}) at {}",
                        record.status,
                        record.timestamp.to_rfc3339()
                    ),
                    Err(err) => warn!("Keep-alive ping failed: {}", err),
                }
            }
        }));
        true
    }

    // == Stop ==
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("Keep-alive stopped");
        }
    }

    /// Visibility hook: hidden pauses the schedule, visible resumes it
    /// (production mode only).
    pub fn set_visible(&mut self, visible: bool) {
        if visible {
            self.start();
        } else {
            self.stop();
        }
    }
}

impl Drop for KeepAlive {
    fn drop(&mut self) {
        self.stop();
    }
}
