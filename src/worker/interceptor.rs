//! Fetch Interceptor
//!
//! A versioned worker that owns the static and dynamic generations of one
//! cache version, pre-populates the static generation on install, purges
//! other generations on activation, and answers fetches with a caching
//! strategy chosen per request.

use std::sync::Arc;

use axum::http::Method;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::cache::{dynamic_generation, static_generation, CacheEntry, CacheStore};
use crate::error::{EdgeError, Result};
use crate::network::{
    is_cacheable_scheme, resolve_under, FetchRequest, FetchResponse, Network, RequestKey,
};
use crate::worker::{
    classify_under, HitStatus, LifecycleEvent, Manifest, RequestKind, WorkerMessage, WorkerState,
};

// == Response Source ==
/// Where a served response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Network,
    Cache,
    /// Synthesized offline page
    Offline,
}

/// A response together with its source.
#[derive(Debug, Clone)]
pub struct Served {
    pub response: FetchResponse,
    pub source: ResponseSource,
}

impl Served {
    fn network(response: FetchResponse) -> Self {
        Self {
            response,
            source: ResponseSource::Network,
        }
    }

    fn cache(entry: CacheEntry) -> Self {
        Self {
            response: entry.response,
            source: ResponseSource::Cache,
        }
    }

    fn offline() -> Self {
        Self {
            response: FetchResponse::offline_page(),
            source: ResponseSource::Offline,
        }
    }
}

// == Worker ==
pub struct Worker {
    version: String,
    origin: Url,
    manifest: Manifest,
    cache: Arc<RwLock<CacheStore>>,
    network: Arc<dyn Network>,
    state: RwLock<WorkerState>,
    events: broadcast::Sender<WorkerMessage>,
}

impl Worker {
    /// Creates an uninitialized worker for cache `version`. Manifest paths
    /// and the navigation fallback resolve beneath `origin`, including any
    /// path prefix it carries.
    pub fn new(
        version: impl Into<String>,
        origin: Url,
        manifest: Manifest,
        cache: Arc<RwLock<CacheStore>>,
        network: Arc<dyn Network>,
        events: broadcast::Sender<WorkerMessage>,
    ) -> Self {
        Self {
            version: version.into(),
            origin,
            manifest,
            cache,
            network,
            state: RwLock::new(WorkerState::Uninitialized),
            events,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub async fn state(&self) -> WorkerState {
        *self.state.read().await
    }

    pub fn static_cache(&self) -> String {
        static_generation(&self.version)
    }

    pub fn dynamic_cache(&self) -> String {
        dynamic_generation(&self.version)
    }

    async fn transition(&self, event: LifecycleEvent) -> Result<WorkerState> {
        let mut state = self.state.write().await;
        *state = state.on(event)?;
        Ok(*state)
    }

    // == Install ==
    /// Fetches every manifest asset and, only if all succeed, writes them
    /// into the static generation. Any failure aborts the whole install.
    pub async fn install(&self) -> Result<()> {
        self.transition(LifecycleEvent::Install).await?;
        info!("Installing worker {}", self.version);

        let result = match self.fetch_manifest().await {
            Ok(entries) => self.write_static(entries).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(()) => {
                self.transition(LifecycleEvent::Installed).await?;
                info!(
                    "Worker {} installed, {} assets pre-cached in {}",
                    self.version,
                    self.manifest.len(),
                    self.static_cache()
                );
                Ok(())
            }
            Err(err) => {
                self.transition(LifecycleEvent::InstallFailed).await?;
                error!("Worker {} install failed: {}", self.version, err);
                Err(err)
            }
        }
    }

    async fn write_static(&self, entries: Vec<CacheEntry>) -> Result<()> {
        let name = self.static_cache();
        let mut cache = self.cache.write().await;
        cache.open_pinned(&name);
        for entry in entries {
            cache.put(&name, entry)?;
        }
        Ok(())
    }

    async fn fetch_manifest(&self) -> Result<Vec<CacheEntry>> {
        let mut entries = Vec::with_capacity(self.manifest.len());

        for path in self.manifest.paths() {
            let (path_only, query) = match path.split_once('?') {
                Some((path_only, query)) => (path_only, Some(query)),
                None => (path.as_str(), None),
            };
            let url = resolve_under(&self.origin, path_only, query).map_err(|e| {
                EdgeError::InstallFailed {
                    url: path.clone(),
                    reason: e.to_string(),
                }
            })?;
            if !is_cacheable_scheme(&url) {
                return Err(EdgeError::InstallFailed {
                    url: url.to_string(),
                    reason: "unsupported scheme".to_string(),
                });
            }

            let request = FetchRequest::get(url.clone());
            let response = self.network.fetch(&request).await.map_err(|e| {
                EdgeError::InstallFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            })?;

            if !response.is_success() {
                return Err(EdgeError::InstallFailed {
                    url: url.to_string(),
                    reason: format!("status {}", response.status),
                });
            }

            entries.push(CacheEntry::new(request.key(), response));
        }

        Ok(entries)
    }

    // == Activate ==
    /// Takes over: deletes every generation outside this worker's
    /// allow-list. Returns the names that were purged.
    pub async fn activate(&self) -> Result<Vec<String>> {
        self.transition(LifecycleEvent::Activate).await?;

        let keep = [self.static_cache(), self.dynamic_cache()];
        let allow: Vec<&str> = keep.iter().map(String::as_str).collect();
        let stale = self.cache.read().await.stale_generations(&allow);

        let mut purged = Vec::with_capacity(stale.len());
        for name in stale {
            if self.cache.write().await.delete_generation(&name) {
                info!("Deleted stale cache generation {}", name);
                purged.push(name);
            } else {
                warn!("Stale cache generation {} was already gone", name);
            }
        }

        info!("Worker {} active", self.version);
        Ok(purged)
    }

    /// Marks this worker as replaced; it stops intercepting.
    pub async fn supersede(&self) -> Result<()> {
        self.transition(LifecycleEvent::Supersede).await?;
        info!("Worker {} superseded", self.version);
        Ok(())
    }

    // == Fetch ==
    /// Answers one request.
    ///
    /// Non-GET requests, requests reaching a worker that is not active, and
    /// non-http(s) URLs go straight to the network. Every other GET is
    /// served by the strategy for its class and reported to observers.
    pub async fn handle_fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        if request.method != Method::GET || !self.state().await.intercepts() {
            return self.network.fetch(request).await;
        }

        if !request.is_cacheable_scheme() {
            debug!("Bypassing cache for {}", request.url);
            return self.network.fetch(request).await;
        }

        let outcome = match classify_under(&self.origin, request, &self.manifest) {
            RequestKind::StaticAsset => self.cache_first(request, &self.static_cache()).await,
            RequestKind::Image => self.cache_first(request, &self.dynamic_cache()).await,
            RequestKind::Api | RequestKind::Other => {
                self.network_first(request, &self.dynamic_cache()).await
            }
            RequestKind::Navigation => Ok(self.navigation(request).await),
        };

        let status = match &outcome {
            Ok(served) if served.source == ResponseSource::Cache => HitStatus::Hit,
            _ => HitStatus::Miss,
        };
        self.report(request, status);

        outcome.map(|served| served.response)
    }

    async fn cache_first(&self, request: &FetchRequest, generation: &str) -> Result<Served> {
        let key = request.key();
        let cached = self.cache.write().await.match_request(&key);
        if let Some(entry) = cached {
            return Ok(Served::cache(entry));
        }

        let response = self.network.fetch(request).await?;
        if response.is_success() {
            self.store_copy(generation, key, &response).await;
        }
        Ok(Served::network(response))
    }

    async fn network_first(&self, request: &FetchRequest, generation: &str) -> Result<Served> {
        let key = request.key();

        match self.network.fetch(request).await {
            Ok(response) => {
                if response.is_success() {
                    self.store_copy(generation, key, &response).await;
                }
                Ok(Served::network(response))
            }
            Err(err) => {
                let cached = self.cache.write().await.match_request(&key);
                match cached {
                    Some(entry) => {
                        warn!("Network failed for {}, serving cached copy", request.url);
                        Ok(Served::cache(entry))
                    }
                    None => Err(err),
                }
            }
        }
    }

    async fn navigation(&self, request: &FetchRequest) -> Served {
        match self.network.fetch(request).await {
            Ok(response) => Served::network(response),
            Err(err) => {
                warn!("Navigation to {} failed: {}", request.url, err);
                let root = match resolve_under(&self.origin, "/", None) {
                    Ok(url) => RequestKey::new(&Method::GET, &url),
                    Err(_) => return Served::offline(),
                };
                let cached = self.cache.write().await.match_request(&root);
                cached.map(Served::cache).unwrap_or_else(Served::offline)
            }
        }
    }

    /// Best-effort write of a response copy; failures are only logged.
    async fn store_copy(&self, generation: &str, key: RequestKey, response: &FetchResponse) {
        let entry = CacheEntry::new(key, response.clone());
        if let Err(err) = self.cache.write().await.put(generation, entry) {
            warn!("Failed to cache response in {}: {}", generation, err);
        }
    }

    fn report(&self, request: &FetchRequest, status: HitStatus) {
        debug!("{:?} {}", status, request.url);
        // No receivers is fine; diagnostics are optional.
        let _ = self
            .events
            .send(WorkerMessage::performance(request.url.as_str(), status));
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("version", &self.version)
            .field("origin", &self.origin.as_str())
            .field("manifest", &self.manifest.paths())
            .finish()
    }
}
