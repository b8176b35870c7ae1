//! Shared test doubles for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::StatusCode;
use tokio::sync::{broadcast, RwLock};
use url::Url;

use tailor_edge::cache::CacheStore;
use tailor_edge::network::{FetchRequest, FetchResponse, Network};
use tailor_edge::worker::{Manifest, Worker, WorkerMessage};
use tailor_edge::{EdgeError, Result};

pub const ORIGIN: &str = "https://shop.test";

pub fn url(path: &str) -> Url {
    Url::parse(ORIGIN).unwrap().join(path).unwrap()
}

pub fn parse_url(raw: &str) -> Url {
    Url::parse(raw).unwrap()
}

pub fn manifest() -> Manifest {
    Manifest::new(["/", "/index.html", "/manifest.json", "/logo192.png"])
}

// == Mock Network ==
/// Serves canned responses by URL and counts every call. Unknown URLs get
/// a 404; `set_offline(true)` turns every call into a transport error.
#[derive(Default)]
pub struct MockNetwork {
    routes: Mutex<HashMap<String, FetchResponse>>,
    offline: AtomicBool,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl MockNetwork {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A network that answers 200 for every manifest path.
    pub fn with_manifest() -> Arc<Self> {
        let network = Self::new();
        for path in manifest().paths() {
            network.route(path, StatusCode::OK, format!("asset {}", path));
        }
        network
    }

    pub fn route(&self, path: &str, status: StatusCode, body: impl Into<String>) {
        self.route_url(&url(path), status, body);
    }

    pub fn route_url(&self, target: &Url, status: StatusCode, body: impl Into<String>) {
        let body: String = body.into();
        self.routes
            .lock()
            .unwrap()
            .insert(target.to_string(), FetchResponse::new(status, body));
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn reset_calls(&self) {
        self.calls.store(0, Ordering::SeqCst);
        self.seen.lock().unwrap().clear();
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Network for MockNetwork {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push(format!("{} {}", request.method, request.url));

        if self.offline.load(Ordering::SeqCst) {
            return Err(EdgeError::Network("offline".to_string()));
        }

        let routes = self.routes.lock().unwrap();
        Ok(routes
            .get(request.url.as_str())
            .cloned()
            .unwrap_or_else(|| FetchResponse::new(StatusCode::NOT_FOUND, "not found")))
    }
}

// == Worker Fixture ==
pub struct Fixture {
    pub network: Arc<MockNetwork>,
    pub cache: Arc<RwLock<CacheStore>>,
    pub events: broadcast::Sender<WorkerMessage>,
}

impl Fixture {
    pub fn new(network: Arc<MockNetwork>) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            network,
            cache: Arc::new(RwLock::new(CacheStore::new(100))),
            events,
        }
    }

    pub fn worker(&self, version: &str) -> Arc<Worker> {
        self.worker_at(version, Url::parse(ORIGIN).unwrap())
    }

    /// A worker whose assets live beneath `origin`, path prefix included.
    pub fn worker_at(&self, version: &str, origin: Url) -> Arc<Worker> {
        Arc::new(Worker::new(
            version,
            origin,
            manifest(),
            self.cache.clone(),
            self.network.clone(),
            self.events.clone(),
        ))
    }

    /// An installed and activated worker.
    pub async fn active_worker(&self, version: &str) -> Arc<Worker> {
        let worker = self.worker(version);
        worker.install().await.unwrap();
        worker.activate().await.unwrap();
        worker
    }
}
