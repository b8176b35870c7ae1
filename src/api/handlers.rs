//! API Handlers
//!
//! HTTP request handlers for the edge endpoints and the interceptor fallback.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    body::Body,
    extract::{Request, State},
    response::{IntoResponse, Response},
    Json,
};
use url::Url;

use crate::cache::CacheStore;
use crate::error::Result;
use crate::models::{
    into_fetch_request, strip_hop_headers, MessageResponse, PingResponse, StatsResponse,
};
use crate::network::FetchResponse;
use crate::tasks::PerformanceTally;
use crate::worker::{Registration, WorkerMessage};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cache store shared with the workers
    pub cache: Arc<RwLock<CacheStore>>,
    /// Worker registration that answers proxied requests
    pub registration: Arc<Registration>,
    /// Origin that proxied requests are sent to
    pub upstream: Url,
    /// Hit/miss tally fed by the diagnostics task
    pub performance: Arc<RwLock<PerformanceTally>>,
}

impl AppState {
    pub fn new(
        cache: Arc<RwLock<CacheStore>>,
        registration: Arc<Registration>,
        upstream: Url,
    ) -> Self {
        Self {
            cache,
            registration,
            upstream,
            performance: Arc::new(RwLock::new(PerformanceTally::default())),
        }
    }
}

/// Handler for GET /api/ping
pub async fn ping_handler() -> Json<PingResponse> {
    Json(PingResponse::ok())
}

/// Handler for GET /api/edge/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let (cache, generations): (_, Vec<String>) = {
        let store = state.cache.read().await;
        (store.stats(), store.generations().into_iter().collect())
    };
    let performance = state.performance.read().await.clone();

    Json(StatsResponse {
        hit_rate: cache.hit_rate(),
        cache,
        generations,
        controller: state.registration.controller().await.map(Into::into),
        waiting: state.registration.waiting().await.map(Into::into),
        performance,
    })
}

/// Handler for POST /api/edge/message
///
/// Accepts `{"type": "SKIP_WAITING"}` to activate a waiting worker.
pub async fn message_handler(
    State(state): State<AppState>,
    Json(message): Json<WorkerMessage>,
) -> Result<Json<MessageResponse>> {
    let applied = state.registration.post_message(message).await?;
    let controller = state.registration.controller().await.map(|c| c.version);

    Ok(Json(MessageResponse {
        applied,
        controller,
    }))
}

/// Fallback handler: every other request goes through the worker.
pub async fn intercept_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Result<FetchResponse> {
    let fetch = into_fetch_request(request, &state.upstream).await?;
    state.registration.handle_fetch(&fetch).await
}

impl IntoResponse for FetchResponse {
    fn into_response(self) -> Response {
        let mut headers = self.headers;
        strip_hop_headers(&mut headers);
        (self.status, headers, self.body).into_response()
    }
}
