//! API Routes
//!
//! Configures the Axum router with the edge endpoints and the interceptor
//! fallback.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    intercept_handler, message_handler, ping_handler, stats_handler, AppState,
};

/// Creates the main router.
///
/// # Endpoints
/// - `GET /api/ping` - Health check
/// - `GET /api/edge/stats` - Cache and worker diagnostics
/// - `POST /api/edge/message` - Worker messages (`SKIP_WAITING`)
/// - anything else - answered by the worker registration
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/ping", get(ping_handler))
        .route("/api/edge/stats", get(stats_handler))
        .route("/api/edge/message", post(message_handler))
        .fallback(intercept_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
