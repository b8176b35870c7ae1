//! API Module
//!
//! HTTP handlers and routing for the storefront edge.
//!
//! # Endpoints
//! - `GET /api/ping` - Health check endpoint
//! - `GET /api/edge/stats` - Cache statistics and worker status
//! - `POST /api/edge/message` - Worker control messages
//! - fallback - proxied through the fetch interceptor

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
