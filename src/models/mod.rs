//! Request and Response models for the edge API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing HTTP response bodies, and the conversion of incoming
//! requests into worker fetches.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{into_fetch_request, strip_hop_headers, MAX_BODY_BYTES};
pub use responses::{
    ErrorResponse, MessageResponse, PingResponse, StatsResponse, WorkerSummary,
};
