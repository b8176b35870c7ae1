//! Error types for the storefront edge
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Edge Error Enum ==
/// Unified error type for the storefront edge.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EdgeError {
    /// Request URL uses a scheme the cache store cannot hold
    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),

    /// Transport-level failure reaching the network
    #[error("Network error: {0}")]
    Network(String),

    /// Static generation pre-population failed
    #[error("Install failed for {url}: {reason}")]
    InstallFailed { url: String, reason: String },

    /// Checkout attempted without a logged-in session
    #[error("Not authenticated, login required (return to {return_to})")]
    NotAuthenticated { return_to: String },

    /// Checkout attempted with nothing in the cart
    #[error("Cart is empty")]
    EmptyCart,

    /// Worker lifecycle call made from the wrong state
    #[error("Invalid lifecycle transition: {0}")]
    Lifecycle(String),

    /// Keep-alive ping failed
    #[error("Ping failed: {0}")]
    Ping(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for EdgeError {
    fn into_response(self) -> Response {
        let status = match &self {
            EdgeError::UnsupportedScheme(_) | EdgeError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            EdgeError::Network(_) | EdgeError::Ping(_) => StatusCode::BAD_GATEWAY,
            EdgeError::InstallFailed { .. } => StatusCode::SERVICE_UNAVAILABLE,
            EdgeError::Lifecycle(_) => StatusCode::CONFLICT,
            EdgeError::NotAuthenticated { .. } => StatusCode::UNAUTHORIZED,
            EdgeError::EmptyCart => StatusCode::UNPROCESSABLE_ENTITY,
            EdgeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the storefront edge.
pub type Result<T> = std::result::Result<T, EdgeError>;
