//! Network Module
//!
//! The network seam used by the interceptor, with a reqwest-backed
//! implementation for real upstream traffic.

mod types;

pub use types::{
    is_cacheable_scheme, path_under, resolve_under, Destination, FetchRequest, FetchResponse, RequestKey,
    RequestMode,
};

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{EdgeError, Result};

/// Something that can perform a fetch. Transport failures are `Err`;
/// any HTTP status (including 4xx/5xx) is an `Ok` response.
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse>;
}

// == HTTP Network ==
/// Network backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpNetwork {
    client: reqwest::Client,
}

impl HttpNetwork {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EdgeError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        debug!("{} {}", request.method, request.url);

        let response = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone())
            .body(request.body.clone())
            .send()
            .await
            .map_err(|e| EdgeError::Network(e.to_string()))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| EdgeError::Network(e.to_string()))?;

        Ok(FetchResponse {
            status,
            headers,
            body,
        })
    }
}
