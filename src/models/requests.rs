//! Request conversion for the edge API
//!
//! Turns an incoming HTTP request into the `FetchRequest` the worker sees.

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Request};
use url::Url;

use crate::error::{EdgeError, Result};
use crate::network::{resolve_under, Destination, FetchRequest, RequestMode};

/// Largest request body forwarded upstream.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Headers that describe this hop only and must not be forwarded.
const HOP_HEADERS: [header::HeaderName; 5] = [
    header::HOST,
    header::CONNECTION,
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Strips hop-by-hop headers in place.
pub fn strip_hop_headers(headers: &mut HeaderMap) {
    for name in HOP_HEADERS.iter() {
        headers.remove(name);
    }
}

/// Rebuilds `request` beneath `upstream`, keeping method, path, query,
/// end-to-end headers and body. Destination and mode come from the
/// `Sec-Fetch-Dest` and `Sec-Fetch-Mode` headers.
pub async fn into_fetch_request(request: Request<Body>, upstream: &Url) -> Result<FetchRequest> {
    let (parts, body) = request.into_parts();

    let url = resolve_under(upstream, parts.uri.path(), parts.uri.query())?;

    let header_str = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    };
    let destination = Destination::from_header(header_str("sec-fetch-dest"));
    let mode = RequestMode::from_header(header_str("sec-fetch-mode"));

    let body = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| EdgeError::InvalidRequest(format!("Failed to read body: {}", e)))?;

    let mut headers = parts.headers.clone();
    strip_hop_headers(&mut headers);

    Ok(FetchRequest {
        method: parts.method,
        url,
        headers,
        body,
        destination,
        mode,
    })
}
