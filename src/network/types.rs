//! Request and response values passed between the interceptor, the cache
//! store and the network.

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use url::Url;

use crate::error::{EdgeError, Result};

// == Request Destination ==
/// Declared destination of a request (the `Sec-Fetch-Dest` value).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Destination {
    Document,
    Image,
    Script,
    Style,
    Font,
    #[default]
    Empty,
}

impl Destination {
    pub fn from_header(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "document" => Destination::Document,
            "image" => Destination::Image,
            "script" => Destination::Script,
            "style" => Destination::Style,
            "font" => Destination::Font,
            _ => Destination::Empty,
        }
    }
}

// == Request Mode ==
/// Request mode (the `Sec-Fetch-Mode` value). `Navigate` marks top-level
/// document loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestMode {
    Navigate,
    SameOrigin,
    NoCors,
    #[default]
    Cors,
}

impl RequestMode {
    pub fn from_header(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "navigate" => RequestMode::Navigate,
            "same-origin" => RequestMode::SameOrigin,
            "no-cors" => RequestMode::NoCors,
            _ => RequestMode::Cors,
        }
    }
}

// == Fetch Request ==
/// An outgoing request observed by the interceptor.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub destination: Destination,
    pub mode: RequestMode,
}

impl FetchRequest {
    /// Creates a body-less GET request.
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            destination: Destination::Empty,
            mode: RequestMode::Cors,
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = destination;
        self
    }

    pub fn with_mode(mut self, mode: RequestMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Cache identity of this request: method plus full URL.
    pub fn key(&self) -> RequestKey {
        RequestKey::new(&self.method, &self.url)
    }

    /// True for `http` and `https` URLs, the only schemes the cache holds.
    pub fn is_cacheable_scheme(&self) -> bool {
        is_cacheable_scheme(&self.url)
    }
}

pub fn is_cacheable_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

// == Upstream Resolution ==
/// Resolves an origin-relative `path` and optional `query` beneath `base`,
/// keeping any path prefix `base` carries (`https://host/backend` +
/// `/api/ping` -> `https://host/backend/api/ping`).
///
/// The result always has `base`'s origin. Leading slashes in `path` never
/// name another host, and `..` segments are rejected.
pub fn resolve_under(base: &Url, path: &str, query: Option<&str>) -> Result<Url> {
    let relative = path.trim_start_matches('/');
    let climbs = relative
        .split('/')
        .any(|segment| segment == ".." || segment.eq_ignore_ascii_case("%2e%2e"));
    if climbs {
        return Err(EdgeError::InvalidRequest(format!("Path escapes base: {}", path)));
    }

    let mut url = base.clone();
    url.set_path(&format!("{}/{}", base.path().trim_end_matches('/'), relative));
    url.set_query(query);
    url.set_fragment(None);

    if url.origin() != base.origin() {
        return Err(EdgeError::InvalidRequest(format!(
            "{} does not belong to {}",
            url,
            base.origin().ascii_serialization()
        )));
    }
    Ok(url)
}

/// Path of `url` relative to the path prefix of `base`, always starting
/// with `/`. URLs outside `base` keep their full path.
pub fn path_under<'a>(base: &Url, url: &'a Url) -> &'a str {
    let prefix = base.path().trim_end_matches('/');
    if prefix.is_empty() || url.origin() != base.origin() {
        return url.path();
    }

    match url.path().strip_prefix(prefix) {
        Some("") => "/",
        Some(rest) if rest.starts_with('/') => rest,
        _ => url.path(),
    }
}

// == Request Key ==
/// Identity of a cached request (`METHOD URL`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestKey(String);

impl RequestKey {
    pub fn new(method: &Method, url: &Url) -> Self {
        Self(format!("{} {}", method, url))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// URL part of the key.
    pub fn url(&self) -> &str {
        self.0.split_once(' ').map(|(_, url)| url).unwrap_or(&self.0)
    }
}

impl std::fmt::Display for RequestKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// == Fetch Response ==
/// A response as seen by the interceptor: status, headers and body bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl FetchResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: header::HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// 2xx responses are the only ones written to the cache.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Fixed page served when a navigation finds neither network nor cache.
    pub fn offline_page() -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, "App is offline").with_header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/html"),
        )
    }
}
