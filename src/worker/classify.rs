//! Request classification.

use std::collections::HashSet;

use url::Url;

use crate::network::{path_under, Destination, FetchRequest, RequestMode};

/// Path prefix that marks API calls.
pub const API_PREFIX: &str = "/api/";

// == Request Kind ==
/// Coarse class of an intercepted request; decides the caching strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Api,
    StaticAsset,
    Image,
    Navigation,
    Other,
}

// == Manifest ==
/// Fixed list of static asset paths pre-cached on install.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    paths: Vec<String>,
    lookup: HashSet<String>,
}

impl Manifest {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut manifest = Self::default();
        for path in paths {
            let path = path.into();
            if manifest.lookup.insert(path.clone()) {
                manifest.paths.push(path);
            }
        }
        manifest
    }

    pub fn contains(&self, path: &str) -> bool {
        self.lookup.contains(path)
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Classifies a request. Checks run in priority order and the first match
/// wins, so an API path that is also listed in the manifest is still `Api`.
pub fn classify(request: &FetchRequest, manifest: &Manifest) -> RequestKind {
    classify_path(request.url.path(), request, manifest)
}

/// Like `classify`, but matches paths relative to the path prefix of
/// `base`, the same way manifest paths are resolved on install.
pub fn classify_under(base: &Url, request: &FetchRequest, manifest: &Manifest) -> RequestKind {
    classify_path(path_under(base, &request.url), request, manifest)
}

fn classify_path(path: &str, request: &FetchRequest, manifest: &Manifest) -> RequestKind {

    if path.starts_with(API_PREFIX) {
        RequestKind::Api
    } else if manifest.contains(path) {
        RequestKind::StaticAsset
    } else if request.destination == Destination::Image {
        RequestKind::Image
    } else if request.mode == RequestMode::Navigate {
        RequestKind::Navigation
    } else {
        RequestKind::Other
    }
}
