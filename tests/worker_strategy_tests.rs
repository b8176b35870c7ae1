//! Integration Tests for the Fetch Interceptor
//!
//! Drives workers against a counting mock network.

mod common;

use std::sync::Arc;

use axum::http::{header, Method, StatusCode};
use tailor_edge::cache::CacheStore;
use tailor_edge::network::{Destination, FetchRequest, RequestMode};
use tailor_edge::worker::{HitStatus, Registration, WorkerMessage, WorkerState};
use tailor_edge::EdgeError;
use tokio::sync::RwLock;

use common::{parse_url, url, Fixture, MockNetwork};

// == Install / Activate ==

#[tokio::test]
async fn test_install_precaches_manifest() {
    let fixture = Fixture::new(MockNetwork::with_manifest());
    let worker = fixture.worker("v1");

    worker.install().await.unwrap();

    assert_eq!(worker.state().await, WorkerState::Waiting);
    let cache = fixture.cache.read().await;
    assert_eq!(cache.generation("static-v1").unwrap().len(), 4);
}

#[tokio::test]
async fn test_install_is_all_or_nothing() {
    let network = MockNetwork::with_manifest();
    network.route("/manifest.json", StatusCode::NOT_FOUND, "missing");
    let fixture = Fixture::new(network);
    let worker = fixture.worker("v1");

    let result = worker.install().await;

    assert!(matches!(result, Err(EdgeError::InstallFailed { .. })));
    assert_eq!(worker.state().await, WorkerState::Uninitialized);
    assert!(fixture.cache.read().await.is_empty());
}

#[tokio::test]
async fn test_install_fails_offline() {
    let network = MockNetwork::with_manifest();
    network.set_offline(true);
    let fixture = Fixture::new(network);

    let result = fixture.worker("v1").install().await;
    assert!(matches!(result, Err(EdgeError::InstallFailed { .. })));
}

#[tokio::test]
async fn test_install_keeps_whole_manifest_under_small_bound() {
    let mut fixture = Fixture::new(MockNetwork::with_manifest());
    fixture.cache = Arc::new(RwLock::new(CacheStore::new(2)));
    let worker = fixture.worker("v1");
    worker.install().await.unwrap();
    worker.activate().await.unwrap();
    fixture.network.reset_calls();

    for path in common::manifest().paths() {
        worker.handle_fetch(&FetchRequest::get(url(path))).await.unwrap();
    }

    assert_eq!(fixture.cache.read().await.generation("static-v1").unwrap().len(), 4);
    assert_eq!(fixture.network.calls(), 0);
}

#[tokio::test]
async fn test_activate_purges_stale_generations() {
    let fixture = Fixture::new(MockNetwork::with_manifest());
    {
        let mut cache = fixture.cache.write().await;
        cache.open("static-v0");
        cache.open("dynamic-v0");
        cache.open("scratch");
    }

    let worker = fixture.worker("v1");
    worker.install().await.unwrap();
    let mut purged = worker.activate().await.unwrap();
    purged.sort();

    assert_eq!(purged, vec!["dynamic-v0", "scratch", "static-v0"]);
    let names: Vec<String> = fixture.cache.read().await.generations().into_iter().collect();
    assert_eq!(names, vec!["static-v1".to_string()]);
    assert_eq!(worker.state().await, WorkerState::Active);
}

#[tokio::test]
async fn test_activate_before_install_is_rejected() {
    let fixture = Fixture::new(MockNetwork::with_manifest());
    let result = fixture.worker("v1").activate().await;
    assert!(matches!(result, Err(EdgeError::Lifecycle(_))));
}

#[tokio::test]
async fn test_base_path_origin_is_kept_everywhere() {
    let origin = parse_url("https://shop.test/backend");
    let network = MockNetwork::new();
    for path in common::manifest().paths() {
        let target = parse_url(&format!("https://shop.test/backend{}", path));
        network.route_url(&target, StatusCode::OK, format!("backend {}", path));
    }
    let fixture = Fixture::new(network);
    let worker = fixture.worker_at("v1", origin);
    worker.install().await.unwrap();
    worker.activate().await.unwrap();
    fixture.network.reset_calls();

    let asset = FetchRequest::get(parse_url("https://shop.test/backend/index.html"));
    let response = worker.handle_fetch(&asset).await.unwrap();
    assert_eq!(response.body, "backend /index.html");
    assert_eq!(fixture.network.calls(), 0);

    fixture.network.set_offline(true);
    let page = FetchRequest::get(parse_url("https://shop.test/backend/orders/42"))
        .with_mode(RequestMode::Navigate);
    let response = worker.handle_fetch(&page).await.unwrap();
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "backend /");
}

// == Cache-first ==

#[tokio::test]
async fn test_cache_first_static_asset_skips_network() {
    let fixture = Fixture::new(MockNetwork::with_manifest());
    let worker = fixture.active_worker("v1").await;
    fixture.network.reset_calls();

    let response = worker
        .handle_fetch(&FetchRequest::get(url("/logo192.png")))
        .await
        .unwrap();

    assert_eq!(response.body, "asset /logo192.png");
    assert_eq!(fixture.network.calls(), 0);
}

#[tokio::test]
async fn test_cache_first_image_fetches_then_caches() {
    let network = MockNetwork::with_manifest();
    network.route("/uploads/suit.jpg", StatusCode::OK, "jpeg");
    let fixture = Fixture::new(network);
    let worker = fixture.active_worker("v1").await;
    fixture.network.reset_calls();

    let request = FetchRequest::get(url("/uploads/suit.jpg")).with_destination(Destination::Image);
    let first = worker.handle_fetch(&request).await.unwrap();
    let second = worker.handle_fetch(&request).await.unwrap();

    assert_eq!(first.body, "jpeg");
    assert_eq!(second, first);
    assert_eq!(fixture.network.calls(), 1);
    assert!(fixture
        .cache
        .read()
        .await
        .generation("dynamic-v1")
        .unwrap()
        .contains(&request.key()));
}

#[tokio::test]
async fn test_cache_first_does_not_store_errors() {
    let fixture = Fixture::new(MockNetwork::with_manifest());
    let worker = fixture.active_worker("v1").await;

    let request = FetchRequest::get(url("/uploads/missing.jpg")).with_destination(Destination::Image);
    let response = worker.handle_fetch(&request).await.unwrap();

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(fixture.cache.read().await.generation("dynamic-v1").is_none());
}

#[tokio::test]
async fn test_extension_scheme_bypasses_cache() {
    let fixture = Fixture::new(MockNetwork::with_manifest());
    let worker = fixture.active_worker("v1").await;
    fixture.network.reset_calls();

    let ext = parse_url("chrome-extension://abcdef/content.js");
    let request = FetchRequest::get(ext).with_destination(Destination::Image);
    worker.handle_fetch(&request).await.unwrap();
    worker.handle_fetch(&request).await.unwrap();

    assert_eq!(fixture.network.calls(), 2);
    assert!(fixture.cache.read().await.generation("dynamic-v1").is_none());
}

// == Network-first ==

#[tokio::test]
async fn test_network_first_prefers_fresh_response() {
    let network = MockNetwork::with_manifest();
    network.route("/api/products", StatusCode::OK, "v1 products");
    let fixture = Fixture::new(network);
    let worker = fixture.active_worker("v1").await;
    let request = FetchRequest::get(url("/api/products"));

    worker.handle_fetch(&request).await.unwrap();
    fixture.network.route("/api/products", StatusCode::OK, "v2 products");
    let response = worker.handle_fetch(&request).await.unwrap();

    assert_eq!(response.body, "v2 products");
}

#[tokio::test]
async fn test_network_first_falls_back_to_cache() {
    let network = MockNetwork::with_manifest();
    network.route("/api/products", StatusCode::OK, "cached products");
    let fixture = Fixture::new(network);
    let worker = fixture.active_worker("v1").await;
    let request = FetchRequest::get(url("/api/products"));

    let online = worker.handle_fetch(&request).await.unwrap();
    fixture.network.set_offline(true);
    let offline = worker.handle_fetch(&request).await.unwrap();

    assert_eq!(offline, online);
}

#[tokio::test]
async fn test_network_first_without_cache_propagates_error() {
    let fixture = Fixture::new(MockNetwork::with_manifest());
    let worker = fixture.active_worker("v1").await;
    fixture.network.set_offline(true);

    let result = worker.handle_fetch(&FetchRequest::get(url("/api/orders"))).await;
    assert!(matches!(result, Err(EdgeError::Network(_))));
}

#[tokio::test]
async fn test_api_requests_always_reach_network() {
    let network = MockNetwork::with_manifest();
    network.route("/api/ping", StatusCode::OK, "pong");
    let fixture = Fixture::new(network);
    let worker = fixture.active_worker("v1").await;
    fixture.network.reset_calls();

    worker.handle_fetch(&FetchRequest::get(url("/api/ping"))).await.unwrap();
    worker.handle_fetch(&FetchRequest::get(url("/api/ping"))).await.unwrap();

    assert_eq!(fixture.network.calls(), 2);
}

// == Navigation ==

#[tokio::test]
async fn test_navigation_falls_back_to_root_document() {
    let fixture = Fixture::new(MockNetwork::with_manifest());
    let worker = fixture.active_worker("v1").await;
    fixture.network.set_offline(true);

    let request = FetchRequest::get(url("/measurements")).with_mode(RequestMode::Navigate);
    let response = worker.handle_fetch(&request).await.unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "asset /");
}

#[tokio::test]
async fn test_navigation_offline_page_without_cache() {
    let fixture = Fixture::new(MockNetwork::with_manifest());
    let worker = fixture.active_worker("v1").await;
    fixture.network.set_offline(true);
    fixture.cache.write().await.delete_generation("static-v1");

    let request = FetchRequest::get(url("/orders/42")).with_mode(RequestMode::Navigate);
    let response = worker.handle_fetch(&request).await.unwrap();

    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.body, "App is offline");
    assert_eq!(response.headers.get(header::CONTENT_TYPE).unwrap(), "text/html");
}

// == Passthrough ==

#[tokio::test]
async fn test_non_get_passes_through_untouched() {
    let network = MockNetwork::with_manifest();
    network.route("/api/orders", StatusCode::CREATED, "created");
    let fixture = Fixture::new(network);
    let worker = fixture.active_worker("v1").await;
    let mut events = fixture.events.subscribe();

    let request = FetchRequest::get(url("/api/orders"))
        .with_method(Method::POST)
        .with_body(r#"{"items":[]}"#);
    let response = worker.handle_fetch(&request).await.unwrap();

    assert_eq!(response.status, StatusCode::CREATED);
    assert!(fixture.cache.read().await.generation("dynamic-v1").is_none());
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_waiting_worker_does_not_intercept() {
    let fixture = Fixture::new(MockNetwork::with_manifest());
    let worker = fixture.worker("v1");
    worker.install().await.unwrap();
    fixture.network.reset_calls();

    worker.handle_fetch(&FetchRequest::get(url("/index.html"))).await.unwrap();
    assert_eq!(fixture.network.calls(), 1);
}

// == Diagnostics ==

#[tokio::test]
async fn test_reports_hit_and_miss() {
    let fixture = Fixture::new(MockNetwork::with_manifest());
    let worker = fixture.active_worker("v1").await;
    let mut events = fixture.events.subscribe();

    worker.handle_fetch(&FetchRequest::get(url("/index.html"))).await.unwrap();
    worker.handle_fetch(&FetchRequest::get(url("/api/cart"))).await.unwrap();

    match events.recv().await.unwrap() {
        WorkerMessage::CachePerformance { url, status, .. } => {
            assert_eq!(url, "https://shop.test/index.html");
            assert_eq!(status, HitStatus::Hit);
        }
        other => panic!("unexpected message {:?}", other),
    }
    match events.recv().await.unwrap() {
        WorkerMessage::CachePerformance { status, .. } => assert_eq!(status, HitStatus::Miss),
        other => panic!("unexpected message {:?}", other),
    }
}

// == Registration ==

#[tokio::test]
async fn test_registration_waits_then_skip_waiting_takes_over() {
    let fixture = Fixture::new(MockNetwork::with_manifest());
    let registration = Registration::new(fixture.network.clone());

    let v1 = fixture.worker("v1");
    registration.register(v1.clone()).await.unwrap();
    assert_eq!(registration.controller().await.unwrap().version, "v1");

    let v2 = fixture.worker("v2");
    registration.register(v2.clone()).await.unwrap();
    assert_eq!(registration.controller().await.unwrap().version, "v1");
    assert_eq!(registration.waiting().await.unwrap().state, WorkerState::Waiting);

    let applied = registration.post_message(WorkerMessage::SkipWaiting).await.unwrap();

    assert!(applied);
    assert_eq!(registration.controller().await.unwrap().version, "v2");
    assert!(registration.waiting().await.is_none());
    assert_eq!(v1.state().await, WorkerState::Superseded);
    assert_eq!(v2.state().await, WorkerState::Active);

    let names: Vec<String> = fixture.cache.read().await.generations().into_iter().collect();
    assert_eq!(names, vec!["static-v2".to_string()]);
}

#[tokio::test]
async fn test_registration_without_controller_uses_network() {
    let fixture = Fixture::new(MockNetwork::with_manifest());
    let registration = Registration::new(fixture.network.clone());

    registration
        .handle_fetch(&FetchRequest::get(url("/index.html")))
        .await
        .unwrap();
    assert_eq!(fixture.network.calls(), 1);
}

#[tokio::test]
async fn test_concurrent_registrations_keep_one_controller() {
    let fixture = Fixture::new(MockNetwork::with_manifest());
    let registration = Registration::new(fixture.network.clone());
    let v1 = fixture.worker("v1");
    let v2 = fixture.worker("v2");

    let (first, second) = tokio::join!(
        registration.register(v1.clone()),
        registration.register(v2.clone())
    );
    first.unwrap();
    second.unwrap();

    let controller = registration.controller().await.unwrap();
    let waiting = registration.waiting().await.unwrap();
    assert_ne!(controller.version, waiting.version);
    assert_eq!(controller.state, WorkerState::Active);
    assert_eq!(waiting.state, WorkerState::Waiting);
}

#[tokio::test]
async fn test_failed_activation_keeps_worker_waiting() {
    let fixture = Fixture::new(MockNetwork::with_manifest());
    let registration = Registration::new(fixture.network.clone());
    registration.register(fixture.worker("v1")).await.unwrap();

    let v2 = fixture.worker("v2");
    registration.register(v2.clone()).await.unwrap();
    // activated behind the registration's back, so the hand-over is invalid
    v2.activate().await.unwrap();

    let result = registration.activate_waiting().await;

    assert!(matches!(result, Err(EdgeError::Lifecycle(_))));
    assert_eq!(registration.waiting().await.unwrap().version, "v2");
    assert_eq!(registration.controller().await.unwrap().version, "v1");
}
