//! Tailor Edge - offline-first edge layer for a tailoring storefront
//!
//! Serves the health endpoint and routes every other request through the
//! caching fetch interceptor to the upstream storefront API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tokio::sync::{broadcast, RwLock};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use tailor_edge::api::{create_router, AppState};
use tailor_edge::cache::CacheStore;
use tailor_edge::config::Config;
use tailor_edge::network::{HttpNetwork, Network};
use tailor_edge::tasks::{spawn_diagnostics_task, HttpHealthProbe, KeepAlive};
use tailor_edge::worker::{Manifest, Registration, Worker};

/// Upstream request timeout.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Capacity of the diagnostics broadcast channel.
const EVENT_CAPACITY: usize = 256;

/// Main entry point for the storefront edge.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Register the worker (install pre-caches the static manifest)
/// 4. Start diagnostics and keep-alive tasks
/// 5. Serve HTTP until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tailor_edge=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor Edge");

    let config = Config::from_env();
    info!(
        "Configuration loaded: upstream={}, mode={:?}, cache_version={}, port={}",
        config.api_base_url, config.mode, config.cache_version, config.server_port
    );

    let upstream = Url::parse(&config.api_base_url)
        .with_context(|| format!("Invalid API_BASE_URL: {}", config.api_base_url))?;
    let network: Arc<dyn Network> = Arc::new(HttpNetwork::new(FETCH_TIMEOUT)?);
    let cache = Arc::new(RwLock::new(CacheStore::new(config.cache_max_entries)));
    let (events, _) = broadcast::channel(EVENT_CAPACITY);

    let worker = Arc::new(Worker::new(
        config.cache_version.clone(),
        upstream.clone(),
        Manifest::new(config.static_manifest.clone()),
        cache.clone(),
        network.clone(),
        events.clone(),
    ));
    let registration = Arc::new(Registration::new(network));
    if let Err(err) = registration.register(worker).await {
        // Requests pass straight through until a later install succeeds.
        error!("Worker registration failed: {}", err);
    }

    let state = AppState::new(cache, registration, upstream.clone());
    let diagnostics = spawn_diagnostics_task(events.subscribe(), state.performance.clone());

    let probe = HttpHealthProbe::new(reqwest::Client::new(), &upstream)?;
    let mut keep_alive = KeepAlive::new(
        Arc::new(probe),
        Duration::from_secs(config.keep_alive_interval),
        config.mode,
    );
    if keep_alive.start() {
        info!("Keep-alive task started");
    }

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    keep_alive.stop();
    diagnostics.abort();
    warn!("Background tasks stopped");
    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
