//! Configuration Module
//!
//! Handles loading and managing edge configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Default upstream API used when `API_BASE_URL` is not set.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// Default keep-alive interval: 13 minutes.
pub const DEFAULT_KEEP_ALIVE_SECS: u64 = 13 * 60;

// == Run Mode ==
/// Build/run mode. Only `Production` enables the keep-alive pinger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Development,
    Production,
}

impl RunMode {
    pub fn is_production(self) -> bool {
        self == RunMode::Production
    }
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(RunMode::Production),
            "development" | "dev" | "test" => Ok(RunMode::Development),
            other => Err(format!("unknown run mode: {}", other)),
        }
    }
}

/// Edge configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Upstream storefront API origin
    pub api_base_url: String,
    /// Build/run mode
    pub mode: RunMode,
    /// Keep-alive ping interval in seconds
    pub keep_alive_interval: u64,
    /// Cache version; names the static and dynamic generations
    pub cache_version: String,
    /// Maximum entries per cache generation
    pub cache_max_entries: usize,
    /// Paths pre-cached into the static generation on install
    pub static_manifest: Vec<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `API_BASE_URL` - Upstream API origin (default: http://localhost:5000)
    /// - `APP_MODE` - `production` or `development` (default: development)
    /// - `KEEP_ALIVE_INTERVAL` - Ping interval in seconds (default: 780)
    /// - `CACHE_VERSION` - Cache generation version (default: v1)
    /// - `CACHE_MAX_ENTRIES` - Entries per generation (default: 200)
    /// - `STATIC_MANIFEST` - Comma-separated asset paths
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            api_base_url: env::var("API_BASE_URL")
                .ok()
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.api_base_url),
            mode: parse_var("APP_MODE").unwrap_or(defaults.mode),
            keep_alive_interval: parse_var("KEEP_ALIVE_INTERVAL")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.keep_alive_interval),
            cache_version: env::var("CACHE_VERSION")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.cache_version),
            cache_max_entries: parse_var("CACHE_MAX_ENTRIES")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.cache_max_entries),
            static_manifest: env::var("STATIC_MANIFEST")
                .ok()
                .map(|v| parse_manifest(&v))
                .filter(|m| !m.is_empty())
                .unwrap_or(defaults.static_manifest),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            mode: RunMode::Development,
            keep_alive_interval: DEFAULT_KEEP_ALIVE_SECS,
            cache_version: "v1".to_string(),
            cache_max_entries: 200,
            static_manifest: ["/", "/index.html", "/manifest.json", "/favicon.ico", "/logo192.png"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

/// Splits a comma-separated manifest into trimmed, non-empty paths.
fn parse_manifest(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}
