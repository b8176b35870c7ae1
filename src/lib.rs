//! Tailor Edge - offline-first edge layer for a tailoring storefront
//!
//! Provides a generational response cache with a fetch interceptor, the
//! cart/session state container, and a keep-alive pinger for the backend.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod network;
pub mod session;
pub mod tasks;
pub mod worker;

pub use api::AppState;
pub use config::Config;
pub use error::{EdgeError, Result};
pub use tasks::{spawn_diagnostics_task, KeepAlive};
