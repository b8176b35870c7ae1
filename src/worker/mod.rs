//! Worker Module
//!
//! The fetch interceptor: request classification, caching strategies,
//! the install/activate lifecycle and worker registration.

mod classify;
mod interceptor;
mod lifecycle;
mod messages;
mod registration;

pub use classify::{classify, classify_under, Manifest, RequestKind, API_PREFIX};
pub use interceptor::{ResponseSource, Served, Worker};
pub use lifecycle::{LifecycleEvent, WorkerState};
pub use messages::{HitStatus, WorkerMessage};
pub use registration::{Registration, WorkerStatus};
