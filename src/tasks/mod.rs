//! Background Tasks Module
//!
//! # Tasks
//! - Keep-alive: pings the backend health endpoint on a fixed interval
//! - Diagnostics: tallies cache hit/miss reports from the worker

mod diagnostics;
mod keepalive;

pub use diagnostics::{spawn_diagnostics_task, PerformanceTally};
pub use keepalive::{HealthProbe, HttpHealthProbe, KeepAlive, PingRecord, PING_PATH};
