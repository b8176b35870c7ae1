//! Cache Module
//!
//! Generational response storage with per-generation LRU bounds.

mod entry;
mod generation;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use generation::Generation;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Generation Names ==
/// Name of the pre-populated static generation for `version`.
pub fn static_generation(version: &str) -> String {
    format!("static-{}", version)
}

/// Name of the runtime-populated dynamic generation for `version`.
pub fn dynamic_generation(version: &str) -> String {
    format!("dynamic-{}", version)
}
