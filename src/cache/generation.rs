//! Cache Generation Module
//!
//! A named partition of the cache store, bounded by an entry count.

use std::collections::HashMap;

use crate::cache::{CacheEntry, LruTracker};
use crate::network::RequestKey;

// == Generation ==
/// One named generation (e.g. `static-v1`). Writes overwrite by key;
/// inserting a new key into a full generation evicts the least recently
/// used entry.
#[derive(Debug, Clone)]
pub struct Generation {
    name: String,
    entries: HashMap<RequestKey, CacheEntry>,
    lru: LruTracker,
    max_entries: usize,
}

impl Generation {
    pub fn new(name: impl Into<String>, max_entries: usize) -> Self {
        Self {
            name: name.into(),
            entries: HashMap::new(),
            lru: LruTracker::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Lifts the entry bound. Used for generations whose contents are a
    /// fixed list that must stay complete.
    pub fn pin(&mut self) {
        self.max_entries = usize::MAX;
    }

    pub fn is_pinned(&self) -> bool {
        self.max_entries == usize::MAX
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // == Get ==
    /// Looks up an entry and marks it as recently used.
    pub fn get(&mut self, key: &RequestKey) -> Option<&CacheEntry> {
        if self.entries.contains_key(key) {
            self.lru.touch(key);
        }
        self.entries.get(key)
    }

    pub fn contains(&self, key: &RequestKey) -> bool {
        self.entries.contains_key(key)
    }

    // == Insert ==
    /// Stores an entry, returning the key evicted to make room, if any.
    pub fn insert(&mut self, entry: CacheEntry) -> Option<RequestKey> {
        let key = entry.key.clone();
        let mut evicted = None;

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            if let Some(oldest) = self.lru.evict_oldest() {
                self.entries.remove(&oldest);
                evicted = Some(oldest);
            }
        }

        self.entries.insert(key.clone(), entry);
        self.lru.touch(&key);
        evicted
    }

    pub fn remove(&mut self, key: &RequestKey) -> Option<CacheEntry> {
        self.lru.remove(key);
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
