//! LRU Tracker Module
//!
//! Tracks request-key recency inside a single cache generation.

use std::collections::VecDeque;

use crate::network::RequestKey;

// == LRU Tracker ==
/// Access order of the keys in one generation.
///
/// Front = most recently used, back = least recently used.
#[derive(Debug, Default, Clone)]
pub struct LruTracker {
    order: VecDeque<RequestKey>,
}

impl LruTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as recently used (moves or inserts it at the front).
    pub fn touch(&mut self, key: &RequestKey) {
        self.remove(key);
        self.order.push_front(key.clone());
    }

    pub fn remove(&mut self, key: &RequestKey) {
        self.order.retain(|k| k != key);
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<RequestKey> {
        self.order.pop_back()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
