//! Cache Store Module
//!
//! Response storage partitioned into named generations.

use std::collections::{BTreeMap, BTreeSet};

use crate::cache::{CacheEntry, CacheStats, Generation};
use crate::error::{EdgeError, Result};
use crate::network::RequestKey;

// == Cache Store ==
/// All generations known to the edge, keyed by name.
#[derive(Debug)]
pub struct CacheStore {
    generations: BTreeMap<String, Generation>,
    stats: CacheStats,
    /// Entry bound applied to every unpinned generation
    max_entries: usize,
}

impl CacheStore {
    /// Creates an empty store whose generations hold at most `max_entries` each.
    pub fn new(max_entries: usize) -> Self {
        Self {
            generations: BTreeMap::new(),
            stats: CacheStats::new(),
            max_entries,
        }
    }

    // == Open ==
    /// Returns the named generation, creating it when absent.
    pub fn open(&mut self, name: &str) -> &mut Generation {
        let max_entries = self.max_entries;
        self.generations
            .entry(name.to_string())
            .or_insert_with(|| Generation::new(name, max_entries))
    }

    /// Like `open`, but the generation is exempt from the entry bound.
    pub fn open_pinned(&mut self, name: &str) -> &mut Generation {
        let generation = self.open(name);
        generation.pin();
        generation
    }

    // == Match ==
    /// Finds a cached response for `key` in any generation.
    pub fn match_request(&mut self, key: &RequestKey) -> Option<CacheEntry> {
        let found = self
            .generations
            .values_mut()
            .find_map(|generation| generation.get(key).cloned());

        match found {
            Some(entry) => {
                self.stats.record_hit();
                Some(entry)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Put ==
    /// Stores `entry` in the named generation (created if needed).
    ///
    /// Only `http`/`https` requests may be stored.
    pub fn put(&mut self, generation: &str, entry: CacheEntry) -> Result<()> {
        let url = entry.key.url();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(EdgeError::UnsupportedScheme(url.to_string()));
        }

        if self.open(generation).insert(entry).is_some() {
            self.stats.record_eviction();
        }
        self.refresh_total();
        Ok(())
    }

    // == Delete Generation ==
    /// Drops a whole generation. Returns false if it did not exist.
    pub fn delete_generation(&mut self, name: &str) -> bool {
        let removed = self.generations.remove(name).is_some();
        if removed {
            self.stats.record_purge();
            self.refresh_total();
        }
        removed
    }

    // == List Generations ==
    pub fn generations(&self) -> BTreeSet<String> {
        self.generations.keys().cloned().collect()
    }

    /// Returns the generation names not present in `allow_list`.
    pub fn stale_generations(&self, allow_list: &[&str]) -> Vec<String> {
        self.generations
            .keys()
            .filter(|name| !allow_list.contains(&name.as_str()))
            .cloned()
            .collect()
    }

    pub fn generation(&self, name: &str) -> Option<&Generation> {
        self.generations.get(name)
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.len());
        stats
    }

    /// Number of entries across all generations.
    pub fn len(&self) -> usize {
        self.generations.values().map(Generation::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn refresh_total(&mut self) {
        let total = self.len();
        self.stats.set_total_entries(total);
    }
}
