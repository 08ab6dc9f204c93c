//! Cache Statistics Module
//!
//! Tracks how often a service cache saved a network call.

use serde::Serialize;

// == Cache Stats ==
/// Cache performance counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Reads served from a fresh entry
    pub hits: u64,
    /// Reads that found no entry or a stale one
    pub misses: u64,
    /// Successful fetches written back to the cache
    pub refreshes: u64,
    /// Entries dropped to stay within capacity
    pub evictions: u64,
    /// Current number of keys in the cache
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if nothing has been read.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_refresh(&mut self) {
        self.refreshes += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
