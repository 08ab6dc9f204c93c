//! Cache Store Module
//!
//! Keyed TTL store backing the cache-aside services.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheEntry, CacheStats};

// == TTL Cache ==
/// Map from entity key (region id, customer id, ...) to the last fetched value.
///
/// Freshness is recomputed on every read; nothing is expired in the
/// background. When `max_entries` is non-zero, writing a new key at capacity
/// drops the key that was written longest ago.
#[derive(Debug)]
pub struct TtlCache<T> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// Keys ordered by last write, oldest at the front
    write_order: VecDeque<String>,
    /// Performance statistics
    stats: CacheStats,
    /// Freshness window in milliseconds
    ttl_ms: u64,
    /// Maximum number of keys (0 = unbounded)
    max_entries: usize,
}

impl<T: Clone> TtlCache<T> {
    // == Constructor ==
    /// Creates an empty cache.
    ///
    /// # Arguments
    /// * `ttl` - How long an entry stays fresh after being written
    /// * `max_entries` - Maximum number of keys, 0 for no limit
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            write_order: VecDeque::new(),
            stats: CacheStats::new(),
            ttl_ms: u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX),
            max_entries,
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    // == Get ==
    /// Returns a copy of the cached value if the entry for `key` is fresh.
    pub fn get_fresh(&mut self, key: &str) -> Option<T> {
        self.get_fresh_at(key, current_timestamp_ms())
    }

    /// Same as [`get_fresh`](Self::get_fresh) with an explicit clock.
    pub fn get_fresh_at(&mut self, key: &str, now: u64) -> Option<T> {
        match self.entries.get(key) {
            Some(entry) if entry.is_fresh_at(self.ttl_ms, now) => {
                self.stats.record_hit();
                entry.data.clone()
            }
            _ => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Looks at an entry without touching statistics.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry<T>> {
        self.entries.get(key)
    }

    // == Insert ==
    /// Stores `data` under `key`, replacing any previous entry.
    pub fn insert(&mut self, key: String, data: T) {
        self.insert_at(key, data, current_timestamp_ms());
    }

    /// Same as [`insert`](Self::insert) with an explicit timestamp.
    pub fn insert_at(&mut self, key: String, data: T, now: u64) {
        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.max_entries > 0 && self.entries.len() >= self.max_entries {
            if let Some(oldest) = self.write_order.pop_front() {
                self.entries.remove(&oldest);
                self.stats.record_eviction();
            }
        }

        self.write_order.retain(|k| k != &key);
        self.write_order.push_back(key.clone());
        self.entries.insert(key, CacheEntry::at(data, now));

        self.stats.record_refresh();
        self.stats.set_total_entries(self.entries.len());
    }

    // == Clear ==
    /// Removes the entry for `key`, or every entry when `key` is `None`.
    ///
    /// Returns the number of entries removed.
    pub fn clear(&mut self, key: Option<&str>) -> usize {
        let removed = match key {
            Some(key) => {
                self.write_order.retain(|k| k != key);
                usize::from(self.entries.remove(key).is_some())
            }
            None => {
                let count = self.entries.len();
                self.entries.clear();
                self.write_order.clear();
                count
            }
        };

        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Patch ==
    /// Applies `patch` to every cached value, fresh or stale.
    ///
    /// `patch` returns whether it changed the value. Timestamps are left as
    /// they are. Returns the keys that changed, sorted.
    pub fn patch_all<F>(&mut self, mut patch: F) -> Vec<String>
    where
        F: FnMut(&mut T) -> bool,
    {
        let mut changed: Vec<String> = self
            .entries
            .iter_mut()
            .filter_map(|(key, entry)| {
                let data = entry.data.as_mut()?;
                patch(data).then(|| key.clone())
            })
            .collect();

        changed.sort();
        changed
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
