//! Cache Entry Module
//!
//! A single cached value together with the time it was fetched.

use chrono::Utc;

// == Cache Entry ==
/// One cached value keyed by entity id.
///
/// `data` is only ever `Some` after a fetch for the key has succeeded.
/// Entries are never expired individually; freshness is decided on read.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    /// The cached value
    pub data: Option<T>,
    /// Fetch time (Unix milliseconds)
    pub timestamp: u64,
}

impl<T> CacheEntry<T> {
    /// Creates an entry holding `data`, stamped with the current time.
    pub fn new(data: T) -> Self {
        Self::at(data, current_timestamp_ms())
    }

    /// Creates an entry stamped with an explicit time.
    pub fn at(data: T, timestamp: u64) -> Self {
        Self {
            data: Some(data),
            timestamp,
        }
    }

    // == Freshness ==
    /// Checks whether the entry can be served at `now`.
    ///
    /// An entry is fresh while it holds data and `now - timestamp < ttl_ms`.
    /// Once the full TTL has elapsed it is stale.
    pub fn is_fresh_at(&self, ttl_ms: u64, now: u64) -> bool {
        self.data.is_some() && now.saturating_sub(self.timestamp) < ttl_ms
    }

    pub fn is_fresh(&self, ttl_ms: u64) -> bool {
        self.is_fresh_at(ttl_ms, current_timestamp_ms())
    }

    /// Milliseconds since the entry was written.
    pub fn age_ms(&self) -> u64 {
        current_timestamp_ms().saturating_sub(self.timestamp)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("regions".to_string());

        assert_eq!(entry.data.as_deref(), Some("regions"));
        assert!(entry.timestamp > 0);
        assert!(entry.is_fresh(60_000));
    }

    #[test]
    fn test_entry_fresh_within_ttl() {
        let entry = CacheEntry::at(1u32, 10_000);

        assert!(entry.is_fresh_at(5_000, 10_000));
        assert!(entry.is_fresh_at(5_000, 14_999));
    }

    #[test]
    fn test_freshness_boundary_condition() {
        let entry = CacheEntry::at(1u32, 10_000);

        // Stale exactly when the TTL has fully elapsed
        assert!(!entry.is_fresh_at(5_000, 15_000));
        assert!(!entry.is_fresh_at(5_000, 20_000));
    }

    #[test]
    fn test_entry_without_data_is_never_fresh() {
        let entry: CacheEntry<u32> = CacheEntry {
            data: None,
            timestamp: 10_000,
        };

        assert!(!entry.is_fresh_at(5_000, 10_000));
    }

    #[test]
    fn test_clock_skew_counts_as_fresh() {
        // A timestamp in the future yields zero age
        let entry = CacheEntry::at(1u32, 20_000);
        assert!(entry.is_fresh_at(5_000, 10_000));
    }
}
