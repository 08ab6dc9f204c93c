//! Cache Module
//!
//! In-memory TTL caching for the list services: entries keyed by entity id,
//! freshness checked lazily on read, explicit invalidation.

mod cached_list;
mod entry;
mod stats;
mod store;


// Re-export public types
pub use cached_list::CachedList;
pub use entry::{current_timestamp_ms, CacheEntry};
pub use stats::CacheStats;
pub use store::TtlCache;

// == Public Constants ==
/// Default freshness window for list caches (5 minutes)
pub const DEFAULT_TTL_SECS: u64 = 5 * 60;

/// Default maximum number of keys per service cache
pub const DEFAULT_MAX_ITEMS: usize = 100;
