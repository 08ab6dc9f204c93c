//! Cache-aside helper shared by the list services.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{current_timestamp_ms, CacheEntry, CacheStats, TtlCache};
use crate::error::Result;

/// Cache-aside wrapper around a [`TtlCache`].
///
/// Clones share the same underlying cache. The lock is never held while a
/// fetch is in flight, so two concurrent misses for the same key both hit the
/// network and the last one to finish wins.
#[derive(Debug)]
pub struct CachedList<T> {
    inner: Arc<RwLock<TtlCache<T>>>,
}

impl<T> Clone for CachedList<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + Sync> CachedList<T> {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(TtlCache::new(ttl, max_entries))),
        }
    }

    /// Returns the cached value for `key` when fresh, otherwise runs `fetcher`.
    ///
    /// 1. Unless `force_refresh`, a fresh entry is returned without fetching
    /// 2. The fetch result is stored under `key`, stamped with the time
    ///    the fetch started
    /// 3. A failed fetch leaves any existing entry untouched
    pub async fn fetch<F, Fut>(&self, key: &str, force_refresh: bool, fetcher: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if !force_refresh {
            let mut cache = self.inner.write().await;
            if let Some(data) = cache.get_fresh(key) {
                debug!(key, "cache hit");
                return Ok(data);
            }
        }

        debug!(key, force_refresh, "cache miss, fetching");
        let requested_at = current_timestamp_ms();
        let data = fetcher().await?;

        self.inner
            .write()
            .await
            .insert_at(key.to_string(), data.clone(), requested_at);

        Ok(data)
    }

    /// Removes one key, or everything when `key` is `None`.
    pub async fn clear(&self, key: Option<&str>) -> usize {
        self.inner.write().await.clear(key)
    }

    /// Applies `patch` to every cached value and returns the keys it changed.
    pub async fn patch_all<F>(&self, patch: F) -> Vec<String>
    where
        F: FnMut(&mut T) -> bool,
    {
        self.inner.write().await.patch_all(patch)
    }

    /// Copy of the raw entry for `key`, fresh or not.
    pub async fn entry(&self, key: &str) -> Option<CacheEntry<T>> {
        self.inner.read().await.peek(key).cloned()
    }

    pub async fn keys(&self) -> Vec<String> {
        self.inner.read().await.keys()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.read().await.stats()
    }
}
