//! Customer service: customer lists cached per region.

use std::time::Duration;

use tracing::{debug, error};

use crate::api::{CustomerApi, CustomerInfo, PaginationParams, PaginationResult};
use crate::cache::{CacheStats, CachedList};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct CustomerService {
    api: CustomerApi,
    cache: CachedList<PaginationResult<CustomerInfo>>,
}

impl CustomerService {
    pub fn new(api: CustomerApi, ttl: Duration, max_entries: usize) -> Self {
        Self {
            api,
            cache: CachedList::new(ttl, max_entries),
        }
    }

    /// Customers of `region_id`. The cache key is the region id alone, so
    /// different pages of the same region share one entry.
    pub async fn get_customer_list(
        &self,
        region_id: &str,
        params: Option<&PaginationParams>,
        force_refresh: bool,
    ) -> Result<PaginationResult<CustomerInfo>> {
        self.cache
            .fetch(region_id, force_refresh, || self.api.list(region_id, params))
            .await
            .inspect_err(|e| error!(region_id, error = %e, "failed to fetch customer list"))
    }

    pub async fn get_customer_detail(&self, id: &str) -> Result<CustomerInfo> {
        self.api
            .detail(id)
            .await
            .inspect_err(|e| error!(customer_id = id, error = %e, "failed to fetch customer detail"))
    }

    /// Drops the entry for `region_id`, or every entry when `None`.
    pub async fn clear_cache(&self, region_id: Option<&str>) -> usize {
        self.cache.clear(region_id).await
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    pub async fn dispose(&self) {
        let stats = self.cache_stats().await;
        debug!(hit_rate = stats.hit_rate(), refreshes = stats.refreshes, "customer cache disposed");
        self.clear_cache(None).await;
    }
}
