//! Device service: device lists cached per customer, status updates
//! patched into every cached list.

use std::time::Duration;

use tracing::{debug, error};

use crate::api::{DeviceApi, DeviceInfo, PaginationParams, PaginationResult};
use crate::cache::{CacheStats, CachedList};
use crate::error::Result;

/// Result of a status toggle.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdateOutcome {
    /// The device as the server returned it
    pub device: DeviceInfo,
    /// Cache keys (customer ids) whose lists were patched
    pub patched_keys: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DeviceService {
    api: DeviceApi,
    cache: CachedList<PaginationResult<DeviceInfo>>,
}

impl DeviceService {
    pub fn new(api: DeviceApi, ttl: Duration, max_entries: usize) -> Self {
        Self {
            api,
            cache: CachedList::new(ttl, max_entries),
        }
    }

    /// Devices of `customer_id`, cached per customer id.
    pub async fn get_device_list(
        &self,
        customer_id: &str,
        params: Option<&PaginationParams>,
        force_refresh: bool,
    ) -> Result<PaginationResult<DeviceInfo>> {
        self.cache
            .fetch(customer_id, force_refresh, || self.api.list(customer_id, params))
            .await
            .inspect_err(|e| error!(customer_id, error = %e, "failed to fetch device list"))
    }

    pub async fn get_device_detail(&self, id: &str) -> Result<DeviceInfo> {
        self.api
            .detail(id)
            .await
            .inspect_err(|e| error!(device_id = id, error = %e, "failed to fetch device detail"))
    }

    /// Sends the new status, then copies the server's `is_on` into every
    /// cached list item with this id. Other fields and entry timestamps are
    /// left alone. Nothing is patched when the request fails.
    pub async fn update_device_status(&self, id: &str, is_on: bool) -> Result<StatusUpdateOutcome> {
        let device = self
            .api
            .update_status(id, is_on)
            .await
            .inspect_err(|e| error!(device_id = id, is_on, error = %e, "failed to update device status"))?;

        let confirmed = device.is_on;
        let patched_keys = self
            .cache
            .patch_all(|page| {
                let mut changed = false;
                for item in page.list.iter_mut().filter(|d| d.id == id) {
                    if item.is_on != confirmed {
                        item.is_on = confirmed;
                        changed = true;
                    }
                }
                changed
            })
            .await;

        debug!(device_id = id, is_on = confirmed, patched = patched_keys.len(), "device status updated");
        Ok(StatusUpdateOutcome {
            device,
            patched_keys,
        })
    }

    /// Drops the entry for `customer_id`, or every entry when `None`.
    pub async fn clear_cache(&self, customer_id: Option<&str>) -> usize {
        self.cache.clear(customer_id).await
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    pub async fn dispose(&self) {
        let stats = self.cache_stats().await;
        debug!(hit_rate = stats.hit_rate(), refreshes = stats.refreshes, "device cache disposed");
        self.clear_cache(None).await;
    }
}
