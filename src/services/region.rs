//! Region service: cached region list plus uncached detail and stats.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error};

use crate::api::{PaginationParams, PaginationResult, RegionApi, RegionData, RegionStats};
use crate::cache::{CacheStats, CachedList};
use crate::error::Result;

/// The region list is cached under a single key regardless of pagination.
pub const REGION_LIST_KEY: &str = "regions";

/// Device counts summed over a set of regions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegionTotals {
    pub total_devices: u64,
    pub total_running: u64,
}

#[derive(Debug, Clone)]
pub struct RegionService {
    api: RegionApi,
    cache: CachedList<PaginationResult<RegionData>>,
}

impl RegionService {
    pub fn new(api: RegionApi, ttl: Duration, max_entries: usize) -> Self {
        Self {
            api,
            cache: CachedList::new(ttl, max_entries),
        }
    }

    /// Region list, served from cache while fresh unless `force_refresh`.
    pub async fn get_region_list(
        &self,
        params: Option<&PaginationParams>,
        force_refresh: bool,
    ) -> Result<PaginationResult<RegionData>> {
        self.cache
            .fetch(REGION_LIST_KEY, force_refresh, || self.api.list(params))
            .await
            .inspect_err(|e| error!(error = %e, "failed to fetch region list"))
    }

    pub async fn get_region_detail(&self, id: &str) -> Result<RegionData> {
        self.api
            .detail(id)
            .await
            .inspect_err(|e| error!(region_id = id, error = %e, "failed to fetch region detail"))
    }

    pub async fn get_region_stats(&self) -> Result<RegionStats> {
        self.api
            .stats()
            .await
            .inspect_err(|e| error!(error = %e, "failed to fetch region stats"))
    }

    pub fn calculate_totals(regions: &[RegionData]) -> RegionTotals {
        regions.iter().fold(RegionTotals::default(), |acc, region| RegionTotals {
            total_devices: acc.total_devices.saturating_add(region.device_count),
            total_running: acc.total_running.saturating_add(region.running_count),
        })
    }

    pub async fn clear_cache(&self) {
        self.cache.clear(None).await;
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    pub async fn dispose(&self) {
        let stats = self.cache_stats().await;
        debug!(hit_rate = stats.hit_rate(), refreshes = stats.refreshes, "region cache disposed");
        self.clear_cache().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::http::testing::FnTransport;
    use crate::http::{HttpClient, RawResponse};
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn region(id: &str, devices: u64, running: u64) -> RegionData {
        RegionData {
            id: id.to_string(),
            name: id.to_string(),
            device_count: devices,
            running_count: running,
        }
    }

    fn page_body() -> serde_json::Value {
        json!({
            "list": [
                {"id": "east", "name": "East", "deviceCount": 133, "runningCount": 38},
                {"id": "south", "name": "South", "deviceCount": 78, "runningCount": 15}
            ],
            "total": 2, "current": 1, "pageSize": 6, "totalPages": 1, "hasMore": false
        })
    }

    fn service(transport: Arc<FnTransport>, ttl: Duration) -> RegionService {
        let client = Arc::new(HttpClient::new("https://api.example.com", transport));
        RegionService::new(RegionApi::new(client), ttl, 100)
    }

    #[tokio::test]
    async fn test_region_list_cached_within_ttl() {
        let transport = Arc::new(FnTransport::new(|_| Ok(RawResponse::envelope(0, page_body(), "ok"))));
        let service = service(transport.clone(), Duration::from_secs(300));

        let first = service.get_region_list(Some(&PaginationParams::page(1, 6)), false).await.unwrap();
        // Different page, same singleton key
        let second = service.get_region_list(Some(&PaginationParams::page(2, 6)), false).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(transport.call_count(), 1);
        assert_eq!(
            transport.requests()[0].url,
            "https://api.example.com/regions?current=1&pageSize=6"
        );

        service.get_region_list(None, true).await.unwrap();
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_cached_list() {
        let failing = Arc::new(AtomicBool::new(false));
        let flag = failing.clone();
        let transport = Arc::new(FnTransport::new(move |_| {
            if flag.load(Ordering::SeqCst) {
                Err(ClientError::Network("down".to_string()))
            } else {
                Ok(RawResponse::envelope(0, page_body(), "ok"))
            }
        }));
        let service = service(transport.clone(), Duration::from_secs(300));

        let cached = service.get_region_list(None, false).await.unwrap();
        failing.store(true, Ordering::SeqCst);

        assert!(service.get_region_list(None, true).await.is_err());
        assert_eq!(service.get_region_list(None, false).await.unwrap(), cached);
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_detail_and_stats_never_cached() {
        let transport = Arc::new(FnTransport::new(|req| {
            if req.url.ends_with("/stats") {
                Ok(RawResponse::envelope(
                    0,
                    json!({"totalRegions": 6, "totalDevices": 268, "runningDevices": 69, "offlineDevices": 199}),
                    "ok",
                ))
            } else {
                Ok(RawResponse::envelope(
                    0,
                    json!({"id": "east", "name": "East", "deviceCount": 133, "runningCount": 38}),
                    "ok",
                ))
            }
        }));
        let service = service(transport.clone(), Duration::from_secs(300));

        service.get_region_detail("east").await.unwrap();
        service.get_region_detail("east").await.unwrap();
        let stats = service.get_region_stats().await.unwrap();
        service.get_region_stats().await.unwrap();

        assert_eq!(stats.running_devices, 69);
        assert_eq!(transport.call_count(), 4);
    }

    #[tokio::test]
    async fn test_dispose_clears_cache() {
        let transport = Arc::new(FnTransport::new(|_| Ok(RawResponse::envelope(0, page_body(), "ok"))));
        let service = service(transport.clone(), Duration::from_secs(300));

        service.get_region_list(None, false).await.unwrap();
        service.dispose().await;
        service.get_region_list(None, false).await.unwrap();

        assert_eq!(transport.call_count(), 2);
    }

    #[test]
    fn test_calculate_totals() {
        let totals = RegionService::calculate_totals(&[
            region("north", 3, 0),
            region("east", 133, 38),
            region("south", 78, 15),
        ]);
        assert_eq!(
            totals,
            RegionTotals {
                total_devices: 214,
                total_running: 53
            }
        );
        assert_eq!(RegionService::calculate_totals(&[]), RegionTotals::default());
    }

    #[test]
    fn test_calculate_totals_saturates() {
        let totals = RegionService::calculate_totals(&[
            region("north", u64::MAX, u64::MAX),
            region("east", 1, 1),
        ]);
        assert_eq!(totals.total_devices, u64::MAX);
        assert_eq!(totals.total_running, u64::MAX);
    }
}
