//! Region endpoints.

use std::sync::Arc;

use crate::api::{paths, PaginationParams, PaginationResult, RegionData, RegionStats};
use crate::error::Result;
use crate::http::HttpClient;

#[derive(Debug, Clone)]
pub struct RegionApi {
    client: Arc<HttpClient>,
}

impl RegionApi {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self, params: Option<&PaginationParams>) -> Result<PaginationResult<RegionData>> {
        self.client
            .get(paths::REGION_LIST, params.map(PaginationParams::to_params))
            .await
    }

    pub async fn detail(&self, id: &str) -> Result<RegionData> {
        self.client.get(&paths::region_detail(id), None).await
    }

    pub async fn stats(&self) -> Result<RegionStats> {
        self.client.get(paths::REGION_STATS, None).await
    }
}
