//! Customer endpoints.

use std::sync::Arc;

use crate::api::{paths, CustomerInfo, PaginationParams, PaginationResult};
use crate::error::Result;
use crate::http::HttpClient;

#[derive(Debug, Clone)]
pub struct CustomerApi {
    client: Arc<HttpClient>,
}

impl CustomerApi {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Customers of one region.
    pub async fn list(
        &self,
        region_id: &str,
        params: Option<&PaginationParams>,
    ) -> Result<PaginationResult<CustomerInfo>> {
        self.client
            .get(&paths::customer_list(region_id), params.map(PaginationParams::to_params))
            .await
    }

    pub async fn detail(&self, id: &str) -> Result<CustomerInfo> {
        self.client.get(&paths::customer_detail(id), None).await
    }
}
