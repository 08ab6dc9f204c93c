//! Device endpoints.

use std::sync::Arc;

use crate::api::{paths, DeviceInfo, DeviceStatusUpdateParams, PaginationParams, PaginationResult};
use crate::error::Result;
use crate::http::HttpClient;

#[derive(Debug, Clone)]
pub struct DeviceApi {
    client: Arc<HttpClient>,
}

impl DeviceApi {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Devices of one customer.
    pub async fn list(
        &self,
        customer_id: &str,
        params: Option<&PaginationParams>,
    ) -> Result<PaginationResult<DeviceInfo>> {
        self.client
            .get(&paths::device_list(customer_id), params.map(PaginationParams::to_params))
            .await
    }

    pub async fn detail(&self, id: &str) -> Result<DeviceInfo> {
        self.client.get(&paths::device_detail(id), None).await
    }

    /// `PUT /devices/{id}/status` with `{"isOn": ..}`; answers the updated device.
    pub async fn update_status(&self, id: &str, is_on: bool) -> Result<DeviceInfo> {
        self.client
            .put(&paths::device_status(id), Some(&DeviceStatusUpdateParams { is_on }))
            .await
    }
}
