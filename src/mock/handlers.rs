//! Mock Handlers
//!
//! Every handler answers HTTP 200 with a `{code, data, message}` envelope.
//! Unknown ids answer `code = 404`.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::api::{DeviceStatusUpdateParams, PaginationResult};
use crate::http::ApiResponse;
use crate::mock::MockData;

/// Page size used when the request does not give one.
pub const DEFAULT_PAGE_SIZE: u64 = 6;

/// Code and message for unknown ids.
pub const NOT_FOUND_CODE: i64 = 404;
pub const NOT_FOUND_MESSAGE: &str = "not found";

/// State shared across all handlers.
#[derive(Debug, Clone, Default)]
pub struct MockState {
    pub data: Arc<RwLock<MockData>>,
}

impl MockState {
    pub fn new(data: MockData) -> Self {
        Self {
            data: Arc::new(RwLock::new(data)),
        }
    }
}

/// `current` / `pageSize` query parameters. Anything else is ignored.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub current: Option<u64>,
    pub page_size: Option<u64>,
}

impl PageQuery {
    fn page<T: Clone>(&self, all: &[T]) -> PaginationResult<T> {
        PaginationResult::paginate(
            all,
            self.current.unwrap_or(1),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

fn ok<T: Serialize>(data: &T) -> Json<Value> {
    let envelope = match serde_json::to_value(data) {
        Ok(value) => ApiResponse::ok(value),
        Err(e) => ApiResponse::error(500, format!("failed to encode response: {}", e)),
    };
    Json(envelope.to_value())
}

fn not_found() -> Json<Value> {
    Json(ApiResponse::error(NOT_FOUND_CODE, NOT_FOUND_MESSAGE).to_value())
}

// == Regions ==
/// GET /regions
pub async fn list_regions(State(state): State<MockState>, Query(query): Query<PageQuery>) -> Json<Value> {
    let data = state.data.read().await;
    ok(&query.page(&data.regions))
}

/// GET /regions/stats
pub async fn region_stats(State(state): State<MockState>) -> Json<Value> {
    let data = state.data.read().await;
    ok(&data.stats())
}

/// GET /regions/:id
pub async fn region_detail(State(state): State<MockState>, Path(id): Path<String>) -> Json<Value> {
    let data = state.data.read().await;
    match data.region(&id) {
        Some(region) => ok(region),
        None => not_found(),
    }
}

// == Customers ==
/// GET /regions/:region_id/customers
pub async fn list_customers(
    State(state): State<MockState>,
    Path(region_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Json<Value> {
    let data = state.data.read().await;
    if data.region(&region_id).is_none() {
        return not_found();
    }
    let customers = data.customers.get(&region_id).map(Vec::as_slice).unwrap_or_default();
    ok(&query.page(customers))
}

/// GET /customers/:id
pub async fn customer_detail(State(state): State<MockState>, Path(id): Path<String>) -> Json<Value> {
    let data = state.data.read().await;
    match data.customer(&id) {
        Some(customer) => ok(customer),
        None => not_found(),
    }
}

// == Devices ==
/// GET /customers/:customer_id/devices
pub async fn list_devices(
    State(state): State<MockState>,
    Path(customer_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Json<Value> {
    let data = state.data.read().await;
    if data.customer(&customer_id).is_none() {
        return not_found();
    }
    ok(&query.page(&data.devices))
}

/// GET /devices/:id
pub async fn device_detail(State(state): State<MockState>, Path(id): Path<String>) -> Json<Value> {
    let data = state.data.read().await;
    match data.devices.iter().find(|d| d.id == id) {
        Some(device) => ok(device),
        None => not_found(),
    }
}

/// PUT /devices/:id/status
///
/// Stores the new status, stamps `lastUpdateTime` and answers the device.
pub async fn update_device_status(
    State(state): State<MockState>,
    Path(id): Path<String>,
    Json(req): Json<DeviceStatusUpdateParams>,
) -> Json<Value> {
    let mut data = state.data.write().await;
    let Some(device) = data.device_mut(&id) else {
        debug!(device_id = %id, "status update for unknown device");
        return not_found();
    };

    device.is_on = req.is_on;
    device.last_update_time = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    info!(device_id = %id, is_on = req.is_on, "mock device status updated");
    ok(&*device)
}

/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}
