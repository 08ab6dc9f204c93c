//! Mock Routes
//!
//! Mounts the resource endpoints under [`API_PREFIX`] so the router can stand
//! in for a real backend whose base URL ends in `/api`.

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    customer_detail, device_detail, health_handler, list_customers, list_devices, list_regions,
    region_detail, region_stats, update_device_status, MockState,
};

pub const API_PREFIX: &str = "/api";

/// Creates the mock router.
///
/// # Endpoints
/// - `GET /api/regions`, `GET /api/regions/stats`, `GET /api/regions/:id`
/// - `GET /api/regions/:region_id/customers`, `GET /api/customers/:id`
/// - `GET /api/customers/:customer_id/devices`, `GET /api/devices/:id`
/// - `PUT /api/devices/:id/status`
/// - `GET /health`
pub fn create_router(state: MockState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/regions", get(list_regions))
        .route("/regions/stats", get(region_stats))
        .route("/regions/:id", get(region_detail))
        .route("/regions/:id/customers", get(list_customers))
        .route("/customers/:id", get(customer_detail))
        .route("/customers/:id/devices", get(list_devices))
        .route("/devices/:id", get(device_detail))
        .route("/devices/:id/status", put(update_device_status));

    Router::new()
        .nest(API_PREFIX, api)
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
