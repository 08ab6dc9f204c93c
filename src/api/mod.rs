//! API Module
//!
//! Thin typed wrappers over the shared [`HttpClient`](crate::http::HttpClient),
//! one per resource, plus the wire types and path conventions.
//!
//! # Endpoints
//! - `GET /regions`, `GET /regions/{id}`, `GET /regions/stats`
//! - `GET /regions/{regionId}/customers`, `GET /customers/{id}`
//! - `GET /customers/{customerId}/devices`, `GET /devices/{id}`
//! - `PUT /devices/{id}/status`

pub mod customer;
pub mod device;
pub mod paths;
pub mod region;
pub mod types;

pub use customer::CustomerApi;
pub use device::DeviceApi;
pub use region::RegionApi;
pub use types::{
    CustomerInfo, DeviceInfo, DeviceStatusUpdateParams, PaginationParams, PaginationResult,
    RegionData, RegionStats,
};
