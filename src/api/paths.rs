//! Endpoint paths, relative to the API base URL.

pub const REGION_LIST: &str = "/regions";
pub const REGION_STATS: &str = "/regions/stats";

pub fn region_detail(id: &str) -> String {
    format!("/regions/{}", id)
}

pub fn customer_list(region_id: &str) -> String {
    format!("/regions/{}/customers", region_id)
}

pub fn customer_detail(id: &str) -> String {
    format!("/customers/{}", id)
}

pub fn device_list(customer_id: &str) -> String {
    format!("/customers/{}/devices", customer_id)
}

pub fn device_detail(id: &str) -> String {
    format!("/devices/{}", id)
}

pub fn device_status(id: &str) -> String {
    format!("/devices/{}/status", id)
}
