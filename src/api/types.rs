//! Wire types for the telemetry endpoints
//!
//! Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::Params;

// == Pagination ==
/// Page selection plus any extra filter parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaginationParams {
    /// 1-based page number
    pub current: Option<u64>,
    pub page_size: Option<u64>,
    /// Additional query parameters, appended after the page fields
    pub extra: Params,
}

impl PaginationParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(current: u64, page_size: u64) -> Self {
        Self {
            current: Some(current),
            page_size: Some(page_size),
            extra: Params::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.set(key, value);
        self
    }

    /// Query parameters in wire order: `current`, `pageSize`, then extras.
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        if let Some(current) = self.current {
            params.set("current", current);
        }
        if let Some(page_size) = self.page_size {
            params.set("pageSize", page_size);
        }
        for (key, value) in self.extra.iter() {
            params.set(key, value.clone());
        }
        params
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResult<T> {
    pub list: Vec<T>,
    pub total: u64,
    pub current: u64,
    pub page_size: u64,
    pub total_pages: u64,
    pub has_more: bool,
}

impl<T> PaginationResult<T> {
    /// Slices page `current` (1-based) of `page_size` items out of `all`.
    pub fn paginate(all: &[T], current: u64, page_size: u64) -> Self
    where
        T: Clone,
    {
        let current = current.max(1);
        let page_size = page_size.max(1);
        let total = all.len() as u64;
        let total_pages = total.div_ceil(page_size);

        let start = usize::try_from((current - 1).saturating_mul(page_size)).unwrap_or(usize::MAX);
        let list: Vec<T> = all
            .iter()
            .skip(start)
            .take(usize::try_from(page_size).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Self {
            list,
            total,
            current,
            page_size,
            total_pages,
            has_more: current < total_pages,
        }
    }
}

// == Domain Types ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionData {
    pub id: String,
    pub name: String,
    pub device_count: u64,
    pub running_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub id: String,
    pub name: String,
    pub code: String,
    pub last_update_time: String,
    pub location: String,
    pub series: String,
    pub is_on: bool,
}

/// Fleet-wide summary returned by `/regions/stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionStats {
    pub total_regions: u64,
    pub total_devices: u64,
    pub running_devices: u64,
    pub offline_devices: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatusUpdateParams {
    pub is_on: bool,
}
