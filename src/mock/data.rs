//! Built-in sample data served by the mock backend.

use std::collections::BTreeMap;

use crate::api::{CustomerInfo, DeviceInfo, RegionData, RegionStats};

/// Everything the mock backend knows about.
#[derive(Debug, Clone, PartialEq)]
pub struct MockData {
    pub regions: Vec<RegionData>,
    /// Customers keyed by region id
    pub customers: BTreeMap<String, Vec<CustomerInfo>>,
    /// Every customer sees the same device list
    pub devices: Vec<DeviceInfo>,
}

impl MockData {
    /// Six regions, eight customers, three devices.
    pub fn sample() -> Self {
        let regions = vec![
            region("north", "North China", 3, 0),
            region("northeast", "Northeast China", 1, 0),
            region("east", "East China", 133, 38),
            region("central", "Central China", 11, 7),
            region("south", "South China", 78, 15),
            region("southwest", "Southwest China", 42, 9),
        ];

        let mut customers = BTreeMap::new();
        customers.insert(
            "north".to_string(),
            vec![
                customer("c1", "BullmerTest", "010-12345678", "Chaoyang District, Beijing"),
                customer("c2", "Northern Tech", "010-87654321", "Nankai District, Tianjin"),
            ],
        );
        customers.insert(
            "northeast".to_string(),
            vec![customer("c3", "Northeast Industrial", "024-12345678", "Heping District, Shenyang")],
        );
        customers.insert(
            "east".to_string(),
            vec![
                customer("c4", "Jiangnan Manufacturing", "021-12345678", "Pudong New Area, Shanghai"),
                customer("c5", "Hangzhou Intelligent", "0571-87654321", "Xihu District, Hangzhou"),
            ],
        );
        customers.insert(
            "central".to_string(),
            vec![customer("c6", "Central Plains Tech", "027-12345678", "Hongshan District, Wuhan")],
        );
        customers.insert(
            "south".to_string(),
            vec![customer("c7", "Southern Smart Manufacturing", "020-12345678", "Tianhe District, Guangzhou")],
        );
        customers.insert(
            "southwest".to_string(),
            vec![customer("c8", "Southwest Enterprise", "028-12345678", "Jinjiang District, Chengdu")],
        );

        let devices = vec![
            device("1", "123456", "2025-05-16 11:39:11", "E Series"),
            device("2", "654321", "2024-02-02 12:54:47", "D Series"),
            device("3", "123456789", "2023-11-30 09:45:47", "E Series"),
        ];

        Self {
            regions,
            customers,
            devices,
        }
    }

    pub fn region(&self, id: &str) -> Option<&RegionData> {
        self.regions.iter().find(|r| r.id == id)
    }

    pub fn customer(&self, id: &str) -> Option<&CustomerInfo> {
        self.customers.values().flatten().find(|c| c.id == id)
    }

    pub fn device_mut(&mut self, id: &str) -> Option<&mut DeviceInfo> {
        self.devices.iter_mut().find(|d| d.id == id)
    }

    /// Totals derived from the region list.
    pub fn stats(&self) -> RegionStats {
        let total_devices: u64 = self.regions.iter().map(|r| r.device_count).sum();
        let running_devices: u64 = self.regions.iter().map(|r| r.running_count).sum();

        RegionStats {
            total_regions: self.regions.len() as u64,
            total_devices,
            running_devices,
            offline_devices: total_devices.saturating_sub(running_devices),
        }
    }
}

impl Default for MockData {
    fn default() -> Self {
        Self::sample()
    }
}

fn region(id: &str, name: &str, device_count: u64, running_count: u64) -> RegionData {
    RegionData {
        id: id.to_string(),
        name: name.to_string(),
        device_count,
        running_count,
    }
}

fn customer(id: &str, name: &str, phone: &str, address: &str) -> CustomerInfo {
    CustomerInfo {
        id: id.to_string(),
        name: name.to_string(),
        phone: phone.to_string(),
        address: address.to_string(),
    }
}

fn device(id: &str, code: &str, last_update_time: &str, series: &str) -> DeviceInfo {
    DeviceInfo {
        id: id.to_string(),
        name: "BullmerTest (cutter)".to_string(),
        code: code.to_string(),
        last_update_time: last_update_time.to_string(),
        location: "Dongcheng, Beijing, China".to_string(),
        series: series.to_string(),
        is_on: false,
    }
}
