//! Services Module
//!
//! Cache-aside wrappers over the API layer. Each service owns its own cache,
//! sized and timed by the configuration it was built from.

pub mod customer;
pub mod device;
pub mod region;

use std::sync::Arc;

pub use customer::CustomerService;
pub use device::{DeviceService, StatusUpdateOutcome};
pub use region::{RegionService, RegionTotals, REGION_LIST_KEY};

use crate::api::{CustomerApi, DeviceApi, RegionApi};
use crate::config::Config;
use crate::http::{build_client, HttpClient, Transport};
use crate::storage::LocalStorage;

/// The three services wired to one shared client.
#[derive(Debug, Clone)]
pub struct Services {
    pub client: Arc<HttpClient>,
    pub regions: RegionService,
    pub customers: CustomerService,
    pub devices: DeviceService,
}

impl Services {
    /// Builds the configured client (see [`build_client`]) and the services
    /// on top of it.
    pub fn from_config(
        config: &Config,
        transport: Arc<dyn Transport>,
        storage: Option<Arc<LocalStorage>>,
    ) -> Self {
        let client = Arc::new(build_client(config, transport, storage));
        Self::with_client(client, config)
    }

    pub fn with_client(client: Arc<HttpClient>, config: &Config) -> Self {
        let ttl = config.cache_ttl();
        let max = config.max_cache_items;

        Self {
            regions: RegionService::new(RegionApi::new(client.clone()), ttl, max),
            customers: CustomerService::new(CustomerApi::new(client.clone()), ttl, max),
            devices: DeviceService::new(DeviceApi::new(client.clone()), ttl, max),
            client,
        }
    }

    /// Clears every service cache.
    pub async fn dispose(&self) {
        self.regions.dispose().await;
        self.customers.dispose().await;
        self.devices.dispose().await;
    }
}
