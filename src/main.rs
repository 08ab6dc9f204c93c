//! MES Client - telemetry client core for equipment monitoring
//!
//! Loads the environment configuration, optionally starts the in-process
//! mock backend, then fetches the region overview once and logs it.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mes_client::mock::{self, MockData, MockState, API_PREFIX};
use mes_client::services::RegionService;
use mes_client::{Config, LocalStorage, ReqwestTransport, Services};

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Start the mock backend when the environment enables it
/// 4. Build the services over a reqwest transport
/// 5. Fetch the region list and stats, log the totals
/// 6. Stop the mock backend
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mes_client=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = Config::from_env();
    info!(
        "Configuration loaded: env={}, api={}, timeout={}ms, cache_ttl={}s, max_cache_items={}",
        config.env.as_str(),
        config.api.api_base_url,
        config.api.timeout_ms,
        config.cache_ttl_secs,
        config.max_cache_items
    );

    let mock = if config.api.enable_mock {
        let (addr, handle) = start_mock(config.mock_port).await?;
        config.api.api_base_url = format!("http://{}{}", addr, API_PREFIX);
        info!("Using mock backend at {}", config.api.api_base_url);
        Some(handle)
    } else {
        None
    };

    let storage = match LocalStorage::open_or_default(config.storage_path.as_deref()) {
        Ok(storage) => Some(Arc::new(storage)),
        Err(e) => {
            warn!("Local storage unavailable, continuing without auth token: {}", e);
            None
        }
    };

    let services = Services::from_config(&config, Arc::new(ReqwestTransport::new()), storage);

    let outcome = tokio::select! {
        result = run_overview(&services) => result,
        _ = shutdown_signal() => {
            info!("Interrupted before the overview finished");
            Ok(())
        }
    };

    services.dispose().await;
    if let Some(mock) = mock {
        mock.stop().await;
    }

    info!("Shutdown complete");
    outcome
}

async fn run_overview(services: &Services) -> anyhow::Result<()> {
    let regions = services
        .regions
        .get_region_list(None, false)
        .await
        .context("fetching region list")?;
    let totals = RegionService::calculate_totals(&regions.list);
    info!(
        regions = regions.total,
        total_devices = totals.total_devices,
        total_running = totals.total_running,
        "Region overview"
    );

    let stats = services
        .regions
        .get_region_stats()
        .await
        .context("fetching region stats")?;
    info!(
        total_regions = stats.total_regions,
        running_devices = stats.running_devices,
        offline_devices = stats.offline_devices,
        "Region stats"
    );

    Ok(())
}

struct MockHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

impl MockHandle {
    async fn stop(self) {
        // Receiver is gone if the server already exited
        let _ = self.stop.send(());
        match self.task.await {
            Ok(Ok(())) => info!("Mock backend stopped"),
            Ok(Err(e)) => warn!("Mock backend failed: {}", e),
            Err(e) => warn!("Mock backend task panicked: {}", e),
        }
    }
}

async fn start_mock(port: u16) -> anyhow::Result<(SocketAddr, MockHandle)> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], port)))
        .await
        .with_context(|| format!("binding mock backend to port {}", port))?;
    let addr = listener.local_addr()?;

    let (stop, stopped) = oneshot::channel::<()>();
    let state = MockState::new(MockData::sample());
    let task = tokio::spawn(mock::serve_with_shutdown(listener, state, async move {
        let _ = stopped.await;
    }));

    Ok((addr, MockHandle { stop, task }))
}

/// Waits for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
