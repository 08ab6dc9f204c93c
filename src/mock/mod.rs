//! Mock backend
//!
//! An in-process axum server that answers the telemetry endpoints from
//! built-in sample data. Used when the environment enables mocking.

pub mod data;
pub mod handlers;
pub mod routes;

use std::future::Future;

use tokio::net::TcpListener;
use tracing::info;

pub use data::MockData;
pub use handlers::{MockState, PageQuery, DEFAULT_PAGE_SIZE, NOT_FOUND_CODE, NOT_FOUND_MESSAGE};
pub use routes::{create_router, API_PREFIX};

/// Serves the mock router on `listener` until the process exits.
pub async fn serve(listener: TcpListener, state: MockState) -> std::io::Result<()> {
    serve_with_shutdown(listener, state, std::future::pending()).await
}

/// Serves the mock router on `listener` until `shutdown` resolves.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    state: MockState,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!("Mock backend listening on http://{}{}", addr, API_PREFIX);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
