//! tasktrack server
//!
//! - Task CRUD under /api/tasks (in-memory)
//! - Prometheus scrape endpoint at /metrics
//! - One JSON log line per request

use std::net::SocketAddr;

use tasktrack_core::error::{Result, TaskTrackError};
use tasktrack_server::{app_state, config, obs, router};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = config::load()?;
    obs::logging::init_tracing(&cfg.logging);
    obs::logging::install_panic_hook();

    let listen = cfg.listen_addr();
    let port = cfg.server.port;

    // Metrics registration errors abort startup here.
    let state = app_state::AppState::new(cfg)?;
    tracing::info!(
        http_buckets = ?state.cfg().metrics.http_buckets,
        "metrics registry ready"
    );
    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&listen)
        .await
        .map_err(|e| TaskTrackError::Internal(format!("bind {listen} failed: {e}")))?;
    tracing::info!(port, %listen, "Server started");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| TaskTrackError::Internal(format!("server failed: {e}")))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
