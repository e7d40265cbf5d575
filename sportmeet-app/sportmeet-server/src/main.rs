// ============================================================================
// Sportmeet Server - Entry Point
// File: sportmeet-app/sportmeet-server/src/main.rs
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use stores::StoreHandles;
use tracing::info;

use sportmeet_api::{build_router, AppState};
use sportmeet_shared::config::AppConfig;

mod shutdown;
mod stores;
mod warmup;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Guard must outlive the server for the file sink to flush.
    let _log_guard = sportmeet_shared::telemetry::init_telemetry(&config.log)?;

    info!(
        name = %config.app.name,
        env = %config.app.env,
        storage = ?config.app.storage,
        "Sportmeet server starting..."
    );

    let handles = StoreHandles::open(&config).await?;
    let state = AppState::build(handles.ports(), &config).context("Invalid session settings")?;

    // Initial warm-up; a failure is logged by the feed and leaves the feeds
    // empty until the next refresh.
    state.feed.warm_up().await.ok();
    let refresher = warmup::spawn_refresh(Arc::clone(&state.feed), config.cache.refresh_interval_secs);

    let app = build_router(state);

    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await?;

    if let Some(task) = refresher {
        task.abort();
    }
    handles.close().await;

    info!("Server shut down");
    Ok(())
}
