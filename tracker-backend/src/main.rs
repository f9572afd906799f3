use tracker_backend::config::{DEFAULT_CONFIG_PATH, TrackerConfig};
use tracker_backend::module::flights::{
    DemoGenerator, FeedClient, FlightQuery, RefreshPolicy, RefreshScheduler, SnapshotStore,
};
use tracker_backend::service;

use anyhow::{Context, Result};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = TrackerConfig::load_or_default(&config_path)?;

    // Initialize logging
    let _logging_guard = tracker_backend::logging::init_logging(
        &config.log_dir,
        "flight-tracker",
        &config.log_level,
    )?;

    tracing::info!("Flight tracker starting...");
    tracing::info!("Loaded configuration from {}: {:?}", config_path, config);

    let policy = RefreshPolicy {
        demo_flight_count: config.demo_flight_count,
        ..RefreshPolicy::default()
    };

    let store = Arc::new(SnapshotStore::new());
    let feed = FeedClient::new(&config.feed_url)?;
    tracing::info!("Polling flight states from {}", feed.url());

    let scheduler = RefreshScheduler::new(feed, DemoGenerator::default(), store.clone(), policy.clone());
    let refresh_handle = scheduler.start();

    let app = service::router(FlightQuery::new(store, &policy), config.static_dir.clone());

    let addr = config.server_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("HTTP server listening on http://{}", addr);

    let served = axum::serve(listener, app).await;

    refresh_handle.abort();
    tracing::info!("Flight tracker stopped");

    served?;
    Ok(())
}
