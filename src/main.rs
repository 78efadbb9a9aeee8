mod api;
mod catalog;
mod config;
mod engine;
mod error;
mod geo;
mod ledger;
mod models;
mod observability;
mod routing;
mod state;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), error::AppError> {
    let config = config::Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false)
        .compact()
        .init();

    let state = Arc::new(state::AppState::new(config));

    // Seed the availability gauges so the first scrape sees the catalog.
    for location in state.catalog.snapshot_all() {
        state
            .metrics
            .location_availability
            .with_label_values(&[&location.name])
            .set(f64::from(location.available_spots));
    }

    let app = api::rest::router(state.clone());

    tokio::spawn(engine::simulator::run_availability_simulator(state.clone()));

    let bind_addr = format!("0.0.0.0:{}", state.config.http_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| error::AppError::Internal(format!("failed to bind {bind_addr}: {err}")))?;

    tracing::info!(http_port = state.config.http_port, "http server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| error::AppError::Internal(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
