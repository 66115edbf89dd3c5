//! SmartFields orchestrator server.
//!
//! Wires configuration, logging, the mission service client, and the
//! pipeline orchestrator into the REST surface, then serves until shutdown.
//! Shutdown stops an in-flight pipeline cooperatively before exiting.

use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use smartfields_core::client::{ServiceClient, ServiceClientConfig};
use smartfields_core::config::ConfigManager;
use smartfields_core::logging::init_structured_logging;
use smartfields_core::monitor::CompletionMonitor;
use smartfields_core::orchestration::{LiveDispatch, PipelineOrchestrator};
use smartfields_core::web::{create_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let manager = ConfigManager::load().context("loading configuration")?;
    let config = manager.config().clone();

    init_structured_logging(&config.logging.directory);
    info!("SmartFields service starting up");

    let client = ServiceClient::new(ServiceClientConfig::default())
        .context("building mission service client")?;
    let monitor = CompletionMonitor::new(config.monitor.monitor_config());
    let dispatch = LiveDispatch::new(client, config.registry(), monitor);
    let orchestrator = Arc::new(PipelineOrchestrator::new(config.steps(), dispatch));

    let state = AppState::new(Arc::clone(&orchestrator), config.clone());
    let app = create_app(state);

    let bind_address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("binding {bind_address}"))?;
    info!(address = %bind_address, "SmartFields service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(orchestrator))
        .await
        .context("serving HTTP")?;

    info!("SmartFields service shut down");
    Ok(())
}

/// Wait for ctrl-c, then stop any in-flight pipeline before the server
/// drains its connections.
async fn shutdown_signal(orchestrator: Arc<PipelineOrchestrator>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
    if orchestrator.stop().await.is_some() {
        info!("Stopped in-flight pipeline during shutdown");
    }
}
