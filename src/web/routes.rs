//! # Web API Routes
//!
//! Route definitions for the orchestrator endpoints, grouped by concern.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::web::{handlers, state::AppState};

/// Pipeline control routes: initiate, stop, status.
pub fn pipeline_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/initiate_pipeline", post(handlers::pipeline::initiate_pipeline))
        .route("/stop_pipeline", post(handlers::pipeline::stop_pipeline))
        .route("/pipeline_status", get(handlers::pipeline::pipeline_status))
}

/// Observability routes: banner, health, log view.
pub fn observability_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route("/logs", get(handlers::logs::view_logs))
}
