//! # Health Check Handlers
//!
//! Health and banner endpoints for monitoring and load balancing.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use std::sync::Arc;

use crate::web::response_types::{HealthResponse, RootResponse};
use crate::web::state::AppState;

/// Root endpoint: GET /
pub async fn root(State(_state): State<Arc<AppState>>) -> Json<RootResponse> {
    Json(RootResponse {
        message: "SmartFields Service".to_string(),
        status: "running".to_string(),
    })
}

/// Basic health check endpoint: GET /health
///
/// Reports the configured services and whether a pipeline run is active.
/// Always available, even while a run is in flight.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let snapshot = state.orchestrator.status();
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "smartfields".to_string(),
        pipeline_running: snapshot.state.is_active(),
        services_configured: state.config.services.keys().cloned().collect(),
        timestamp: Utc::now(),
    })
}
