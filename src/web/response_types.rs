//! # Web API Response Types
//!
//! Standard response structures for the orchestrator endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::orchestration::types::RunOutcome;
use crate::state::PipelineState;

/// Target coordinates echoed back to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Response to a successful pipeline initiation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiateResponse {
    pub message: String,
    pub status: String,
    pub coordinates: Coordinates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_id: Option<String>,
}

/// Response to a pipeline status query.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub status: PipelineState,
    pub pipeline_running: bool,
    pub current_step: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    pub stop_requested: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_outcome: Option<RunOutcome>,
}

/// Response to a stop request.
#[derive(Debug, Clone, Serialize)]
pub struct StopResponse {
    pub message: String,
    pub status: String,
    pub pipeline_running: bool,
    pub stopped_services: Vec<String>,
    pub failed_services: Vec<String>,
}

/// Basic health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub pipeline_running: bool,
    pub services_configured: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Root endpoint banner.
#[derive(Debug, Clone, Serialize)]
pub struct RootResponse {
    pub message: String,
    pub status: String,
}
