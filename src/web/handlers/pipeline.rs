//! # Pipeline Handlers
//!
//! The start/stop/status surface over the orchestrator. Thin plumbing:
//! parameter validation and response shaping happen here, every decision
//! happens in the orchestrator.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::orchestration::types::MissionParams;
use crate::web::errors::{ApiError, ApiResult};
use crate::web::response_types::{
    Coordinates, InitiateResponse, StatusResponse, StopResponse,
};
use crate::web::state::AppState;

/// Query parameters for pipeline initiation.
#[derive(Debug, Deserialize)]
pub struct InitiateQuery {
    pub lat: f64,
    pub lon: f64,
    /// Camera trap that triggered the mission, when known
    pub camid: Option<String>,
}

/// Initiate the mission pipeline: POST /initiate_pipeline
///
/// Returns 202-style acceptance immediately; the pipeline runs in the
/// background. 409 while a run is active, 400 for malformed coordinates.
pub async fn initiate_pipeline(
    State(state): State<Arc<AppState>>,
    Query(query): Query<InitiateQuery>,
) -> ApiResult<Json<InitiateResponse>> {
    info!(
        lat = query.lat,
        lon = query.lon,
        camera_id = query.camid.as_deref(),
        "Pipeline initiation requested"
    );

    let params = MissionParams::new(query.lat, query.lon, query.camid.clone())
        .map_err(ApiError::from)?;
    state.orchestrator.start(params).map_err(ApiError::from)?;

    Ok(Json(InitiateResponse {
        message: format!(
            "Process initiated with coordinates: {},{}. Pipeline started.",
            query.lat, query.lon
        ),
        status: "pipeline_started".to_string(),
        coordinates: Coordinates {
            lat: query.lat,
            lon: query.lon,
        },
        camera_id: query.camid,
    }))
}

/// Stop the pipeline: POST /stop_pipeline
///
/// Fires the cancellation signal and best-effort stops every known service.
/// A no-op returning `already_stopped` when nothing is running.
pub async fn stop_pipeline(State(state): State<Arc<AppState>>) -> Json<StopResponse> {
    info!("Pipeline stop requested");

    match state.orchestrator.stop().await {
        Some(report) => {
            let contacted: Vec<&str> = report
                .stopped_services
                .iter()
                .chain(report.failed_services.iter())
                .map(String::as_str)
                .collect();
            Json(StopResponse {
                message: format!("Pipeline stopped. Services contacted: {}", contacted.join(", ")),
                status: "stopped".to_string(),
                pipeline_running: false,
                stopped_services: report.stopped_services,
                failed_services: report.failed_services,
            })
        }
        None => Json(StopResponse {
            message: "Pipeline is not currently running".to_string(),
            status: "already_stopped".to_string(),
            pipeline_running: false,
            stopped_services: Vec::new(),
            failed_services: Vec::new(),
        }),
    }
}

/// Pipeline status: GET /pipeline_status
pub async fn pipeline_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let snapshot = state.orchestrator.status();
    Json(StatusResponse {
        status: snapshot.state,
        pipeline_running: snapshot.state.is_active(),
        current_step: snapshot.current_step,
        coordinates: snapshot.params.as_ref().map(|p| Coordinates {
            lat: p.lat,
            lon: p.lon,
        }),
        stop_requested: snapshot.stop_requested,
        last_outcome: snapshot.last_outcome,
    })
}
