//! # Web API Errors
//!
//! Maps orchestrator errors onto HTTP responses. The one interesting mapping
//! is `AlreadyRunning` → 409, the single-flight rejection.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::PipelineError;

/// JSON body returned for every error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Error type returned by web handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: String,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            error: error.to_string(),
            message: message.into(),
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match &err {
            PipelineError::AlreadyRunning => {
                Self::new(StatusCode::CONFLICT, "already_running", err.to_string())
            }
            PipelineError::InvalidParameters(_) => {
                Self::new(StatusCode::BAD_REQUEST, "invalid_parameters", err.to_string())
            }
            _ => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                err.to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.error,
            message: self.message,
            timestamp: Utc::now(),
        });
        (self.status, body).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_running_maps_to_conflict() {
        let api: ApiError = PipelineError::AlreadyRunning.into();
        assert_eq!(api.status, StatusCode::CONFLICT);
        assert_eq!(api.error, "already_running");
    }

    #[test]
    fn test_invalid_parameters_maps_to_bad_request() {
        let api: ApiError = PipelineError::InvalidParameters("latitude out of range".into()).into();
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
    }
}
