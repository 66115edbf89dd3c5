//! Error types for the SmartFields orchestrator.

use thiserror::Error;

/// Errors surfaced by the pipeline orchestrator and its supporting modules.
///
/// Remote call failures are deliberately absent: `ServiceClient` reports them
/// through its boolean result so the orchestrator can apply per-step retry
/// policy instead of error propagation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    #[error("Pipeline is already running")]
    AlreadyRunning,
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Service error: {0}")]
    ServiceError(String),
    #[error("Log stream error: {0}")]
    LogStreamError(String),
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::LogStreamError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
