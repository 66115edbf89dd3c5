//! # Orchestration Types
//!
//! Core types shared across the pipeline orchestrator: step definitions,
//! mission parameters, run outcomes, and the reports returned to callers.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::timing;
use crate::error::{PipelineError, Result};

/// What to do when a step exhausts its retries or fails its completion wait.
///
/// The first step of a pipeline always aborts on failure regardless of
/// policy; a drone that never took off has nothing to continue to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort the whole run and report `Failed`
    AbortPipeline,
    /// Log the failure and move on to the next step
    ContinueToNextStep,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self::AbortPipeline
    }
}

/// One step of the mission pipeline: a remote-service invocation plus its
/// completion wait. Immutable once the orchestrator is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSpec {
    /// Name of the service to invoke, resolved through the service registry
    pub service: String,
    /// Mission name passed to the start endpoint and watched for in the log
    /// stream. `None` for services that run a single unnamed mission.
    #[serde(default)]
    pub job: Option<String>,
    /// Additional call attempts after the first failure
    #[serde(default)]
    pub max_retries: u32,
    /// Settle time after this step completes, before the next step starts
    #[serde(default = "StepSpec::default_inter_step_delay", with = "secs")]
    pub inter_step_delay: Duration,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl StepSpec {
    pub fn new(service: impl Into<String>, job: Option<&str>) -> Self {
        Self {
            service: service.into(),
            job: job.map(str::to_string),
            max_retries: 0,
            inter_step_delay: Self::default_inter_step_delay(),
            failure_policy: FailurePolicy::AbortPipeline,
        }
    }

    fn default_inter_step_delay() -> Duration {
        Duration::from_secs(10)
    }
}

/// Serde helper: step delays are written as whole seconds in config files.
mod secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}

/// Retry pacing for failed start-mission calls. A constant in production;
/// injectable so tests do not sit through real five-second delays.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_delay: timing::RETRY_DELAY,
        }
    }
}

/// Validated mission parameters supplied by the start request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionParams {
    pub lat: f64,
    pub lon: f64,
    /// Camera trap that triggered the mission, when known
    pub camera_id: Option<String>,
}

impl MissionParams {
    pub fn new(lat: f64, lon: f64, camera_id: Option<String>) -> Result<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(PipelineError::InvalidParameters(format!(
                "latitude out of range: {lat}"
            )));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(PipelineError::InvalidParameters(format!(
                "longitude out of range: {lon}"
            )));
        }
        Ok(Self {
            lat,
            lon,
            camera_id,
        })
    }
}

/// Why a run ended `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Every call attempt for the step returned non-2xx or timed out
    CallFailed,
    /// Neither sentinel appeared within the completion timeout
    CompletionTimedOut,
    /// A failure sentinel appeared in the service's log stream
    CompletionFailed,
    /// A stop request was observed mid-run
    Cancelled,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CallFailed => write!(f, "call_failed"),
            Self::CompletionTimedOut => write!(f, "completion_timed_out"),
            Self::CompletionFailed => write!(f, "completion_failed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Terminal result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every step was invoked and confirmed complete
    Completed,
    /// The run aborted at `step_index` for `reason`
    Failed {
        step_index: usize,
        reason: FailureReason,
    },
}

/// Result of a start request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartResult {
    /// The run was accepted and the background executor spawned
    Accepted,
}

/// Report returned by a stop request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopReport {
    /// Services that acknowledged the stop command
    pub stopped_services: Vec<String>,
    /// Services that rejected it or could not be reached
    pub failed_services: Vec<String>,
}
