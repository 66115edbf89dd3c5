//! # Pipeline Orchestration
//!
//! The core of the system: sequencing mission steps across the drone and
//! detection services, confirming each via its log sentinel, applying
//! per-step retry and failure policy, and exposing start/stop/status under
//! concurrent access.
//!
//! ## Core Components
//!
//! - **PipelineOrchestrator**: start/stop/status surface and single-flight guard
//! - **PipelineExecutor**: the background run loop walking the step list
//! - **MissionDispatch**: seam to the remote services and their log streams
//!
//! Handlers call the orchestrator concurrently; exactly one executor task is
//! live at a time, and all shared state goes through `RunStateStore`.

pub mod dispatch;
pub mod executor;
pub mod orchestrator;
pub mod types;

pub use dispatch::{LiveDispatch, MissionDispatch};
pub use orchestrator::PipelineOrchestrator;
pub use types::{
    FailurePolicy, FailureReason, MissionParams, RetryPolicy, RunOutcome, StartResult, StepSpec,
    StopReport,
};
