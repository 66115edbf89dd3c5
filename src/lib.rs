//! # SmartFields Core
//!
//! Mission pipeline orchestrator for the SmartFields field-robotics stack.
//!
//! ## Overview
//!
//! SmartFields coordinates a multi-step drone mission across independently
//! deployed services: the flight controller (`openpasslite`) flies the drone
//! out and back, and the detection service (`wildwings`) runs the animal
//! tracking loop at the target. Each service accepts a start command,
//! returns immediately, and signals completion by writing a sentinel line
//! into its append-only log file; this crate sequences the steps, watches
//! the logs, and keeps the whole thing cancellable.
//!
//! ## Architecture
//!
//! - One background executor task per accepted run, enforced single-flight
//! - Cooperative cancellation: a stop signal observed at every suspension
//!   point, never forced termination
//! - Incremental log monitoring from a baseline byte offset, with failure
//!   sentinels evaluated before the success sentinel
//! - All shared run state behind one mutex, never held across I/O
//!
//! ## Module Organization
//!
//! - [`orchestration`] - Step sequencing, retry policy, and the run loop
//! - [`monitor`] - Log stream watching and sentinel scanning
//! - [`client`] - HTTP client for the mission services
//! - [`state`] - Run state store and the cooperative stop signal
//! - [`registry`] - Service name to address/log mapping
//! - [`config`] - TOML configuration loading
//! - [`web`] - REST surface (initiate/stop/status, health, logs)
//! - [`error`] - Structured error handling

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod monitor;
pub mod orchestration;
pub mod registry;
pub mod state;
pub mod web;

pub use client::{ServiceClient, ServiceClientConfig};
pub use config::{ConfigManager, SmartfieldsConfig};
pub use error::{PipelineError, Result};
pub use monitor::{CompletionMonitor, CompletionOutcome, LogSource, MonitorConfig, SentinelSet};
pub use orchestration::{
    FailurePolicy, FailureReason, LiveDispatch, MissionDispatch, MissionParams,
    PipelineOrchestrator, RetryPolicy, RunOutcome, StepSpec, StopReport,
};
pub use registry::{ServiceEndpoint, ServiceRegistry};
pub use state::{PipelineState, RunSnapshot, RunStateStore, StopSignal};
