//! # Pipeline Orchestrator
//!
//! Public surface of the mission pipeline: start, stop, and status, safe
//! under concurrent access from HTTP handlers while one background executor
//! task drives the run.

use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{PipelineError, Result};
use crate::orchestration::dispatch::MissionDispatch;
use crate::orchestration::executor::PipelineExecutor;
use crate::orchestration::types::{
    MissionParams, RetryPolicy, StartResult, StepSpec, StopReport,
};
use crate::state::{RunSnapshot, RunStateStore};

/// Sequences the mission pipeline and enforces single-flight execution.
pub struct PipelineOrchestrator {
    steps: Arc<Vec<StepSpec>>,
    dispatch: Arc<dyn MissionDispatch>,
    store: Arc<RunStateStore>,
    retry: RetryPolicy,
}

impl PipelineOrchestrator {
    pub fn new(steps: Vec<StepSpec>, dispatch: Arc<dyn MissionDispatch>) -> Self {
        Self {
            steps: Arc::new(steps),
            dispatch,
            store: Arc::new(RunStateStore::new()),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Accept a new run and spawn its background executor.
    ///
    /// Returns immediately; callers poll `status()` for progress. Fails with
    /// `AlreadyRunning` while a run is active.
    pub fn start(&self, params: MissionParams) -> Result<StartResult> {
        if self.steps.is_empty() {
            return Err(PipelineError::InvalidState(
                "Pipeline has no steps configured".to_string(),
            ));
        }

        let (run_id, stop) = self
            .store
            .begin_run(params.clone())
            .ok_or(PipelineError::AlreadyRunning)?;

        info!(run_id = %run_id, lat = params.lat, lon = params.lon, "Pipeline run accepted");

        let executor = PipelineExecutor::new(
            Arc::clone(&self.steps),
            Arc::clone(&self.dispatch),
            Arc::clone(&self.store),
            self.retry,
        );
        tokio::spawn(executor.run(run_id, params, stop));

        Ok(StartResult::Accepted)
    }

    /// Request cancellation of the active run.
    ///
    /// Fires the stop signal, then issues advisory stop commands to every
    /// known service. The executor observes the signal at its next suspension
    /// point and winds the run down itself; nothing is force-terminated.
    /// Returns `None` when no run is active, without contacting any service.
    pub async fn stop(&self) -> Option<StopReport> {
        if !self.store.request_stop() {
            info!("Stop requested but pipeline is idle");
            return None;
        }

        info!("Pipeline stop signal sent, contacting services");

        let mut stopped_services = Vec::new();
        let mut failed_services = Vec::new();
        for service in self.dispatch.service_names() {
            if self.dispatch.stop_mission(&service).await {
                stopped_services.push(service);
            } else {
                warn!(service = %service, "Service did not acknowledge stop");
                failed_services.push(service);
            }
        }

        Some(StopReport {
            stopped_services,
            failed_services,
        })
    }

    /// Lock-snapshot of the run state. Never blocks on the executor.
    pub fn status(&self) -> RunSnapshot {
        self.store.snapshot()
    }

    pub fn steps(&self) -> &[StepSpec] {
        &self.steps
    }
}
