//! # Pipeline Executor
//!
//! The background run loop: one task per accepted run walks the step list,
//! invoking each service and waiting for its completion sentinel, with
//! retry-on-call-failure and cooperative cancellation at every suspension
//! point.

use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::monitor::CompletionOutcome;
use crate::orchestration::dispatch::MissionDispatch;
use crate::orchestration::types::{
    FailurePolicy, FailureReason, MissionParams, RetryPolicy, RunOutcome, StepSpec,
};
use crate::state::{RunStateStore, StopSignal};

/// What the failure-policy check decided for a failed step.
enum StepDisposition {
    Abort(RunOutcome),
    Continue,
}

/// Walks the step list for one pipeline run.
pub struct PipelineExecutor {
    steps: Arc<Vec<StepSpec>>,
    dispatch: Arc<dyn MissionDispatch>,
    store: Arc<RunStateStore>,
    retry: RetryPolicy,
}

impl PipelineExecutor {
    pub fn new(
        steps: Arc<Vec<StepSpec>>,
        dispatch: Arc<dyn MissionDispatch>,
        store: Arc<RunStateStore>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            steps,
            dispatch,
            store,
            retry,
        }
    }

    /// Execute the run to a terminal outcome and release the single-flight
    /// guard. Runs inside its own spawned task.
    pub async fn run(self, run_id: Uuid, params: MissionParams, stop: Arc<StopSignal>) {
        info!(run_id = %run_id, lat = params.lat, lon = params.lon, "Pipeline execution started");
        let outcome = self.execute(&params, &stop).await;
        match &outcome {
            RunOutcome::Completed => {
                info!(run_id = %run_id, "Pipeline completed successfully");
            }
            RunOutcome::Failed { step_index, reason } => {
                error!(run_id = %run_id, step = step_index, reason = %reason, "Pipeline failed");
            }
        }
        self.store.finish_run(outcome);
    }

    async fn execute(&self, params: &MissionParams, stop: &StopSignal) -> RunOutcome {
        for (index, step) in self.steps.iter().enumerate() {
            self.store.set_current_step(index);

            if stop.is_fired() {
                info!(step = index, "Stop requested, aborting pipeline");
                return RunOutcome::Failed {
                    step_index: index,
                    reason: FailureReason::Cancelled,
                };
            }

            info!(
                step = index,
                service = %step.service,
                job = step.job.as_deref(),
                "Starting pipeline step"
            );

            // Call phase: up to max_retries + 1 attempts
            match self.call_with_retries(index, step, params, stop).await {
                CallPhase::Accepted => {}
                CallPhase::Cancelled => {
                    return RunOutcome::Failed {
                        step_index: index,
                        reason: FailureReason::Cancelled,
                    };
                }
                CallPhase::Exhausted => {
                    match self.dispose_failure(index, step, FailureReason::CallFailed) {
                        StepDisposition::Abort(outcome) => return outcome,
                        StepDisposition::Continue => continue,
                    }
                }
            }

            // Completion phase: watch the service's log for the sentinel
            let reason = match self
                .dispatch
                .wait_for_completion(&step.service, step.job.as_deref(), stop)
                .await
            {
                CompletionOutcome::Success => {
                    info!(step = index, service = %step.service, "Step completed");
                    None
                }
                CompletionOutcome::Cancelled => {
                    return RunOutcome::Failed {
                        step_index: index,
                        reason: FailureReason::Cancelled,
                    };
                }
                CompletionOutcome::TimedOut => Some(FailureReason::CompletionTimedOut),
                CompletionOutcome::Failure(_) => Some(FailureReason::CompletionFailed),
            };
            if let Some(reason) = reason {
                match self.dispose_failure(index, step, reason) {
                    StepDisposition::Abort(outcome) => return outcome,
                    StepDisposition::Continue => continue,
                }
            }

            // Inter-step settle time; a stop request interrupts the delay
            // instead of waiting it out
            if index + 1 < self.steps.len() && !step.inter_step_delay.is_zero() {
                info!(
                    step = index,
                    delay_secs = step.inter_step_delay.as_secs(),
                    "Waiting before next step"
                );
                if stop.sleep_unless_fired(step.inter_step_delay).await {
                    info!(step = index, "Stop requested during inter-step delay");
                    return RunOutcome::Failed {
                        step_index: index,
                        reason: FailureReason::Cancelled,
                    };
                }
            }
        }

        RunOutcome::Completed
    }

    async fn call_with_retries(
        &self,
        index: usize,
        step: &StepSpec,
        params: &MissionParams,
        stop: &StopSignal,
    ) -> CallPhase {
        let attempts = step.max_retries + 1;
        for attempt in 1..=attempts {
            if stop.is_fired() {
                return CallPhase::Cancelled;
            }
            if self
                .dispatch
                .start_mission(&step.service, step.job.as_deref(), params)
                .await
            {
                return CallPhase::Accepted;
            }
            warn!(
                step = index,
                service = %step.service,
                attempt,
                attempts,
                "start_mission call failed"
            );
            if attempt < attempts && stop.sleep_unless_fired(self.retry.retry_delay).await {
                return CallPhase::Cancelled;
            }
        }
        CallPhase::Exhausted
    }

    /// First-step failures abort the run regardless of policy; otherwise the
    /// step's failure policy decides.
    fn dispose_failure(
        &self,
        index: usize,
        step: &StepSpec,
        reason: FailureReason,
    ) -> StepDisposition {
        if index == 0 {
            error!(step = index, reason = %reason, "First step failed, aborting pipeline");
            return StepDisposition::Abort(RunOutcome::Failed {
                step_index: index,
                reason,
            });
        }
        match step.failure_policy {
            FailurePolicy::ContinueToNextStep => {
                warn!(step = index, reason = %reason, "Step failed, continuing to next step");
                StepDisposition::Continue
            }
            FailurePolicy::AbortPipeline => {
                error!(step = index, reason = %reason, "Step failed, aborting pipeline");
                StepDisposition::Abort(RunOutcome::Failed {
                    step_index: index,
                    reason,
                })
            }
        }
    }
}

enum CallPhase {
    Accepted,
    Exhausted,
    Cancelled,
}
