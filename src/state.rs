//! # Pipeline Run State
//!
//! Shared run state for the mission pipeline: the state enum, the cooperative
//! stop signal, and the mutex-protected store that HTTP handlers read while
//! the background executor writes.
//!
//! Critical sections are state reads and writes only. Network and file I/O
//! always happen outside the lock so status queries never queue behind a
//! long-running step.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::orchestration::types::{MissionParams, RunOutcome};

/// Pipeline run state definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// No pipeline run in progress
    Idle,
    /// Background executor is walking the step list
    Running,
    /// Stop requested; executor has not yet observed the signal
    Stopping,
    /// Last run finished every step successfully
    Completed,
    /// Last run aborted, timed out, or was stopped
    Failed,
}

impl PipelineState {
    /// Check if a run is in flight (single-flight guard condition)
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Running | Self::Stopping)
    }

    /// Check if this is a terminal state for a finished run
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        Self::Idle
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Stopping => write!(f, "stopping"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for PipelineState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Self::Idle),
            "running" => Ok(Self::Running),
            "stopping" => Ok(Self::Stopping),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("Invalid pipeline state: {s}")),
        }
    }
}

/// Cooperative cancellation signal for one pipeline run.
///
/// Once fired the flag is never cleared; a new run gets a fresh signal.
/// `fired()` lets delay loops `select!` on the notification so a stop request
/// interrupts a sleep instead of waiting it out.
#[derive(Debug, Default)]
pub struct StopSignal {
    fired: AtomicBool,
    notify: Notify,
}

impl StopSignal {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Request cancellation. Idempotent.
    pub fn fire(&self) {
        self.fired.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }

    pub fn is_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    /// Resolve when the signal fires. Resolves immediately if already fired.
    pub async fn fired(&self) {
        if self.is_fired() {
            return;
        }
        let notified = self.notify.notified();
        if self.is_fired() {
            return;
        }
        notified.await;
    }

    /// Sleep for `duration` unless the signal fires first.
    ///
    /// Returns `true` when the sleep was interrupted by cancellation. Every
    /// retry delay, poll tick, and inter-step delay goes through here so a
    /// stop request never waits out a full sleep.
    pub async fn sleep_unless_fired(&self, duration: std::time::Duration) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(duration) => false,
            _ = self.fired() => true,
        }
    }
}

/// The mutable record of the active (or most recent) pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub run_id: Uuid,
    pub state: PipelineState,
    pub current_step: usize,
    pub params: Option<MissionParams>,
    pub stop: Arc<StopSignal>,
}

impl Default for PipelineRun {
    fn default() -> Self {
        Self {
            run_id: Uuid::nil(),
            state: PipelineState::Idle,
            current_step: 0,
            params: None,
            stop: StopSignal::new(),
        }
    }
}

/// Point-in-time view of the run state, read under the lock and returned
/// without holding it.
#[derive(Debug, Clone, Serialize)]
pub struct RunSnapshot {
    pub state: PipelineState,
    pub current_step: usize,
    pub params: Option<MissionParams>,
    pub stop_requested: bool,
    pub last_outcome: Option<RunOutcome>,
}

/// Lock-protected store mediating all access to the pipeline run record.
///
/// At most one run is active at a time; `begin_run` enforces the single-flight
/// guard atomically with the transition to `Running`.
#[derive(Debug, Default)]
pub struct RunStateStore {
    inner: Mutex<StoreInner>,
}

#[derive(Debug, Default)]
struct StoreInner {
    run: PipelineRun,
    last_outcome: Option<RunOutcome>,
}

impl RunStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically claim the single-flight guard and transition to `Running`.
    ///
    /// Returns the fresh stop signal for the new run, or `None` if a run is
    /// already active.
    pub fn begin_run(&self, params: MissionParams) -> Option<(Uuid, Arc<StopSignal>)> {
        let mut inner = self.inner.lock();
        if inner.run.state.is_active() {
            return None;
        }
        let run_id = Uuid::new_v4();
        let stop = StopSignal::new();
        inner.run = PipelineRun {
            run_id,
            state: PipelineState::Running,
            current_step: 0,
            params: Some(params),
            stop: Arc::clone(&stop),
        };
        Some((run_id, stop))
    }

    /// Record the terminal outcome and release the single-flight guard.
    ///
    /// The live state returns to `Idle`; the outcome stays readable until the
    /// next run finishes.
    pub fn finish_run(&self, outcome: RunOutcome) {
        let mut inner = self.inner.lock();
        inner.last_outcome = Some(outcome);
        // A finished run resolves straight back to Idle; the terminal states
        // surface through last_outcome rather than lingering as live state.
        inner.run.state = PipelineState::Idle;
        inner.run.current_step = 0;
    }

    /// Advance the current step index. Only meaningful while `Running`.
    pub fn set_current_step(&self, index: usize) {
        let mut inner = self.inner.lock();
        if inner.run.state.is_active() {
            inner.run.current_step = index;
        }
    }

    /// Fire the stop signal and move `Running` to `Stopping`.
    ///
    /// Returns `false` when no run is active (the caller reports
    /// `already_stopped` without contacting any service).
    pub fn request_stop(&self) -> bool {
        let stop = {
            let mut inner = self.inner.lock();
            if !inner.run.state.is_active() {
                return false;
            }
            inner.run.state = PipelineState::Stopping;
            Arc::clone(&inner.run.stop)
        };
        stop.fire();
        true
    }

    /// Stop signal of the active run, if any.
    pub fn active_stop_signal(&self) -> Option<Arc<StopSignal>> {
        let inner = self.inner.lock();
        if inner.run.state.is_active() {
            Some(Arc::clone(&inner.run.stop))
        } else {
            None
        }
    }

    pub fn snapshot(&self) -> RunSnapshot {
        let inner = self.inner.lock();
        RunSnapshot {
            state: inner.run.state,
            current_step: inner.run.current_step,
            params: inner.run.params.clone(),
            stop_requested: inner.run.stop.is_fired(),
            last_outcome: inner.last_outcome.clone(),
        }
    }
}
