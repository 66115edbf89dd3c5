//! Shared test fixtures: a scripted mission dispatch that stands in for the
//! real HTTP client and log monitor.
#![allow(dead_code)] // each test binary uses a different subset

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use smartfields_core::monitor::CompletionOutcome;
use smartfields_core::orchestration::types::MissionParams;
use smartfields_core::orchestration::MissionDispatch;
use smartfields_core::state::StopSignal;

/// Scripted behavior for one step's completion wait.
#[derive(Debug, Clone)]
pub enum ScriptedWait {
    Outcome(CompletionOutcome),
    /// Block until the stop signal fires, then report cancellation. Models a
    /// mission that never finishes on its own.
    BlockUntilCancelled,
}

/// Key for scripted behavior: service name plus optional job name.
pub type StepKey = (String, Option<String>);

pub fn key(service: &str, job: Option<&str>) -> StepKey {
    (service.to_string(), job.map(str::to_string))
}

/// A `MissionDispatch` that follows a script and records every call.
#[derive(Default)]
pub struct ScriptedDispatch {
    /// Per-step queue of call results; attempts consume the queue front to
    /// back, and further attempts succeed once it is empty
    call_results: Mutex<HashMap<StepKey, Vec<bool>>>,
    /// Per-step queue of completion outcomes; empty means immediate success
    wait_results: Mutex<HashMap<StepKey, Vec<ScriptedWait>>>,
    /// Services known to the registry, for stop fan-out
    services: Vec<String>,
    /// Which services acknowledge stop commands
    stop_acks: HashMap<String, bool>,
    /// Recorded events, in order: "start:svc:job", "stop:svc", "wait:svc:job"
    pub events: Mutex<Vec<String>>,
}

impl ScriptedDispatch {
    pub fn new(services: &[&str]) -> Self {
        Self {
            services: services.iter().map(|s| s.to_string()).collect(),
            stop_acks: services.iter().map(|s| (s.to_string(), true)).collect(),
            ..Default::default()
        }
    }

    pub fn script_calls(&self, service: &str, job: Option<&str>, results: &[bool]) {
        self.call_results
            .lock()
            .insert(key(service, job), results.to_vec());
    }

    pub fn script_wait(&self, service: &str, job: Option<&str>, wait: ScriptedWait) {
        self.wait_results
            .lock()
            .entry(key(service, job))
            .or_default()
            .push(wait);
    }

    pub fn refuse_stop(&mut self, service: &str) {
        self.stop_acks.insert(service.to_string(), false);
    }

    pub fn start_attempts(&self, service: &str, job: Option<&str>) -> usize {
        let tag = format!("start:{}:{}", service, job.unwrap_or("-"));
        self.events.lock().iter().filter(|e| **e == tag).count()
    }

    pub fn recorded(&self) -> Vec<String> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl MissionDispatch for ScriptedDispatch {
    async fn start_mission(
        &self,
        service: &str,
        job: Option<&str>,
        _params: &MissionParams,
    ) -> bool {
        self.events
            .lock()
            .push(format!("start:{}:{}", service, job.unwrap_or("-")));
        let mut calls = self.call_results.lock();
        match calls.get_mut(&key(service, job)) {
            Some(queue) if !queue.is_empty() => queue.remove(0),
            _ => true,
        }
    }

    async fn stop_mission(&self, service: &str) -> bool {
        self.events.lock().push(format!("stop:{service}"));
        self.stop_acks.get(service).copied().unwrap_or(true)
    }

    async fn wait_for_completion(
        &self,
        service: &str,
        job: Option<&str>,
        cancel: &StopSignal,
    ) -> CompletionOutcome {
        self.events
            .lock()
            .push(format!("wait:{}:{}", service, job.unwrap_or("-")));
        let scripted = {
            let mut waits = self.wait_results.lock();
            match waits.get_mut(&key(service, job)) {
                Some(queue) if !queue.is_empty() => queue.remove(0),
                _ => ScriptedWait::Outcome(CompletionOutcome::Success),
            }
        };
        match scripted {
            ScriptedWait::Outcome(outcome) => outcome,
            ScriptedWait::BlockUntilCancelled => {
                cancel.fired().await;
                CompletionOutcome::Cancelled
            }
        }
    }

    fn service_names(&self) -> Vec<String> {
        self.services.clone()
    }
}

/// Valid mission parameters for tests.
pub fn params() -> MissionParams {
    MissionParams::new(43.0731, -89.4012, Some("ct-17".to_string())).unwrap()
}

/// Wait until `condition` holds or the timeout elapses.
pub async fn wait_until<F: Fn() -> bool>(condition: F, timeout: std::time::Duration) -> bool {
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    condition()
}

/// Wrap a dispatch in the Arc the orchestrator expects.
pub fn dispatch_arc(dispatch: ScriptedDispatch) -> Arc<ScriptedDispatch> {
    Arc::new(dispatch)
}
