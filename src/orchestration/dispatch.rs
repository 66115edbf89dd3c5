//! # Mission Dispatch
//!
//! The seam between the pipeline executor and the outside world. The
//! executor drives steps through this trait; production wires it to the HTTP
//! client plus the log-stream monitor, and tests substitute scripted fakes.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::client::ServiceClient;
use crate::monitor::{CompletionMonitor, CompletionOutcome, SentinelSet};
use crate::orchestration::types::MissionParams;
use crate::registry::ServiceRegistry;
use crate::state::StopSignal;

/// Remote-service operations the executor needs per step.
#[async_trait]
pub trait MissionDispatch: Send + Sync {
    /// Ask `service` to start a mission. `true` means the service accepted.
    async fn start_mission(
        &self,
        service: &str,
        job: Option<&str>,
        params: &MissionParams,
    ) -> bool;

    /// Best-effort stop command to `service`.
    async fn stop_mission(&self, service: &str) -> bool;

    /// Block until the mission's sentinel appears in the service's log
    /// stream, honoring `cancel` at every suspension point.
    async fn wait_for_completion(
        &self,
        service: &str,
        job: Option<&str>,
        cancel: &StopSignal,
    ) -> CompletionOutcome;

    /// Every service a stop request should fan out to.
    fn service_names(&self) -> Vec<String>;
}

/// Production dispatch: HTTP calls through `ServiceClient`, completion via
/// `CompletionMonitor` over each service's log file.
pub struct LiveDispatch {
    client: ServiceClient,
    registry: ServiceRegistry,
    monitor: CompletionMonitor,
}

impl LiveDispatch {
    pub fn new(client: ServiceClient, registry: ServiceRegistry, monitor: CompletionMonitor) -> Arc<Self> {
        Arc::new(Self {
            client,
            registry,
            monitor,
        })
    }
}

#[async_trait]
impl MissionDispatch for LiveDispatch {
    async fn start_mission(
        &self,
        service: &str,
        job: Option<&str>,
        params: &MissionParams,
    ) -> bool {
        match self.registry.endpoint(service) {
            Ok(endpoint) => {
                self.client
                    .call_start(service, endpoint, job, Some(params))
                    .await
            }
            Err(e) => {
                warn!(service = %service, error = %e, "Cannot start mission");
                false
            }
        }
    }

    async fn stop_mission(&self, service: &str) -> bool {
        match self.registry.endpoint(service) {
            Ok(endpoint) => self.client.call_stop(service, endpoint).await,
            Err(e) => {
                warn!(service = %service, error = %e, "Cannot stop mission");
                false
            }
        }
    }

    async fn wait_for_completion(
        &self,
        service: &str,
        job: Option<&str>,
        cancel: &StopSignal,
    ) -> CompletionOutcome {
        let source = match self.registry.log_source(service) {
            Ok(source) => source,
            Err(e) => {
                warn!(service = %service, error = %e, "No log stream for service");
                return CompletionOutcome::TimedOut;
            }
        };
        let sentinels = SentinelSet::for_job(job);
        self.monitor
            .wait_for_completion(service, &source, &sentinels, cancel)
            .await
    }

    fn service_names(&self) -> Vec<String> {
        self.registry.service_names()
    }
}
