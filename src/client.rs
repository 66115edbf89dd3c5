//! # Mission Service Client
//!
//! HTTP client for the start/stop endpoints the mission services expose.
//! Calls carry their own bounded timeout so a hung service can never block
//! pipeline cancellation.
//!
//! Failures never propagate as errors: the orchestrator owns retry policy,
//! so every call reports success or failure through its boolean result, with
//! the reason recorded for diagnostics.

use parking_lot::Mutex;
use reqwest::Client;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::constants::{endpoints, timing};
use crate::error::{PipelineError, Result};
use crate::orchestration::types::MissionParams;
use crate::registry::ServiceEndpoint;

/// Configuration for the mission service client.
#[derive(Debug, Clone)]
pub struct ServiceClientConfig {
    /// Timeout for start-mission calls
    pub call_timeout: Duration,
    /// Timeout for best-effort stop-mission calls
    pub stop_timeout: Duration,
}

impl Default for ServiceClientConfig {
    fn default() -> Self {
        Self {
            call_timeout: timing::CALL_TIMEOUT,
            stop_timeout: timing::STOP_TIMEOUT,
        }
    }
}

/// HTTP client for invoking mission services.
#[derive(Debug)]
pub struct ServiceClient {
    client: Client,
    stop_client: Client,
    last_failure: Mutex<Option<String>>,
}

impl ServiceClient {
    pub fn new(config: ServiceClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.call_timeout)
            .user_agent(format!("smartfields-core/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PipelineError::ConfigurationError(format!("HTTP client: {e}")))?;
        let stop_client = Client::builder()
            .timeout(config.stop_timeout)
            .user_agent(format!("smartfields-core/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PipelineError::ConfigurationError(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            stop_client,
            last_failure: Mutex::new(None),
        })
    }

    /// Ask a service to start a mission. Returns promptly whether or not the
    /// mission itself will take minutes; completion is the monitor's job.
    pub async fn call_start(
        &self,
        service: &str,
        endpoint: &ServiceEndpoint,
        job: Option<&str>,
        params: Option<&MissionParams>,
    ) -> bool {
        let url = format!("{}{}", endpoint.base_url, endpoints::START_MISSION);
        let mut request = self.client.post(&url);

        // Named missions get the mission name and target coordinates as
        // query parameters; single-mission services take a bare POST
        if let Some(name) = job {
            let mut query: Vec<(&str, String)> = vec![("name", name.to_string())];
            if let Some(p) = params {
                query.push(("lat", p.lat.to_string()));
                query.push(("long", p.lon.to_string()));
            }
            request = request.query(&query);
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                info!(service = %service, url = %url, status = %status, "Called start_mission");
                if status.is_success() {
                    true
                } else {
                    let body = response.text().await.unwrap_or_default();
                    warn!(service = %service, status = %status, body = %body, "Service rejected start_mission");
                    self.record_failure(format!("{service}: start_mission returned {status}"));
                    false
                }
            }
            Err(e) if e.is_timeout() => {
                error!(service = %service, url = %url, "Timeout calling start_mission");
                self.record_failure(format!("{service}: start_mission timed out"));
                false
            }
            Err(e) => {
                error!(service = %service, url = %url, error = %e, "Error calling start_mission");
                self.record_failure(format!("{service}: {e}"));
                false
            }
        }
    }

    /// Best-effort stop command, with a shorter timeout than start calls.
    /// Idempotent on the service side when no mission is active.
    pub async fn call_stop(&self, service: &str, endpoint: &ServiceEndpoint) -> bool {
        let url = format!("{}{}", endpoint.base_url, endpoints::STOP_MISSION);
        match self.stop_client.post(&url).send().await {
            Ok(response) if response.status().is_success() => {
                info!(service = %service, "Stopped service");
                true
            }
            Ok(response) => {
                warn!(service = %service, status = %response.status(), "Failed to stop service");
                self.record_failure(format!("{service}: stop_mission returned {}", response.status()));
                false
            }
            Err(e) => {
                warn!(service = %service, error = %e, "Error stopping service");
                self.record_failure(format!("{service}: {e}"));
                false
            }
        }
    }

    /// Reason for the most recent call failure, for status diagnostics.
    pub fn last_failure(&self) -> Option<String> {
        self.last_failure.lock().clone()
    }

    fn record_failure(&self, reason: String) {
        *self.last_failure.lock() = Some(reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_service_returns_false() {
        let client = ServiceClient::new(ServiceClientConfig {
            call_timeout: Duration::from_millis(200),
            stop_timeout: Duration::from_millis(200),
        })
        .unwrap();
        // Reserved TEST-NET address, nothing listens here
        let endpoint = ServiceEndpoint {
            base_url: "http://192.0.2.1:1".to_string(),
            log_path: "logs/none.log".into(),
        };
        assert!(!client.call_start("ghost", &endpoint, None, None).await);
        assert!(client.last_failure().is_some());
        assert!(!client.call_stop("ghost", &endpoint).await);
    }
}
