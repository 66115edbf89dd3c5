//! # SmartFields Configuration System
//!
//! TOML-backed configuration for the orchestrator: the HTTP bind address,
//! the service table, monitor timing, and the pipeline flow itself. Every
//! section has working defaults so a bare `config.toml` (or none at all, in
//! tests) yields the stock three-step mission pipeline.

pub mod loader;

pub use loader::ConfigManager;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{PipelineError, Result};
use crate::monitor::MonitorConfig;
use crate::orchestration::types::{FailurePolicy, StepSpec};
use crate::registry::ServiceRegistry;

/// Top-level configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmartfieldsConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default = "default_services")]
    pub services: BTreeMap<String, ServiceConfig>,
    #[serde(default)]
    pub monitor: MonitorSettings,
    #[serde(default)]
    pub pipeline: PipelineSettings,
}

impl Default for SmartfieldsConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            services: default_services(),
            monitor: MonitorSettings::default(),
            pipeline: PipelineSettings::default(),
        }
    }
}

/// HTTP server bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_host")]
    pub host: String,
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
    #[serde(default = "ServerConfig::default_cors_origin")]
    pub cors_origin: String,
}

impl ServerConfig {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        2166
    }

    fn default_cors_origin() -> String {
        "*".to_string()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            cors_origin: Self::default_cors_origin(),
        }
    }
}

/// Where the orchestrator writes its own log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_directory")]
    pub directory: PathBuf,
}

impl LoggingConfig {
    fn default_directory() -> PathBuf {
        PathBuf::from("logs")
    }

    /// The orchestrator's own log file, served by the `/logs` endpoint.
    pub fn own_logfile(&self) -> PathBuf {
        self.directory.join("smartfields.log")
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: Self::default_directory(),
        }
    }
}

/// One mission service: its address and the log file it emits sentinels to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    pub address: String,
    pub log_path: PathBuf,
}

fn default_services() -> BTreeMap<String, ServiceConfig> {
    BTreeMap::from([
        (
            "openpasslite".to_string(),
            ServiceConfig {
                address: "localhost:2177".to_string(),
                log_path: PathBuf::from("logs/openpasslite.log"),
            },
        ),
        (
            "wildwings".to_string(),
            ServiceConfig {
                address: "localhost:2199".to_string(),
                log_path: PathBuf::from("logs/wildwings.log"),
            },
        ),
    ])
}

/// Log monitor timing, in whole seconds as written in config files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorSettings {
    #[serde(default = "MonitorSettings::default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "MonitorSettings::default_appearance_timeout_secs")]
    pub appearance_timeout_secs: u64,
    #[serde(default = "MonitorSettings::default_completion_timeout_secs")]
    pub completion_timeout_secs: u64,
}

impl MonitorSettings {
    fn default_poll_interval_secs() -> u64 {
        2
    }

    fn default_appearance_timeout_secs() -> u64 {
        30
    }

    fn default_completion_timeout_secs() -> u64 {
        180
    }

    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            appearance_timeout: Duration::from_secs(self.appearance_timeout_secs),
            completion_timeout: Duration::from_secs(self.completion_timeout_secs),
        }
    }
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: Self::default_poll_interval_secs(),
            appearance_timeout_secs: Self::default_appearance_timeout_secs(),
            completion_timeout_secs: Self::default_completion_timeout_secs(),
        }
    }
}

/// The pipeline flow: the ordered step list the orchestrator executes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineSettings {
    #[serde(default = "default_flow")]
    pub steps: Vec<StepSpec>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            steps: default_flow(),
        }
    }
}

/// The stock mission flow: fly out to the target, run animal detection,
/// return to base. A detection failure still brings the drone home, which is
/// why the middle step continues on failure.
fn default_flow() -> Vec<StepSpec> {
    vec![
        StepSpec::new("openpasslite", Some("LTT")),
        StepSpec {
            failure_policy: FailurePolicy::ContinueToNextStep,
            ..StepSpec::new("wildwings", None)
        },
        StepSpec::new("openpasslite", Some("RTB")),
    ]
}

impl SmartfieldsConfig {
    /// Check internal consistency: every pipeline step must name a
    /// registered service.
    pub fn validate(&self) -> Result<()> {
        if self.pipeline.steps.is_empty() {
            return Err(PipelineError::ConfigurationError(
                "pipeline.steps must not be empty".to_string(),
            ));
        }
        for (index, step) in self.pipeline.steps.iter().enumerate() {
            if !self.services.contains_key(&step.service) {
                return Err(PipelineError::ConfigurationError(format!(
                    "pipeline step {index} references unknown service '{}'",
                    step.service
                )));
            }
        }
        Ok(())
    }

    /// Build the read-only service registry from the service table.
    pub fn registry(&self) -> ServiceRegistry {
        let mut registry = ServiceRegistry::new();
        for (name, service) in &self.services {
            registry.register(name, &service.address, &service.log_path);
        }
        registry
    }

    pub fn steps(&self) -> Vec<StepSpec> {
        self.pipeline.steps.clone()
    }
}
