//! # Service Registry
//!
//! Static mapping from service names to their network addresses and log
//! streams. Resolved once at startup from configuration and read-only
//! afterwards.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{PipelineError, Result};
use crate::monitor::FileLogSource;

/// Where to reach one mission service and where it writes its log.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceEndpoint {
    /// Base URL, e.g. `http://localhost:2177`
    pub base_url: String,
    /// The append-only log file the service emits sentinels into
    pub log_path: PathBuf,
}

/// Read-only registry of all known mission services.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    services: BTreeMap<String, ServiceEndpoint>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        address: impl AsRef<str>,
        log_path: impl Into<PathBuf>,
    ) {
        let address = address.as_ref();
        let base_url = if address.starts_with("http://") || address.starts_with("https://") {
            address.to_string()
        } else {
            format!("http://{address}")
        };
        self.services.insert(
            name.into(),
            ServiceEndpoint {
                base_url,
                log_path: log_path.into(),
            },
        );
    }

    pub fn endpoint(&self, name: &str) -> Result<&ServiceEndpoint> {
        self.services
            .get(name)
            .ok_or_else(|| PipelineError::ServiceError(format!("Unknown service: {name}")))
    }

    pub fn log_source(&self, name: &str) -> Result<FileLogSource> {
        Ok(FileLogSource::new(&self.endpoint(name)?.log_path))
    }

    /// All registered service names, in stable order. Stop requests fan out
    /// over this list.
    pub fn service_names(&self) -> Vec<String> {
        self.services.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_resolve() {
        let mut registry = ServiceRegistry::new();
        registry.register("openpasslite", "localhost:2177", "logs/openpasslite.log");
        let endpoint = registry.endpoint("openpasslite").unwrap();
        assert_eq!(endpoint.base_url, "http://localhost:2177");
        assert_eq!(endpoint.log_path, PathBuf::from("logs/openpasslite.log"));
    }

    #[test]
    fn test_explicit_scheme_is_preserved() {
        let mut registry = ServiceRegistry::new();
        registry.register("wildwings", "https://wildwings.local", "logs/wildwings.log");
        assert_eq!(
            registry.endpoint("wildwings").unwrap().base_url,
            "https://wildwings.local"
        );
    }

    #[test]
    fn test_unknown_service_is_an_error() {
        let registry = ServiceRegistry::new();
        assert!(matches!(
            registry.endpoint("ghost"),
            Err(PipelineError::ServiceError(_))
        ));
    }

    #[test]
    fn test_service_names_are_stable() {
        let mut registry = ServiceRegistry::new();
        registry.register("wildwings", "localhost:2199", "logs/wildwings.log");
        registry.register("openpasslite", "localhost:2177", "logs/openpasslite.log");
        assert_eq!(registry.service_names(), vec!["openpasslite", "wildwings"]);
    }
}
