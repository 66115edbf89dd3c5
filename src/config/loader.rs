//! Configuration Loader
//!
//! Path discovery and TOML parsing for the orchestrator configuration.
//! Discovery order matches the deployed layout: an explicit
//! `SMARTFIELDS_CONFIG` path, the container mount at `/app/config.toml`,
//! then `config.toml` in the working directory. Absence of all three is not
//! an error; the defaults describe the stock deployment.

use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::SmartfieldsConfig;
use crate::error::{PipelineError, Result};

/// Env var naming an explicit configuration file path.
pub const CONFIG_PATH_ENV: &str = "SMARTFIELDS_CONFIG";

/// Loaded configuration plus where it came from.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: SmartfieldsConfig,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration with path auto-discovery.
    pub fn load() -> Result<Self> {
        match Self::discover_path() {
            Some(path) => Self::load_from_path(&path),
            None => {
                info!("No config file found, using built-in defaults");
                Ok(Self {
                    config: SmartfieldsConfig::default(),
                    source: None,
                })
            }
        }
    }

    /// Load configuration from an explicit file path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Loading configuration");
        let raw = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::ConfigurationError(format!(
                "Cannot read config file {}: {e}",
                path.display()
            ))
        })?;
        let config: SmartfieldsConfig = toml::from_str(&raw).map_err(|e| {
            PipelineError::ConfigurationError(format!(
                "Invalid config file {}: {e}",
                path.display()
            ))
        })?;
        config.validate()?;

        info!(
            path = %path.display(),
            services = config.services.len(),
            steps = config.pipeline.steps.len(),
            "Configuration loaded"
        );

        Ok(Self {
            config,
            source: Some(path.to_path_buf()),
        })
    }

    fn discover_path() -> Option<PathBuf> {
        if let Ok(explicit) = env::var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(explicit);
            if path.exists() {
                return Some(path);
            }
            warn!(
                path = %path.display(),
                "{CONFIG_PATH_ENV} points at a missing file, falling back to discovery"
            );
        }
        for candidate in ["/app/config.toml", "config.toml"] {
            let path = PathBuf::from(candidate);
            if path.exists() {
                return Some(path);
            }
        }
        None
    }

    pub fn config(&self) -> &SmartfieldsConfig {
        &self.config
    }

    /// Path the configuration was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [server]
            port = 4000

            [services.openpasslite]
            address = "localhost:2177"
            log_path = "logs/openpasslite.log"

            [[pipeline.steps]]
            service = "openpasslite"
            job = "LTT"
            "#
        )
        .unwrap();

        let manager = ConfigManager::load_from_path(file.path()).unwrap();
        assert_eq!(manager.config().server.port, 4000);
        assert_eq!(manager.source(), Some(file.path()));
    }

    #[test]
    fn test_invalid_toml_is_a_configuration_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server = \"not a table\"").unwrap();
        assert!(matches!(
            ConfigManager::load_from_path(file.path()),
            Err(PipelineError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_missing_file_is_a_configuration_error() {
        assert!(matches!(
            ConfigManager::load_from_path(Path::new("/nonexistent/config.toml")),
            Err(PipelineError::ConfigurationError(_))
        ));
    }
}
