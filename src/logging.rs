//! # Structured Logging Module
//!
//! Console plus file logging for the orchestrator. The file layer is not
//! just observability: the orchestrator's own log is served by the `/logs`
//! endpoint and follows the same append-only convention the mission services
//! use for theirs.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with console and file output.
///
/// Safe to call more than once; only the first call takes effect.
pub fn init_structured_logging(log_dir: &Path) {
    let log_dir = log_dir.to_path_buf();
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let log_level = get_log_level(&environment);

        if !log_dir.exists() {
            if let Err(e) = fs::create_dir_all(&log_dir) {
                eprintln!("Failed to create log directory {}: {e}", log_dir.display());
            }
        }

        let file_appender = tracing_appender::rolling::never(&log_dir, "smartfields.log");
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

        let subscriber = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(true)
                    .with_filter(EnvFilter::new(log_level.clone())),
            )
            .with(
                fmt::layer()
                    .with_writer(file_writer)
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(false)
                    .with_filter(EnvFilter::new(log_level)),
            );

        // A test harness may already have installed a subscriber
        if subscriber.try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized");
        }

        tracing::info!(
            environment = %environment,
            log_dir = %log_dir.display(),
            "Structured logging initialized"
        );

        // The guard must outlive the process or the file layer stops flushing
        std::mem::forget(guard);
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("SMARTFIELDS_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> String {
    std::env::var("SMARTFIELDS_LOG").unwrap_or_else(|_| {
        match environment {
            "production" => "info",
            _ => "debug",
        }
        .to_string()
    })
}
