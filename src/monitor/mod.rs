//! # Completion Monitoring
//!
//! Watches a service's append-only log stream for a mission's completion or
//! failure sentinel. The log file is the sole completion signal the mission
//! services expose, so the monitor is what turns "the call was accepted" into
//! "the mission actually finished".
//!
//! Reads are incremental: the monitor records a baseline offset when it
//! starts and only ever reads bytes appended after it, so a long-lived log
//! is never re-scanned or loaded whole into memory.

pub mod sentinel;

use async_trait::async_trait;
use std::io::SeekFrom;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::{debug, error, info, warn};

use crate::constants::timing;
use crate::error::Result;
use crate::state::StopSignal;

pub use sentinel::{ScanResult, SentinelSet};

/// Outcome of one completion wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The success sentinel appeared past the baseline
    Success,
    /// A failure sentinel appeared; carries the matched pattern
    Failure(String),
    /// The log stream never appeared, or no sentinel arrived in time
    TimedOut,
    /// A stop request fired while waiting
    Cancelled,
}

/// Timing knobs for the monitor. Production uses the defaults; tests shrink
/// them to milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct MonitorConfig {
    /// Interval between log stream polls
    pub poll_interval: Duration,
    /// How long to wait for the log stream to exist at all
    pub appearance_timeout: Duration,
    /// Overall ceiling on the monitoring phase
    pub completion_timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: timing::POLL_INTERVAL,
            appearance_timeout: timing::APPEARANCE_TIMEOUT,
            completion_timeout: timing::COMPLETION_TIMEOUT,
        }
    }
}

/// A readable, append-only log stream. Abstracted so tests drive the monitor
/// from an in-memory buffer instead of real files.
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Current length of the stream in bytes, or `None` if it does not exist
    /// yet.
    async fn len(&self) -> Result<Option<u64>>;

    /// Read from `offset` to the current end of the stream.
    async fn read_from(&self, offset: u64) -> Result<String>;
}

/// Production log source: a log file on the shared filesystem.
#[derive(Debug, Clone)]
pub struct FileLogSource {
    path: PathBuf,
}

impl FileLogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl LogSource for FileLogSource {
    async fn len(&self) -> Result<Option<u64>> {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) => Ok(Some(meta.len())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn read_from(&self, offset: u64) -> Result<String> {
        let mut file = tokio::fs::File::open(&self.path).await?;
        file.seek(SeekFrom::Start(offset)).await?;
        let mut buf = Vec::new();
        file.read_to_end(&mut buf).await?;
        // Services write UTF-8 but a poll can land mid multi-byte sequence
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Watches one log stream for one mission's sentinels.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionMonitor {
    config: MonitorConfig,
}

impl CompletionMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self { config }
    }

    /// Wait until the mission's sentinel appears, the timeouts elapse, or the
    /// stop signal fires.
    ///
    /// Cancellation is checked before every sleep, bounding stop latency by
    /// one poll interval.
    pub async fn wait_for_completion(
        &self,
        service: &str,
        source: &dyn LogSource,
        sentinels: &SentinelSet,
        cancel: &StopSignal,
    ) -> CompletionOutcome {
        debug!(service = %service, "Waiting for mission completion sentinel");

        // Baseline: everything already in the log predates this mission
        let mut baseline = match source.len().await {
            Ok(len) => len,
            Err(e) => {
                warn!(service = %service, error = %e, "Failed to stat log stream, assuming empty");
                None
            }
        };

        // Appearance phase: the service may not have created its log yet
        if baseline.is_none() {
            let appearance_start = Instant::now();
            loop {
                if cancel.is_fired() {
                    info!(service = %service, "Stop requested while waiting for log stream");
                    return CompletionOutcome::Cancelled;
                }
                if appearance_start.elapsed() > self.config.appearance_timeout {
                    error!(
                        service = %service,
                        timeout_secs = self.config.appearance_timeout.as_secs(),
                        "Log stream did not appear in time"
                    );
                    return CompletionOutcome::TimedOut;
                }
                if cancel.sleep_unless_fired(self.config.poll_interval).await {
                    return CompletionOutcome::Cancelled;
                }
                match source.len().await {
                    Ok(Some(_)) => {
                        // Stream just appeared; watch it from the start
                        baseline = Some(0);
                        break;
                    }
                    Ok(None) => continue,
                    Err(e) => {
                        warn!(service = %service, error = %e, "Error checking log stream");
                    }
                }
            }
        }

        let mut baseline = baseline.unwrap_or(0);
        let monitor_start = Instant::now();

        loop {
            if cancel.is_fired() {
                info!(service = %service, "Stop requested while monitoring log stream");
                return CompletionOutcome::Cancelled;
            }

            match source.len().await {
                Ok(Some(current)) if current > baseline => {
                    match source.read_from(baseline).await {
                        Ok(delta) => match sentinels.scan(&delta) {
                            Some(ScanResult::Failure(pattern)) => {
                                error!(
                                    service = %service,
                                    pattern = %pattern,
                                    "Failure sentinel detected"
                                );
                                return CompletionOutcome::Failure(pattern);
                            }
                            Some(ScanResult::Success) => {
                                info!(service = %service, "Mission completed successfully");
                                return CompletionOutcome::Success;
                            }
                            None => {
                                baseline = current;
                            }
                        },
                        Err(e) => {
                            warn!(service = %service, error = %e, "Error reading log stream");
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(service = %service, error = %e, "Error checking log stream");
                }
            }

            if monitor_start.elapsed() > self.config.completion_timeout {
                error!(
                    service = %service,
                    timeout_secs = self.config.completion_timeout.as_secs(),
                    "Timed out waiting for completion sentinel"
                );
                return CompletionOutcome::TimedOut;
            }

            if cancel.sleep_unless_fired(self.config.poll_interval).await {
                return CompletionOutcome::Cancelled;
            }
        }
    }
}
