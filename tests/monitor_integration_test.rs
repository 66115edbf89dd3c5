//! Completion monitoring against real log files on disk.
//!
//! The in-memory unit tests cover the scan ordering; these confirm the same
//! behavior through the filesystem path the production monitor uses.

use std::io::Write;
use std::time::Duration;

use smartfields_core::monitor::{
    CompletionMonitor, CompletionOutcome, FileLogSource, MonitorConfig, SentinelSet,
};
use smartfields_core::state::StopSignal;

fn fast_config() -> MonitorConfig {
    MonitorConfig {
        poll_interval: Duration::from_millis(10),
        appearance_timeout: Duration::from_millis(200),
        completion_timeout: Duration::from_millis(500),
    }
}

fn append(path: &std::path::Path, line: &str) {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .unwrap();
    writeln!(file, "{line}").unwrap();
}

#[tokio::test]
async fn sentinel_written_after_baseline_is_detected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("openpasslite.log");
    append(&path, "boot");
    append(&path, "Mission LTT thread finished"); // previous run, before baseline

    let monitor = CompletionMonitor::new(fast_config());
    let source = FileLogSource::new(&path);
    let sentinels = SentinelSet::for_job(Some("LTT"));
    let cancel = StopSignal::new();

    let writer_path = path.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        append(&writer_path, "waypoint 3 reached");
        append(&writer_path, "Mission LTT thread finished");
    });

    let outcome = monitor
        .wait_for_completion("openpasslite", &source, &sentinels, &cancel)
        .await;
    assert_eq!(outcome, CompletionOutcome::Success);
}

#[tokio::test]
async fn log_created_after_watch_begins_is_picked_up() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wildwings.log");

    let monitor = CompletionMonitor::new(fast_config());
    let source = FileLogSource::new(&path);
    let sentinels = SentinelSet::for_job(None);
    let cancel = StopSignal::new();

    let writer_path = path.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        append(&writer_path, "detection loop started");
        append(&writer_path, "Mission thread finished");
    });

    let outcome = monitor
        .wait_for_completion("wildwings", &source, &sentinels, &cancel)
        .await;
    assert_eq!(outcome, CompletionOutcome::Success);
}

#[tokio::test]
async fn failure_line_in_same_write_as_success_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("openpasslite.log");
    append(&path, "boot");

    let monitor = CompletionMonitor::new(fast_config());
    let source = FileLogSource::new(&path);
    let sentinels = SentinelSet::for_job(Some("RTB"));
    let cancel = StopSignal::new();

    let writer_path = path.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        append(&writer_path, "Mission RTB failed: connection timed out");
        append(&writer_path, "Mission RTB thread finished");
    });

    let outcome = monitor
        .wait_for_completion("openpasslite", &source, &sentinels, &cancel)
        .await;
    assert_eq!(
        outcome,
        CompletionOutcome::Failure("Mission RTB failed:".to_string())
    );
}

#[tokio::test]
async fn missing_log_file_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let monitor = CompletionMonitor::new(fast_config());
    let source = FileLogSource::new(dir.path().join("never.log"));
    let sentinels = SentinelSet::for_job(Some("LTT"));
    let cancel = StopSignal::new();

    let outcome = monitor
        .wait_for_completion("openpasslite", &source, &sentinels, &cancel)
        .await;
    assert_eq!(outcome, CompletionOutcome::TimedOut);
}
