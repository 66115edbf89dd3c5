//! # System Constants
//!
//! Sentinel literals, endpoint paths, and default timing values that define
//! the operational boundaries of the SmartFields mission pipeline.

use std::time::Duration;

/// Sentinel text fragments recognized in service log streams.
///
/// These are literal substrings, not regexes. The success line for a named
/// mission `J` is `Mission J thread finished`; an unnamed mission logs the
/// bare `Mission thread finished`.
pub mod sentinels {
    /// Success sentinel for a named mission, with `{}` as the mission name.
    pub const SUCCESS_NAMED: &str = "Mission {} thread finished";

    /// Success sentinel emitted by services that run a single unnamed mission.
    pub const SUCCESS_UNNAMED: &str = "Mission thread finished";

    /// Failure sentinel for a named mission that reached its error path.
    pub const FAILED_NAMED: &str = "Mission {} failed:";

    /// Named mission whose thread exited with errors. Contains the success
    /// sentinel as a prefix, which is why failure matches are ordered first.
    pub const FINISHED_WITH_ERRORS_NAMED: &str = "Mission {} thread finished with errors";

    /// Failure sentinels that appear without a mission name.
    pub const FAILURE_GENERIC: &[&str] = &[
        "Mission failed:",
        "Mission thread finished with errors",
        "AssertionError",
        "connection timed out",
        "Mission process exited with return code:",
    ];
}

/// Endpoint paths on the collaborating mission services.
pub mod endpoints {
    pub const START_MISSION: &str = "/start_mission";
    pub const STOP_MISSION: &str = "/stop_mission";
}

/// Default timing values for remote calls and log monitoring.
pub mod timing {
    use super::Duration;

    /// Timeout for a start-mission call to a remote service.
    pub const CALL_TIMEOUT: Duration = Duration::from_secs(30);

    /// Timeout for best-effort stop-mission calls.
    pub const STOP_TIMEOUT: Duration = Duration::from_secs(10);

    /// Interval between log stream polls.
    pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

    /// How long to wait for a service's log stream to appear at all.
    pub const APPEARANCE_TIMEOUT: Duration = Duration::from_secs(30);

    /// Overall ceiling on waiting for a mission's completion sentinel.
    pub const COMPLETION_TIMEOUT: Duration = Duration::from_secs(180);

    /// Delay between retries of a failed start-mission call.
    pub const RETRY_DELAY: Duration = Duration::from_secs(5);
}
