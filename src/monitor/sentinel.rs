//! # Sentinel Scanning
//!
//! Pure text scanning for mission completion sentinels. The monitor feeds it
//! newly appended log content; nothing here touches a file.
//!
//! Failure patterns are evaluated before the success pattern, by byte
//! position: a failure match at or before the success match decides the
//! outcome. This is what makes `Mission LTT thread finished with errors`
//! resolve to a failure even though it contains the success line as a prefix.

use crate::constants::sentinels;

/// Result of scanning one delta of log content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanResult {
    /// The success sentinel appeared with no earlier failure sentinel
    Success,
    /// A failure sentinel appeared; carries the matched pattern for logging
    Failure(String),
}

/// The sentinel patterns recognized for one mission.
#[derive(Debug, Clone)]
pub struct SentinelSet {
    success: String,
    failures: Vec<String>,
}

impl SentinelSet {
    /// Build the sentinel set for a mission. Unnamed missions (`job = None`)
    /// watch for the bare `Mission thread finished` line that single-mission
    /// services emit.
    pub fn for_job(job: Option<&str>) -> Self {
        match job {
            Some(name) => {
                let mut failures = vec![
                    sentinels::FAILED_NAMED.replace("{}", name),
                    sentinels::FINISHED_WITH_ERRORS_NAMED.replace("{}", name),
                ];
                failures.extend(sentinels::FAILURE_GENERIC.iter().map(|s| s.to_string()));
                Self {
                    success: sentinels::SUCCESS_NAMED.replace("{}", name),
                    failures,
                }
            }
            None => Self {
                success: sentinels::SUCCESS_UNNAMED.to_string(),
                failures: sentinels::FAILURE_GENERIC
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            },
        }
    }

    /// Scan newly appended content for a verdict. `None` means no sentinel
    /// yet; the caller advances its baseline and keeps polling.
    pub fn scan(&self, delta: &str) -> Option<ScanResult> {
        let failure = self
            .failures
            .iter()
            .filter_map(|p| delta.find(p.as_str()).map(|pos| (pos, p)))
            .min_by_key(|(pos, _)| *pos);
        let success_pos = delta.find(self.success.as_str());

        match (failure, success_pos) {
            (Some((fail_pos, pattern)), Some(succ_pos)) if fail_pos <= succ_pos => {
                Some(ScanResult::Failure(pattern.clone()))
            }
            (_, Some(_)) => Some(ScanResult::Success),
            (Some((_, pattern)), None) => Some(ScanResult::Failure(pattern.clone())),
            (None, None) => None,
        }
    }
}
