//! Normalized result of one runner invocation

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One failing leaf test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureDescriptor {
    /// Title of the spec the failing test belongs to
    pub name: String,

    /// Error message reported for the failing attempt
    pub error: String,
}

/// Classification of a single test by its first result record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
}

impl TestStatus {
    /// Classify a Playwright status tag. Missing and unknown tags are skipped.
    pub fn classify(status: Option<&str>) -> Self {
        match status {
            Some("passed") => TestStatus::Passed,
            Some("failed") | Some("timedOut") => TestStatus::Failed,
            _ => TestStatus::Skipped,
        }
    }
}

/// Running counts collected during a report walk.
///
/// Every recorded test bumps `total` and exactly one bucket, so the
/// buckets always sum to the total.
#[derive(Debug, Default, Clone)]
pub struct Tally {
    total: usize,
    passed: usize,
    failed: usize,
    skipped: usize,
    failures: Vec<FailureDescriptor>,
}

impl Tally {
    pub fn record(&mut self, status: TestStatus, failure: impl FnOnce() -> FailureDescriptor) {
        self.total += 1;
        match status {
            TestStatus::Passed => self.passed += 1,
            TestStatus::Failed => {
                self.failed += 1;
                self.failures.push(failure());
            }
            TestStatus::Skipped => self.skipped += 1,
        }
    }

    /// Finish the walk. Success is decided by failures alone.
    pub fn into_outcome(self, duration_ms: u64) -> RunOutcome {
        RunOutcome {
            success: self.failed == 0,
            total_tests: self.total,
            passed: self.passed,
            failed: self.failed,
            skipped: self.skipped,
            duration_ms,
            failures: self.failures,
            raw_output: None,
            report_dir: None,
        }
    }
}

/// Aggregate result of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub success: bool,
    pub total_tests: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub failures: Vec<FailureDescriptor>,

    /// Verbatim runner output, present only when no report could be parsed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_output: Option<String>,

    /// HTML report directory discovered after the run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_dir: Option<PathBuf>,
}

impl RunOutcome {
    /// Degraded outcome for output that carried no usable report.
    /// Only here does the exit code decide success.
    pub fn unparsed(raw_output: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self {
            success: exit_code == Some(0),
            total_tests: 0,
            passed: 0,
            failed: 0,
            skipped: 0,
            duration_ms: 0,
            failures: Vec::new(),
            raw_output: Some(raw_output.into()),
            report_dir: None,
        }
    }

    /// Attach the discovered report directory
    pub fn with_report_dir(mut self, report_dir: Option<PathBuf>) -> Self {
        self.report_dir = report_dir;
        self
    }

    /// Percentage of passed tests, `None` for an empty run
    pub fn pass_rate(&self) -> Option<f64> {
        (self.total_tests > 0).then(|| self.passed as f64 / self.total_tests as f64 * 100.0)
    }
}
