//! Case status, body kind, and expectation enums.

use std::fmt;

use serde::Serialize;

/// Lifecycle status of a test case.
///
/// `Pending → Running → {Pass, Fail, Error, Timeout, Advisory}`. The five
/// right-hand states are terminal; a case enters exactly one of them exactly
/// once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    /// Registered, body not started.
    Pending,
    /// Body currently executing or suspended.
    Running,
    /// Completed with no recorded failure.
    Pass,
    /// At least one assertion mismatched.
    Fail,
    /// Body panicked outside any assertion.
    Error,
    /// Suspended past the configured budget.
    Timeout,
    /// Would-be failure on a case registered as advisory.
    Advisory,
}

impl TestStatus {
    /// Whether this status permits no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TestStatus::Pass
                | TestStatus::Fail
                | TestStatus::Error
                | TestStatus::Timeout
                | TestStatus::Advisory
        )
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TestStatus::Pending => "PENDING",
            TestStatus::Running => "RUNNING",
            TestStatus::Pass => "PASS",
            TestStatus::Fail => "FAIL",
            TestStatus::Error => "ERROR",
            TestStatus::Timeout => "TIMEOUT",
            TestStatus::Advisory => "ADVISORY",
        };
        f.write_str(label)
    }
}

/// How a test body executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    /// Plain function, runs to completion without yielding.
    Sync,
    /// Future-returning body that may suspend on timers, frames, or events.
    Suspendable,
}

/// Whether a case's outcome is required or merely observed.
///
/// Advisory cases exist for scenarios that tolerate known host bugs: their
/// diagnostics are recorded, but a would-be fail/error/timeout lands in
/// [`TestStatus::Advisory`] and does not count against the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// Failures count against the run.
    #[default]
    Required,
    /// Failures are recorded but tolerated.
    Advisory,
}
