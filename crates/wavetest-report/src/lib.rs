//! # Wavetest Report
//!
//! Aggregates terminal case snapshots into a run summary and exposes the two
//! result channels: a machine-readable JSON document for an external
//! collector and a human-readable listing.
//!
//! Summarizing never mutates cases; it works entirely off snapshots.

use std::fmt;
use std::io;

use serde::Serialize;
use thiserror::Error;
use tracing::info;
use wavetest_core::{CaseSnapshot, TestRun, TestStatus};

/// Errors that can occur while building or emitting a summary.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Test case has not reached a terminal state: {name}")]
    NotTerminal { name: String },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write report: {0}")]
    Io(#[from] io::Error),
}

/// Aggregated outcome of one run: per-status counts plus the ordered case
/// snapshots they were derived from.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub timed_out: usize,
    pub advisory: usize,
    pub cases: Vec<CaseSnapshot>,
}

/// Build a summary from a finished run.
///
/// Every case must already be terminal; a still-pending or running case is a
/// caller bug and is reported as [`ReportError::NotTerminal`].
pub fn summarize<C>(run: &TestRun<C>) -> Result<ReportSummary, ReportError> {
    from_snapshots(run.snapshots())
}

/// Build a summary from an ordered list of case snapshots.
pub fn from_snapshots(cases: Vec<CaseSnapshot>) -> Result<ReportSummary, ReportError> {
    let mut summary = ReportSummary {
        total: cases.len(),
        passed: 0,
        failed: 0,
        errored: 0,
        timed_out: 0,
        advisory: 0,
        cases: Vec::new(),
    };

    for case in &cases {
        match case.status {
            TestStatus::Pass => summary.passed += 1,
            TestStatus::Fail => summary.failed += 1,
            TestStatus::Error => summary.errored += 1,
            TestStatus::Timeout => summary.timed_out += 1,
            TestStatus::Advisory => summary.advisory += 1,
            TestStatus::Pending | TestStatus::Running => {
                return Err(ReportError::NotTerminal {
                    name: case.name.clone(),
                });
            }
        }
    }
    summary.cases = cases;

    info!(
        total = summary.total,
        passed = summary.passed,
        failed = summary.failed,
        errored = summary.errored,
        timed_out = summary.timed_out,
        advisory = summary.advisory,
        "Run summarized"
    );
    Ok(summary)
}

impl ReportSummary {
    /// Whether the run succeeded. Advisory outcomes are observed, not
    /// required, so they never count against the run.
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errored == 0 && self.timed_out == 0
    }

    /// Machine-readable form for an external collector.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Emit the structured form, newline-terminated, to a collector channel.
    pub fn write_to(&self, writer: &mut dyn io::Write) -> Result<(), ReportError> {
        writeln!(writer, "{}", self.to_json()?)?;
        Ok(())
    }
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for case in &self.cases {
            writeln!(f, "{} {}", case.status, case.name)?;
            for failure in &case.failures {
                for line in failure.lines() {
                    writeln!(f, "    {line}")?;
                }
            }
        }
        write!(
            f,
            "{} passed, {} failed, {} errored, {} timed out, {} advisory ({} total)",
            self.passed, self.failed, self.errored, self.timed_out, self.advisory, self.total
        )
    }
}
