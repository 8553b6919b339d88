//! Test case state and the shared handle the harness mutates it through.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::status::{Expectation, TestKind, TestStatus};

/// One named, independently scheduled assertion scenario.
///
/// Created in `Pending` state at registration. Mutated only by the running
/// body (through assertions) and by the scheduler (start, completion,
/// timeout). Once a terminal status is reached the case never changes again.
#[derive(Debug)]
pub struct TestCase {
    name: String,
    kind: TestKind,
    expectation: Expectation,
    status: TestStatus,
    failures: Vec<String>,
}

impl TestCase {
    pub(crate) fn new(name: String, kind: TestKind, expectation: Expectation) -> Self {
        Self {
            name,
            kind,
            expectation,
            status: TestStatus::Pending,
            failures: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> TestKind {
        self.kind
    }

    pub fn expectation(&self) -> Expectation {
        self.expectation
    }

    pub fn status(&self) -> TestStatus {
        self.status
    }

    /// Diagnostic messages recorded so far, in assertion order.
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    /// Move `Pending → Running`.
    pub fn start(&mut self) {
        if self.status != TestStatus::Pending {
            warn!(name = %self.name, status = %self.status, "Cannot start test case twice");
            return;
        }
        self.status = TestStatus::Running;
    }

    /// Record an assertion mismatch.
    ///
    /// The first failure moves the case to `Fail` (or `Advisory` for advisory
    /// cases); later failures append their message only. The status never
    /// reverts.
    pub fn record_failure(&mut self, message: String) {
        debug!(name = %self.name, %message, "Assertion failed");
        self.failures.push(message);
        if !self.status.is_terminal() {
            self.mark_terminal(TestStatus::Fail);
        }
    }

    /// Record an uncaught panic from the body and mark the case `Error`.
    pub fn record_error(&mut self, message: String) {
        self.failures.push(format!("uncaught panic: {message}"));
        self.mark_terminal(TestStatus::Error);
    }

    /// Mark the case `Timeout`. Has no effect if a terminal state was already
    /// reached before the budget elapsed.
    pub fn record_timeout(&mut self) {
        if self.status.is_terminal() {
            return;
        }
        self.failures
            .push("suspended past the configured budget".to_string());
        self.mark_terminal(TestStatus::Timeout);
    }

    /// Move `Running → Pass` on clean completion; keeps an earlier terminal
    /// status untouched.
    pub fn complete(&mut self) {
        if self.status.is_terminal() {
            return;
        }
        self.mark_terminal(TestStatus::Pass);
    }

    fn mark_terminal(&mut self, to: TestStatus) {
        if self.status.is_terminal() {
            warn!(
                name = %self.name,
                status = %self.status,
                requested = %to,
                "Terminal state already reached, ignoring transition"
            );
            return;
        }
        // Advisory cases tolerate every failing outcome.
        let to = match (self.expectation, to) {
            (Expectation::Advisory, TestStatus::Fail)
            | (Expectation::Advisory, TestStatus::Error)
            | (Expectation::Advisory, TestStatus::Timeout) => TestStatus::Advisory,
            (_, other) => other,
        };
        self.status = to;
    }

    /// Immutable snapshot for reporting.
    pub fn snapshot(&self) -> CaseSnapshot {
        CaseSnapshot {
            name: self.name.clone(),
            kind: self.kind,
            expectation: self.expectation,
            status: self.status,
            failures: self.failures.clone(),
        }
    }
}

/// Shared handle to a registered case.
///
/// Cheap to clone; the scheduler hands one to the assertion surface of each
/// running body. Single-threaded by construction, so interior mutability
/// needs no locking.
#[derive(Debug, Clone)]
pub struct CaseHandle {
    inner: Rc<RefCell<TestCase>>,
}

impl CaseHandle {
    pub(crate) fn new(case: TestCase) -> Self {
        Self {
            inner: Rc::new(RefCell::new(case)),
        }
    }

    pub fn name(&self) -> String {
        self.inner.borrow().name().to_string()
    }

    pub fn status(&self) -> TestStatus {
        self.inner.borrow().status()
    }

    pub fn expectation(&self) -> Expectation {
        self.inner.borrow().expectation()
    }

    pub fn failure_count(&self) -> usize {
        self.inner.borrow().failures().len()
    }

    pub fn start(&self) {
        self.inner.borrow_mut().start();
    }

    pub fn record_failure(&self, message: String) {
        self.inner.borrow_mut().record_failure(message);
    }

    pub fn record_error(&self, message: String) {
        self.inner.borrow_mut().record_error(message);
    }

    pub fn record_timeout(&self) {
        self.inner.borrow_mut().record_timeout();
    }

    pub fn complete(&self) {
        self.inner.borrow_mut().complete();
    }

    pub fn snapshot(&self) -> CaseSnapshot {
        self.inner.borrow().snapshot()
    }
}

/// Serializable snapshot of a case, produced for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct CaseSnapshot {
    pub name: String,
    pub kind: TestKind,
    pub expectation: Expectation,
    pub status: TestStatus,
    pub failures: Vec<String>,
}
