//! The explicit test registry.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::body::TestBody;
use crate::case::{CaseHandle, CaseSnapshot, TestCase};
use crate::config::RunConfig;
use crate::error::HarnessError;
use crate::status::Expectation;

/// Per-case registration options.
#[derive(Debug, Clone, Default)]
pub struct RegisterOptions {
    /// Whether a failing outcome is tolerated.
    pub expectation: Expectation,
    /// Budget override for this case; `None` uses the run default.
    pub timeout: Option<Duration>,
}

impl RegisterOptions {
    /// Options for a case whose failures are observed but not required.
    pub fn advisory() -> Self {
        Self {
            expectation: Expectation::Advisory,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

struct Entry<C> {
    case: CaseHandle,
    body: Option<TestBody<C>>,
    timeout: Option<Duration>,
}

/// One document's test run: the ordered set of registered cases plus the run
/// configuration.
///
/// An explicit value, not an ambient global: the embedding document creates
/// one, registers its cases against it, hands it to the scheduler, and then
/// to the reporter. `C` is the context type bodies receive.
pub struct TestRun<C> {
    entries: Vec<Entry<C>>,
    index: HashMap<String, usize>,
    config: RunConfig,
}

impl<C> TestRun<C> {
    pub fn new() -> Self {
        Self::with_config(RunConfig::default())
    }

    pub fn with_config(config: RunConfig) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            config,
        }
    }

    /// Register a synchronous case.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        body: impl FnOnce(&C) + 'static,
    ) -> Result<(), HarnessError> {
        self.register_with(name, RegisterOptions::default(), TestBody::sync(body))
    }

    /// Register a suspendable case.
    pub fn register_async<F>(
        &mut self,
        name: impl Into<String>,
        body: impl FnOnce(C) -> F + 'static,
    ) -> Result<(), HarnessError>
    where
        F: Future<Output = ()> + 'static,
    {
        self.register_with(name, RegisterOptions::default(), TestBody::suspendable(body))
    }

    /// Register a case with explicit options and an already-built body.
    ///
    /// Duplicate names are rejected here, before any body runs.
    pub fn register_with(
        &mut self,
        name: impl Into<String>,
        options: RegisterOptions,
        body: TestBody<C>,
    ) -> Result<(), HarnessError> {
        let name = name.into();
        if name.is_empty() {
            return Err(HarnessError::Setup("test name must not be empty".to_string()));
        }
        if self.index.contains_key(&name) {
            return Err(HarnessError::DuplicateName { name });
        }

        let kind = body.kind();
        debug!(%name, ?kind, expectation = ?options.expectation, "Registered test case");

        let case = CaseHandle::new(TestCase::new(name.clone(), kind, options.expectation));
        self.index.insert(name, self.entries.len());
        self.entries.push(Entry {
            case,
            body: Some(body),
            timeout: options.timeout,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Handle to the case at `index`, in registration order.
    pub fn handle(&self, index: usize) -> Option<CaseHandle> {
        self.entries.get(index).map(|e| e.case.clone())
    }

    /// Take the body of the case at `index`. Returns `None` once taken, so a
    /// body can never run twice.
    pub fn take_body(&mut self, index: usize) -> Option<TestBody<C>> {
        self.entries.get_mut(index).and_then(|e| e.body.take())
    }

    /// Effective budget for the case at `index`.
    pub fn timeout_for(&self, index: usize) -> Duration {
        self.entries
            .get(index)
            .and_then(|e| e.timeout)
            .unwrap_or(self.config.default_timeout)
    }

    /// Snapshots of every case, in registration order.
    pub fn snapshots(&self) -> Vec<CaseSnapshot> {
        self.entries.iter().map(|e| e.case.snapshot()).collect()
    }

    /// Whether every registered case has reached a terminal state.
    pub fn all_terminal(&self) -> bool {
        self.entries
            .iter()
            .all(|e| e.case.status().is_terminal())
    }
}

impl<C> Default for TestRun<C> {
    fn default() -> Self {
        Self::new()
    }
}
