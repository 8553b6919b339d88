//! Per-case context handed to every test body.

use std::cell::RefCell;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;
use std::time::Duration;

use serde_json::Value;
use tracing::warn;
use wavetest_core::CaseHandle;
use wavetest_events::{Event, EventTarget, FrameClock};

type Cleanup = Box<dyn FnOnce()>;

/// Everything a running body may touch: the assertion surface for its case
/// plus the suspension points the cooperative model allows.
///
/// Cheap to clone; suspendable bodies take it by value, sync bodies by
/// reference.
#[derive(Clone)]
pub struct TestContext {
    case: CaseHandle,
    frames: FrameClock,
    cleanups: Rc<RefCell<Vec<Cleanup>>>,
}

impl TestContext {
    pub(crate) fn new(case: CaseHandle, frames: FrameClock) -> Self {
        Self {
            case,
            frames,
            cleanups: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Handle to the case this context belongs to.
    pub fn case(&self) -> &CaseHandle {
        &self.case
    }

    // --- assertion surface -------------------------------------------------

    pub fn assert_eq<T>(&self, actual: &T, expected: &T, description: &str)
    where
        T: fmt::Debug + PartialEq,
    {
        self.case.assert_eq(actual, expected, description);
    }

    pub fn assert_text(&self, actual: &str, expected: &str, description: &str) {
        self.case.assert_text(actual, expected, description);
    }

    pub fn assert_true(&self, condition: bool, description: &str) {
        self.case.assert_true(condition, description);
    }

    pub fn assert_false(&self, condition: bool, description: &str) {
        self.case.assert_false(condition, description);
    }

    pub fn assert_ok<T: fmt::Debug, E: fmt::Debug>(
        &self,
        result: &Result<T, E>,
        description: &str,
    ) {
        self.case.assert_ok(result, description);
    }

    pub fn assert_err<T: fmt::Debug, E: fmt::Debug>(
        &self,
        result: &Result<T, E>,
        description: &str,
    ) {
        self.case.assert_err(result, description);
    }

    pub fn assert_some<T: fmt::Debug>(&self, value: &Option<T>, description: &str) {
        self.case.assert_some(value, description);
    }

    pub fn assert_none<T: fmt::Debug>(&self, value: &Option<T>, description: &str) {
        self.case.assert_none(value, description);
    }

    pub fn fail(&self, description: &str) {
        self.case.fail(description);
    }

    // --- suspension points -------------------------------------------------

    /// Suspend until a timer fires.
    pub async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    /// Suspend until the next animation frame; resolves with its number.
    pub async fn next_frame(&self) -> u64 {
        self.frames.next_frame().await
    }

    /// Yield to the back of the queue, letting currently queued work drain.
    pub async fn defer(&self) {
        tokio::task::yield_now().await;
    }

    /// Suspend until `event` fires on `target`; resolves with its detail.
    pub async fn wait_for(&self, target: &EventTarget, event: &str) -> Value {
        target.once(event).await
    }

    // --- teardown ----------------------------------------------------------

    /// Register a teardown action. Actions run once the case reaches a
    /// terminal state, in reverse registration order, on every exit path.
    pub fn on_cleanup(&self, action: impl FnOnce() + 'static) {
        self.cleanups.borrow_mut().push(Box::new(action));
    }

    /// Subscribe a listener whose release is tied to this case's teardown.
    pub fn listen_scoped(
        &self,
        target: &EventTarget,
        event: &str,
        callback: impl Fn(&Event) + 'static,
    ) {
        let subscription = target.subscribe(event, callback);
        self.on_cleanup(move || subscription.release());
    }

    /// Run every registered cleanup action exactly once, newest first. A
    /// panicking action is caught and logged, never propagated.
    pub(crate) fn run_cleanups(&self) {
        let actions: Vec<Cleanup> = {
            let mut cleanups = self.cleanups.borrow_mut();
            cleanups.drain(..).collect()
        };
        for action in actions.into_iter().rev() {
            if catch_unwind(AssertUnwindSafe(action)).is_err() {
                warn!(case = %self.case.name(), "Cleanup action panicked");
            }
        }
    }
}
