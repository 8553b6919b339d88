//! # Wavetest Scheduler
//!
//! The orchestration layer of the wavetest harness: drives every registered
//! case to a terminal state on one thread.
//!
//! ## Design Goals
//!
//! 1. **Strict sequencing**: cases execute in registration order; two bodies
//!    never interleave
//! 2. **Cooperative suspension**: bodies yield only at explicit await points
//!    (timers, animation frames, events); a suspended case does not block the
//!    host loop
//! 3. **Guaranteed teardown**: cleanup actions run exactly once per case on
//!    every exit path, timeout included

mod context;
mod runner;

pub use context::TestContext;
pub use runner::{SchedError, Scheduler};

// Re-export the pieces an embedding document needs to register and observe
// cases without naming the lower crates.
pub use wavetest_core::{
    CaseHandle, CaseSnapshot, Expectation, HarnessError, RegisterOptions, RunConfig, TestBody,
    TestKind, TestStatus,
};
pub use wavetest_events::{Event, EventTarget, FrameClock, Subscription};

/// A test run whose bodies receive the scheduler's [`TestContext`].
pub type TestRun = wavetest_core::TestRun<TestContext>;
