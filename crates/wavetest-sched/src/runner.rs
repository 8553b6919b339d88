//! Sequential case execution.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use futures::FutureExt;
use thiserror::Error;
use tracing::{debug, info, warn};
use wavetest_core::{CaseHandle, TestBody};
use wavetest_events::FrameClock;

use crate::context::TestContext;
use crate::TestRun;

/// Errors that can occur while standing up the scheduler itself.
#[derive(Error, Debug)]
pub enum SchedError {
    #[error("Failed to build scheduler runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Drives every registered case to a terminal state, in registration order,
/// on one thread.
#[derive(Debug, Default)]
pub struct Scheduler {
    _private: (),
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every case, building a current-thread runtime. For embedding into
    /// an existing local task set, use [`Scheduler::run`] instead.
    pub fn run_blocking(&self, run: &mut TestRun) -> Result<(), SchedError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;
        let local = tokio::task::LocalSet::new();
        local.block_on(&runtime, self.run(run));
        Ok(())
    }

    /// Run every case inside the current `LocalSet`.
    ///
    /// Bodies execute strictly sequentially; while one is suspended, the
    /// frame pump and host timers keep turning, so unrelated work interleaves
    /// only between its yield points.
    pub async fn run(&self, run: &mut TestRun) {
        info!(cases = run.len(), "Test run starting");

        let frames = FrameClock::new();
        let pump = tokio::task::spawn_local(pump_frames(
            frames.clone(),
            run.config().frame_interval,
        ));

        for index in 0..run.len() {
            let case = match run.handle(index) {
                Some(case) => case,
                None => break,
            };
            let body = run.take_body(index);
            let budget = run.timeout_for(index);
            self.run_case(case, body, budget, frames.clone()).await;
        }

        pump.abort();
        info!(cases = run.len(), "Test run finished");
    }

    async fn run_case(
        &self,
        case: CaseHandle,
        body: Option<TestBody<TestContext>>,
        budget: Duration,
        frames: FrameClock,
    ) {
        let name = case.name();
        let Some(body) = body else {
            warn!(%name, "Test body already consumed, skipping");
            return;
        };

        debug!(%name, "Test case starting");
        case.start();
        let ctx = TestContext::new(case.clone(), frames);

        match body {
            TestBody::Sync(body) => {
                // A timeout cannot preempt synchronous execution on one
                // thread, so sync bodies carry no budget.
                if let Err(payload) = catch_unwind(AssertUnwindSafe(|| body(&ctx))) {
                    case.record_error(panic_message(payload));
                }
            }
            TestBody::Suspendable(body) => {
                let future = AssertUnwindSafe(body(ctx.clone())).catch_unwind();
                match tokio::time::timeout(budget, future).await {
                    Ok(Ok(())) => {}
                    Ok(Err(payload)) => case.record_error(panic_message(payload)),
                    Err(_) => case.record_timeout(),
                }
            }
        }

        case.complete();
        ctx.run_cleanups();
        debug!(%name, status = %case.status(), "Test case finished");
    }
}

/// Tick the animation-frame clock for as long as the run is active.
async fn pump_frames(clock: FrameClock, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // The first tick of a tokio interval completes immediately.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        clock.tick();
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
