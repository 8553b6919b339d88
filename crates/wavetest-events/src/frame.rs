//! Animation-frame clock.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use tracing::trace;

#[derive(Default)]
struct ClockState {
    frame: u64,
    wakers: Vec<Waker>,
}

/// The animation-frame clock test bodies suspend on.
///
/// The scheduler ticks the clock at the configured frame interval while a run
/// is active; each tick wakes every pending [`FrameClock::next_frame`] future.
#[derive(Clone, Default)]
pub struct FrameClock {
    inner: Rc<RefCell<ClockState>>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current frame number. Starts at zero, increments per tick.
    pub fn frame(&self) -> u64 {
        self.inner.borrow().frame
    }

    /// Advance one frame and wake everything suspended on it.
    pub fn tick(&self) {
        let wakers = {
            let mut state = self.inner.borrow_mut();
            state.frame += 1;
            trace!(frame = state.frame, waiters = state.wakers.len(), "Frame tick");
            std::mem::take(&mut state.wakers)
        };
        for waker in wakers {
            waker.wake();
        }
    }

    /// Future resolving with the frame number of the next tick.
    pub fn next_frame(&self) -> NextFrame {
        NextFrame {
            clock: self.inner.clone(),
            start: self.frame(),
        }
    }
}

/// Future for [`FrameClock::next_frame`].
pub struct NextFrame {
    clock: Rc<RefCell<ClockState>>,
    start: u64,
}

impl Future for NextFrame {
    type Output = u64;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<u64> {
        let mut state = self.clock.borrow_mut();
        if state.frame > self.start {
            Poll::Ready(state.frame)
        } else {
            state.wakers.push(cx.waker().clone());
            Poll::Pending
        }
    }
}
