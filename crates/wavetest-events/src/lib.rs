//! # Wavetest Events
//!
//! The host-facing shim of the wavetest harness: named-event dispatch points
//! with deterministically released subscription handles, one-shot event
//! futures, and the animation-frame clock.
//!
//! Everything here is single-threaded; interior state lives behind `Rc` and
//! suspension is implemented with plain waker lists, no background threads.

mod frame;
mod target;

pub use frame::{FrameClock, NextFrame};
pub use target::{Event, EventFuture, EventTarget, Subscription, SubscriptionId};
