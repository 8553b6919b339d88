//! Named-event dispatch points.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll, Waker};

use serde_json::Value;
use tracing::{debug, trace};

/// Unique identifier for a listener subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// A dispatched event: a name plus a structured detail payload.
#[derive(Debug, Clone)]
pub struct Event {
    pub name: String,
    pub detail: Value,
}

struct Listener {
    id: SubscriptionId,
    event: String,
    callback: Rc<dyn Fn(&Event)>,
}

// Held weakly: a future dropped before its event fires must not pin its
// waiter entry for the life of the target.
struct Waiter {
    event: String,
    state: Weak<RefCell<WaiterState>>,
}

#[derive(Default)]
struct WaiterState {
    detail: Option<Value>,
    waker: Option<Waker>,
}

#[derive(Default)]
struct TargetState {
    listeners: Vec<Listener>,
    waiters: Vec<Waiter>,
}

/// A named-event dispatch point, the shim through which test bodies observe
/// the host.
///
/// Listeners are registered through [`EventTarget::subscribe`] and removed by
/// releasing the returned [`Subscription`] handle; nothing is reclaimed
/// implicitly. Dispatch is synchronous and runs on the calling thread.
#[derive(Clone, Default)]
pub struct EventTarget {
    inner: Rc<RefCell<TargetState>>,
}

impl EventTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `event`. The listener stays live until the
    /// returned handle is released or dropped.
    pub fn subscribe(&self, event: &str, callback: impl Fn(&Event) + 'static) -> Subscription {
        let id = SubscriptionId::new();
        self.inner.borrow_mut().listeners.push(Listener {
            id,
            event: event.to_string(),
            callback: Rc::new(callback),
        });
        trace!(event, id = id.raw(), "Listener subscribed");
        Subscription {
            target: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Future resolving with the detail of the next matching dispatch.
    pub fn once(&self, event: &str) -> EventFuture {
        let state = Rc::new(RefCell::new(WaiterState::default()));
        let mut inner = self.inner.borrow_mut();
        inner.waiters.retain(|w| w.state.strong_count() > 0);
        inner.waiters.push(Waiter {
            event: event.to_string(),
            state: Rc::downgrade(&state),
        });
        EventFuture { state }
    }

    /// Dispatch `event` to every live listener and pending waiter. Returns
    /// the number of listeners invoked.
    pub fn dispatch(&self, event: &str, detail: Value) -> usize {
        let fired = Event {
            name: event.to_string(),
            detail,
        };

        // Clone callbacks out before invoking so a listener may subscribe or
        // dispatch again without hitting the borrow.
        let callbacks: Vec<Rc<dyn Fn(&Event)>> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.event == event)
            .map(|l| l.callback.clone())
            .collect();

        for callback in &callbacks {
            callback(&fired);
        }

        let woken: Vec<Rc<RefCell<WaiterState>>> = {
            let mut state = self.inner.borrow_mut();
            let mut matched = Vec::new();
            state.waiters.retain(|w| match w.state.upgrade() {
                Some(live) if w.event == event => {
                    matched.push(live);
                    false
                }
                Some(_) => true,
                // Future dropped before the event fired.
                None => false,
            });
            matched
        };
        for waiter in woken {
            let mut state = waiter.borrow_mut();
            state.detail = Some(fired.detail.clone());
            if let Some(waker) = state.waker.take() {
                waker.wake();
            }
        }

        debug!(event, listeners = callbacks.len(), "Event dispatched");
        callbacks.len()
    }

    /// Number of pending waiters whose future is still alive.
    pub fn waiter_count(&self) -> usize {
        self.inner
            .borrow()
            .waiters
            .iter()
            .filter(|w| w.state.strong_count() > 0)
            .count()
    }

    /// Number of live listeners for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.inner
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.event == event)
            .count()
    }
}

/// Handle to a registered listener.
///
/// The listener is removed when the handle is released (or dropped); holding
/// the handle is what keeps the subscription alive.
pub struct Subscription {
    target: Weak<RefCell<TargetState>>,
    id: SubscriptionId,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Remove the listener now.
    pub fn release(self) {
        // Removal happens in Drop.
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(target) = self.target.upgrade() {
            target.borrow_mut().listeners.retain(|l| l.id != self.id);
            trace!(id = self.id.raw(), "Listener released");
        }
    }
}

/// Future for [`EventTarget::once`].
pub struct EventFuture {
    state: Rc<RefCell<WaiterState>>,
}

impl Future for EventFuture {
    type Output = Value;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Value> {
        let mut state = self.state.borrow_mut();
        if let Some(detail) = state.detail.take() {
            Poll::Ready(detail)
        } else {
            state.waker = Some(cx.waker().clone());
            Poll::Pending
        }
    }
}
