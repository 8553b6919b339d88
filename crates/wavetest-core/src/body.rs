//! Tagged test body variants.

use std::future::Future;

use futures::future::LocalBoxFuture;
use futures::FutureExt;

use crate::status::TestKind;

/// A registered test body, resolved into its variant once at registration.
///
/// `C` is the context type the scheduler hands to the body (assertions plus
/// suspension points). Bodies are `!Send`; the whole harness is
/// single-threaded.
pub enum TestBody<C> {
    /// Runs to completion without yielding.
    Sync(Box<dyn FnOnce(&C)>),
    /// May suspend on timers, animation frames, or events.
    Suspendable(Box<dyn FnOnce(C) -> LocalBoxFuture<'static, ()>>),
}

impl<C> TestBody<C> {
    /// Wrap a plain function.
    pub fn sync(body: impl FnOnce(&C) + 'static) -> Self {
        Self::Sync(Box::new(body))
    }

    /// Wrap a future-returning function.
    pub fn suspendable<F>(body: impl FnOnce(C) -> F + 'static) -> Self
    where
        F: Future<Output = ()> + 'static,
    {
        Self::Suspendable(Box::new(move |ctx| body(ctx).boxed_local()))
    }

    pub fn kind(&self) -> TestKind {
        match self {
            TestBody::Sync(_) => TestKind::Sync,
            TestBody::Suspendable(_) => TestKind::Suspendable,
        }
    }
}

impl<C> std::fmt::Debug for TestBody<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TestBody::Sync(_) => "TestBody::Sync",
            TestBody::Suspendable(_) => "TestBody::Suspendable",
        })
    }
}
