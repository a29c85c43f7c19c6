//! Observing a promise from outside a continuation chain
//!
//! - `Latch`: blocks an OS thread until settlement (`Promise::wait`)
//! - [`PromiseFuture`]: resolves an `async` task on settlement (`.await`)
//!
//! Both attach an ordinary reaction to the cell, so they are notified through
//! the scheduler like any other continuation.

use crate::cell::{Cell, Reaction, Settlement};
use crate::promise::Promise;
use parking_lot::{Condvar, Mutex};
use promises_core::Result;
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};
use std::time::{Duration, Instant};

/// Slot blocked threads sleep on until the cell settles.
///
/// A cell has at most one live latch. Every thread blocked on the cell shares
/// it, so repeated timed waits on a pending promise never queue more than one
/// reaction.
pub(crate) struct Latch<T> {
    slot: Mutex<Option<Settlement<T>>>,
    ready: Condvar,
}

impl<T: Clone + Send + 'static> Latch<T> {
    pub(crate) fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            ready: Condvar::new(),
        }
    }

    /// The cell's shared latch, registering it on first use.
    pub(crate) fn attach(cell: &Arc<Cell<T>>) -> Arc<Self> {
        let (latch, fresh) = cell.observer();
        if fresh {
            cell.register(Box::new(Release(Arc::clone(&latch))));
        }
        latch
    }

    pub(crate) fn wait(&self) -> Result<T> {
        let mut slot = self.slot.lock();
        loop {
            if let Some(settlement) = slot.as_ref() {
                return settlement.clone().into_result();
            }
            self.ready.wait(&mut slot);
        }
    }

    pub(crate) fn wait_for(&self, timeout: Duration) -> Option<Result<T>> {
        let deadline = match Instant::now().checked_add(timeout) {
            Some(deadline) => deadline,
            // Past the end of the clock: no deadline at all
            None => return Some(self.wait()),
        };
        let mut slot = self.slot.lock();
        loop {
            if let Some(settlement) = slot.as_ref() {
                return Some(settlement.clone().into_result());
            }
            if self.ready.wait_until(&mut slot, deadline).timed_out() {
                return slot.clone().map(Settlement::into_result);
            }
        }
    }
}

struct Release<T>(Arc<Latch<T>>);

impl<T: Send> Reaction<T> for Release<T> {
    fn react(self: Box<Self>, settlement: Settlement<T>) {
        *self.0.slot.lock() = Some(settlement);
        self.0.ready.notify_all();
    }
}

struct Waiting<T> {
    settlement: Option<Settlement<T>>,
    waker: Option<Waker>,
}

/// Future returned by `Promise::into_future`.
///
/// Resolves to `Ok(value)` or `Err(reason)` once the promise settles.
pub struct PromiseFuture<T> {
    promise: Promise<T>,
    waiting: Option<Arc<Mutex<Waiting<T>>>>,
}

impl<T: Clone + Send + 'static> Future for PromiseFuture<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if let Some(waiting) = &this.waiting {
            let mut waiting = waiting.lock();
            return match waiting.settlement.take() {
                Some(settlement) => Poll::Ready(settlement.into_result()),
                None => {
                    waiting.waker = Some(cx.waker().clone());
                    Poll::Pending
                }
            };
        }

        if let Some(settlement) = this.promise.settlement() {
            return Poll::Ready(settlement.into_result());
        }
        let waiting = Arc::new(Mutex::new(Waiting {
            settlement: None,
            waker: Some(cx.waker().clone()),
        }));
        this.promise
            .cell
            .register(Box::new(Wake(Arc::clone(&waiting))));
        this.waiting = Some(waiting);
        Poll::Pending
    }
}

struct Wake<T>(Arc<Mutex<Waiting<T>>>);

impl<T: Send> Reaction<T> for Wake<T> {
    fn react(self: Box<Self>, settlement: Settlement<T>) {
        let waker = {
            let mut waiting = self.0.lock();
            waiting.settlement = Some(settlement);
            waiting.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

impl<T: Clone + Send + 'static> IntoFuture for Promise<T> {
    type Output = Result<T>;
    type IntoFuture = PromiseFuture<T>;

    fn into_future(self) -> Self::IntoFuture {
        PromiseFuture {
            promise: self,
            waiting: None,
        }
    }
}
