//! Promise: the consumer handle
//!
//! A [`Promise`] is a cheap, cloneable, read-only view over a settlement
//! cell. It never settles the cell; it only inspects it and chains new
//! promises off it.
//!
//! ## Chaining
//!
//! | Method | Parent fulfilled(v) | Parent rejected(r) |
//! |--------|---------------------|--------------------|
//! | `then(f)` | `f(v)` | passes `r` through |
//! | `then_or(f, g)` | `f(v)` | `g(r)` |
//! | `fail(g)` | passes `v` through | `g(r)` |
//! | `fin(h)` | `h()`, then passes `v` | `h()`, then passes `r` |
//!
//! Every method returns immediately with a new pending promise. Handlers
//! run later on the scheduler the parent was created with.
//!
//! # Example
//!
//! ```ignore
//! let deferred = Deferred::new(scheduler.clone());
//!
//! deferred
//!     .promise()
//!     .then(|message: String| Ok(message + "!!!"))
//!     .then(|message| assert_eq!(message, "Hello World!!!"))
//!     .fail(|reason| eprintln!("failed: {reason}"));
//!
//! deferred.fulfill("Hello World".to_string());
//! ```

use crate::cell::{Cell, Settlement};
use crate::continuation::Continuation;
use crate::outcome::IntoOutcome;
use crate::wait::Latch;
use promises_core::{Error, Result, SharedScheduler, State};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Shared consumer view over a settlement cell.
pub struct Promise<T> {
    pub(crate) cell: Arc<Cell<T>>,
}

impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> Promise<T> {
    pub(crate) fn from_cell(cell: Arc<Cell<T>>) -> Self {
        Self { cell }
    }

    /// Current state of the underlying cell.
    pub fn state(&self) -> State {
        self.cell.state()
    }

    /// Check if the promise is still pending.
    pub fn is_pending(&self) -> bool {
        self.state() == State::Pending
    }

    /// Check if the promise was fulfilled.
    pub fn is_fulfilled(&self) -> bool {
        self.state() == State::Fulfilled
    }

    /// Check if the promise was rejected.
    pub fn is_rejected(&self) -> bool {
        self.state() == State::Rejected
    }

    /// The scheduler every promise chained from this one will use.
    pub fn scheduler(&self) -> &SharedScheduler {
        self.cell.scheduler()
    }

    /// Number of continuations queued on the cell and not yet run.
    pub fn queued(&self) -> usize {
        self.cell.queued()
    }

    /// Whether two handles view the same cell.
    pub fn ptr_eq(&self, other: &Promise<T>) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<T: Clone + Send + 'static> Promise<T> {
    /// A promise that is already fulfilled with `value`.
    pub fn fulfilled(scheduler: SharedScheduler, value: T) -> Self {
        let cell = Cell::pending(scheduler);
        cell.settle(Settlement::Fulfilled(value));
        Self::from_cell(cell)
    }

    /// A promise that is already rejected with `reason`.
    pub fn rejected(scheduler: SharedScheduler, reason: impl Into<Error>) -> Self {
        let cell = Cell::pending(scheduler);
        cell.settle(Settlement::Rejected(reason.into()));
        Self::from_cell(cell)
    }

    /// The fulfilled value, if the promise has been fulfilled.
    pub fn value(&self) -> Option<T> {
        match self.cell.settlement()? {
            Settlement::Fulfilled(value) => Some(value),
            Settlement::Rejected(_) => None,
        }
    }

    /// The rejection reason, if the promise has been rejected.
    pub fn reason(&self) -> Option<Error> {
        match self.cell.settlement()? {
            Settlement::Fulfilled(_) => None,
            Settlement::Rejected(reason) => Some(reason),
        }
    }

    /// The terminal outcome, if the promise has settled.
    pub fn settlement(&self) -> Option<Settlement<T>> {
        self.cell.settlement()
    }

    /// Chain a success handler.
    ///
    /// A rejection skips `on_fulfilled` and rejects the returned promise with
    /// the same reason.
    pub fn then<U, R, F>(&self, on_fulfilled: F) -> Promise<U>
    where
        U: Clone + Send + 'static,
        R: IntoOutcome<U>,
        F: FnOnce(T) -> R + Send + 'static,
    {
        let dependent = self.dependent::<U>();
        self.cell.register(Box::new(Continuation::new(
            Box::new(move |value| on_fulfilled(value).into_outcome()),
            None,
            Arc::clone(&dependent),
        )));
        Promise::from_cell(dependent)
    }

    /// Chain a success handler and a failure handler on one continuation.
    ///
    /// Exactly one of them runs. Both must produce the same value type.
    pub fn then_or<U, R, F, S, G>(&self, on_fulfilled: F, on_rejected: G) -> Promise<U>
    where
        U: Clone + Send + 'static,
        R: IntoOutcome<U>,
        F: FnOnce(T) -> R + Send + 'static,
        S: IntoOutcome<U>,
        G: FnOnce(Error) -> S + Send + 'static,
    {
        let dependent = self.dependent::<U>();
        self.cell.register(Box::new(Continuation::new(
            Box::new(move |value| on_fulfilled(value).into_outcome()),
            Some(Box::new(move |reason| on_rejected(reason).into_outcome())),
            Arc::clone(&dependent),
        )));
        Promise::from_cell(dependent)
    }

    /// Chain a failure handler.
    ///
    /// A fulfillment skips `on_rejected` and fulfills the returned promise
    /// with the same value. The handler may recover by producing a value of
    /// the same type.
    pub fn fail<R, G>(&self, on_rejected: G) -> Promise<T>
    where
        R: IntoOutcome<T>,
        G: FnOnce(Error) -> R + Send + 'static,
    {
        let dependent = self.dependent::<T>();
        self.cell.register(Box::new(Continuation::recover(
            Box::new(move |reason| on_rejected(reason).into_outcome()),
            Arc::clone(&dependent),
        )));
        Promise::from_cell(dependent)
    }

    /// Chain a handler that runs on either outcome.
    ///
    /// The returned promise settles exactly like this one once `on_settled`
    /// has completed. If `on_settled` fails, its error rejects the returned
    /// promise instead. If it returns a promise, settlement waits for it.
    pub fn fin<R, H>(&self, on_settled: H) -> Promise<T>
    where
        R: IntoOutcome<()>,
        H: FnOnce() -> R + Send + 'static,
    {
        let dependent = self.dependent::<T>();
        self.cell.register(Box::new(Continuation::finally(
            Box::new(move || on_settled().into_outcome()),
            Arc::clone(&dependent),
        )));
        Promise::from_cell(dependent)
    }

    /// Drop the value, keeping only completion.
    pub fn discard(&self) -> Promise<()> {
        self.then(|_| ())
    }

    /// Block the calling thread until the promise settles.
    ///
    /// The scheduler must make progress on another thread; waiting on the
    /// same thread that drives a manual scheduler never returns.
    pub fn wait(&self) -> Result<T> {
        match self.settlement() {
            Some(settlement) => settlement.into_result(),
            None => Latch::attach(&self.cell).wait(),
        }
    }

    /// Block for at most `timeout`. Returns `None` if still pending.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<T>> {
        match self.settlement() {
            Some(settlement) => Some(settlement.into_result()),
            None => Latch::attach(&self.cell).wait_for(timeout),
        }
    }

    fn dependent<U: Clone + Send + 'static>(&self) -> Arc<Cell<U>> {
        Cell::pending(Arc::clone(self.cell.scheduler()))
    }
}

impl<T> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("state", &self.state())
            .field("queued", &self.queued())
            .finish()
    }
}
