//! Resolution propagator
//!
//! A [`Continuation`] ties up to three handlers on a parent cell to exactly
//! one dependent cell, and computes the dependent's settlement when the
//! parent settles:
//!
//! 1. Parent fulfilled: run the success handler. `fail` and `fin` install
//!    an identity success handler, which is how fulfillment passes by them.
//! 2. Parent rejected: run the failure handler, or pass the reason through
//!    unchanged when there is none.
//! 3. A handler that returns `Err` or panics rejects the dependent.
//! 4. A handler that returns a promise makes the dependent adopt that
//!    promise's settlement, at any depth.
//! 5. A finally handler runs first, then steps 1-2 pass the original
//!    settlement through. If it fails, its error wins. If it returns a
//!    promise, pass-through waits for that promise.

use crate::cell::{same_cell, Cell, Reaction, Settlement};
use crate::outcome::Outcome;
use promises_core::Error;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::warn;

pub(crate) type OnFulfilled<T, U> = Box<dyn FnOnce(T) -> Outcome<U> + Send + 'static>;
pub(crate) type OnRejected<U> = Box<dyn FnOnce(Error) -> Outcome<U> + Send + 'static>;
pub(crate) type OnSettled = Box<dyn FnOnce() -> Outcome<()> + Send + 'static>;

/// Handlers registered by one `then`/`fail`/`fin` call plus the cell they
/// settle.
pub(crate) struct Continuation<T, U> {
    on_fulfilled: OnFulfilled<T, U>,
    on_rejected: Option<OnRejected<U>>,
    on_settled: Option<OnSettled>,
    dependent: Arc<Cell<U>>,
}

impl<T, U> Continuation<T, U> {
    pub(crate) fn new(
        on_fulfilled: OnFulfilled<T, U>,
        on_rejected: Option<OnRejected<U>>,
        dependent: Arc<Cell<U>>,
    ) -> Self {
        Self {
            on_fulfilled,
            on_rejected,
            on_settled: None,
            dependent,
        }
    }
}

impl<T: Send + 'static> Continuation<T, T> {
    /// Fulfillment passes through; rejection goes to `on_rejected`.
    pub(crate) fn recover(on_rejected: OnRejected<T>, dependent: Arc<Cell<T>>) -> Self {
        Self::new(Box::new(Outcome::<T>::Value), Some(on_rejected), dependent)
    }

    /// Both outcomes pass through after `on_settled` has run.
    pub(crate) fn finally(on_settled: OnSettled, dependent: Arc<Cell<T>>) -> Self {
        Self {
            on_fulfilled: Box::new(Outcome::<T>::Value),
            on_rejected: None,
            on_settled: Some(on_settled),
            dependent,
        }
    }
}

impl<T, U> Reaction<T> for Continuation<T, U>
where
    T: Clone + Send + 'static,
    U: Clone + Send + 'static,
{
    fn react(self: Box<Self>, settlement: Settlement<T>) {
        let Continuation {
            on_fulfilled,
            on_rejected,
            on_settled,
            dependent,
        } = *self;

        let pass_through = PassThrough {
            settlement,
            on_fulfilled,
            on_rejected,
            dependent,
        };

        let on_settled = match on_settled {
            Some(handler) => handler,
            None => return pass_through.run(),
        };

        match guarded(move |()| on_settled(), ()) {
            Outcome::Value(()) => pass_through.run(),
            Outcome::Error(reason) => {
                pass_through.dependent.settle(Settlement::Rejected(reason));
            }
            Outcome::Promise(gate) => {
                if same_cell(&gate.cell, &pass_through.dependent) {
                    pass_through
                        .dependent
                        .settle(Settlement::Rejected(Error::ChainingCycle));
                } else {
                    gate.cell.register(Box::new(pass_through));
                }
            }
        }
    }
}

/// Rules 1-3 applied to a parent settlement, possibly after waiting on a
/// promise returned by a finally handler.
struct PassThrough<T, U> {
    settlement: Settlement<T>,
    on_fulfilled: OnFulfilled<T, U>,
    on_rejected: Option<OnRejected<U>>,
    dependent: Arc<Cell<U>>,
}

impl<T, U> PassThrough<T, U>
where
    T: Clone + Send + 'static,
    U: Clone + Send + 'static,
{
    fn run(self) {
        let outcome = match self.settlement {
            Settlement::Fulfilled(value) => guarded(self.on_fulfilled, value),
            Settlement::Rejected(reason) => match self.on_rejected {
                Some(handler) => guarded(handler, reason),
                None => Outcome::Error(reason),
            },
        };
        resolve(&self.dependent, outcome);
    }
}

/// Waiting on the promise a finally handler returned.
impl<T, U> Reaction<()> for PassThrough<T, U>
where
    T: Clone + Send + 'static,
    U: Clone + Send + 'static,
{
    fn react(self: Box<Self>, gate: Settlement<()>) {
        match gate {
            Settlement::Fulfilled(()) => self.run(),
            Settlement::Rejected(reason) => {
                self.dependent.settle(Settlement::Rejected(reason));
            }
        }
    }
}

/// Settles a dependent cell with whatever another cell settles to.
pub(crate) struct Adoption<T> {
    dependent: Arc<Cell<T>>,
}

impl<T> Adoption<T> {
    pub(crate) fn new(dependent: Arc<Cell<T>>) -> Self {
        Self { dependent }
    }
}

impl<T: Clone + Send + 'static> Reaction<T> for Adoption<T> {
    fn react(self: Box<Self>, settlement: Settlement<T>) {
        self.dependent.settle(settlement);
    }
}

/// Settle `dependent` from a handler outcome, flattening nested promises.
pub(crate) fn resolve<T: Clone + Send + 'static>(dependent: &Arc<Cell<T>>, outcome: Outcome<T>) {
    match outcome {
        Outcome::Value(value) => {
            dependent.settle(Settlement::Fulfilled(value));
        }
        Outcome::Error(reason) => {
            dependent.settle(Settlement::Rejected(reason));
        }
        Outcome::Promise(inner) => {
            if same_cell(&inner.cell, dependent) {
                dependent.settle(Settlement::Rejected(Error::ChainingCycle));
            } else {
                inner
                    .cell
                    .register(Box::new(Adoption::new(Arc::clone(dependent))));
            }
        }
    }
}

/// Invoke a handler, turning a panic into a rejection.
fn guarded<A, U>(handler: impl FnOnce(A) -> Outcome<U>, arg: A) -> Outcome<U> {
    match catch_unwind(AssertUnwindSafe(move || handler(arg))) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let reason = Error::from_panic(&*payload);
            warn!(reason = %reason, "handler panicked; rejecting dependent promise");
            Outcome::Error(reason)
        }
    }
}
