//! Deferred: the producer handle
//!
//! Holds the settlement rights over one cell. Settling twice is tolerated:
//! the first call wins and later calls return `false`.

use crate::cell::{same_cell, Cell, Settlement};
use crate::continuation::Adoption;
use crate::promise::Promise;
use promises_core::{Error, SharedScheduler};
use std::fmt;
use std::sync::Arc;

/// Producer side of a promise.
///
/// Created by the code performing the asynchronous work. Hand out
/// [`Deferred::promise`] to consumers and keep the `Deferred` to settle it.
pub struct Deferred<T> {
    cell: Arc<Cell<T>>,
}

impl<T: Clone + Send + 'static> Deferred<T> {
    /// Create a deferred over a fresh pending cell.
    ///
    /// Every continuation on this deferred's promise, and on any promise
    /// chained from it, runs on `scheduler`.
    pub fn new(scheduler: SharedScheduler) -> Self {
        Self {
            cell: Cell::pending(scheduler),
        }
    }

    /// A consumer view of this deferred's cell.
    pub fn promise(&self) -> Promise<T> {
        Promise::from_cell(Arc::clone(&self.cell))
    }

    /// Fulfill with `value`. Returns `false` if already settled.
    pub fn fulfill(&self, value: T) -> bool {
        self.cell.settle(Settlement::Fulfilled(value))
    }

    /// Reject with `reason`. Returns `false` if already settled.
    ///
    /// Plain strings are accepted and become [`Error::Rejected`].
    pub fn reject(&self, reason: impl Into<Error>) -> bool {
        self.cell.settle(Settlement::Rejected(reason.into()))
    }

    /// Settle from a `Settlement` or a `Result`.
    pub fn settle(&self, settlement: impl Into<Settlement<T>>) -> bool {
        self.cell.settle(settlement.into())
    }

    /// Settle with whatever `other` eventually settles to.
    ///
    /// Direct settlement before `other` settles still wins. Following this
    /// deferred's own promise rejects it with [`Error::ChainingCycle`].
    pub fn follow(&self, other: &Promise<T>) {
        if same_cell(&self.cell, &other.cell) {
            self.cell.settle(Settlement::Rejected(Error::ChainingCycle));
            return;
        }
        other
            .cell
            .register(Box::new(Adoption::new(Arc::clone(&self.cell))));
    }

    /// Whether the cell has left the pending state.
    pub fn is_settled(&self) -> bool {
        self.cell.state().is_settled()
    }
}

impl<T> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("state", &self.cell.state())
            .finish()
    }
}
