//! Settlement cell
//!
//! The single mutable state behind one Deferred and every Promise view of it.
//!
//! ## State Machine
//!
//! ```text
//! Pending ──settle(Fulfilled)──▶ Fulfilled(value)
//!    │
//!    └─────settle(Rejected)────▶ Rejected(reason)
//! ```
//!
//! The first settlement wins. Later calls leave the cell untouched and
//! return `false`.
//!
//! ## Draining
//!
//! Reactions never run on the caller's stack. Once a cell is settled and has
//! queued reactions, exactly one drain task is handed to the scheduler. The
//! drain task pops reactions in registration order and runs them one at a
//! time without holding the cell lock. Reactions registered while a drain is
//! in flight join the same queue, so per-cell order is registration order no
//! matter which thread registers or how the scheduler orders tasks.

use crate::registry::ContinuationRegistry;
use crate::wait::Latch;
use parking_lot::Mutex;
use promises_core::{Error, Result, SharedScheduler, State};
use std::sync::{Arc, Weak};
use tracing::{debug, trace};

/// Terminal outcome of a settlement cell.
#[derive(Debug, Clone)]
pub enum Settlement<T> {
    /// Settled with a value
    Fulfilled(T),
    /// Settled with a reason
    Rejected(Error),
}

impl<T> Settlement<T> {
    /// The terminal state this settlement represents.
    pub fn state(&self) -> State {
        match self {
            Settlement::Fulfilled(_) => State::Fulfilled,
            Settlement::Rejected(_) => State::Rejected,
        }
    }

    /// Borrow the value, if fulfilled.
    pub fn value(&self) -> Option<&T> {
        match self {
            Settlement::Fulfilled(value) => Some(value),
            Settlement::Rejected(_) => None,
        }
    }

    /// Borrow the reason, if rejected.
    pub fn reason(&self) -> Option<&Error> {
        match self {
            Settlement::Fulfilled(_) => None,
            Settlement::Rejected(reason) => Some(reason),
        }
    }

    /// Convert into a `Result`.
    pub fn into_result(self) -> Result<T> {
        match self {
            Settlement::Fulfilled(value) => Ok(value),
            Settlement::Rejected(reason) => Err(reason),
        }
    }
}

impl<T> From<Result<T>> for Settlement<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Settlement::Fulfilled(value),
            Err(reason) => Settlement::Rejected(reason),
        }
    }
}

/// Something waiting on a cell's settlement.
///
/// Consumed exactly once, on the scheduler, after the cell settles.
pub(crate) trait Reaction<T>: Send {
    fn react(self: Box<Self>, settlement: Settlement<T>);
}

struct Slot<T> {
    settlement: Option<Settlement<T>>,
    registry: ContinuationRegistry<T>,
    /// A drain task is scheduled or running
    draining: bool,
    /// Latch shared by threads blocked on this cell
    observer: Option<Weak<Latch<T>>>,
}

impl<T> Slot<T> {
    /// Claim the right to schedule a drain task.
    ///
    /// Succeeds only for a settled cell with queued reactions and no drain
    /// already in flight.
    fn claim_drain(&mut self) -> bool {
        if self.draining || self.settlement.is_none() || self.registry.is_empty() {
            return false;
        }
        self.draining = true;
        true
    }
}

/// One asynchronous computation's state plus its waiting reactions.
///
/// Guarded by a single lock scoped to this cell; there is no global lock.
pub(crate) struct Cell<T> {
    slot: Mutex<Slot<T>>,
    scheduler: SharedScheduler,
}

impl<T> Cell<T> {
    pub(crate) fn scheduler(&self) -> &SharedScheduler {
        &self.scheduler
    }

    pub(crate) fn state(&self) -> State {
        match &self.slot.lock().settlement {
            None => State::Pending,
            Some(settlement) => settlement.state(),
        }
    }

    /// Number of reactions not yet run.
    pub(crate) fn queued(&self) -> usize {
        self.slot.lock().registry.len()
    }
}

impl<T: Clone + Send + 'static> Cell<T> {
    /// Create a pending cell whose reactions run on `scheduler`.
    pub(crate) fn pending(scheduler: SharedScheduler) -> Arc<Self> {
        Arc::new(Self {
            slot: Mutex::new(Slot {
                settlement: None,
                registry: ContinuationRegistry::new(),
                draining: false,
                observer: None,
            }),
            scheduler,
        })
    }

    /// Snapshot of the terminal outcome, if any.
    pub(crate) fn settlement(&self) -> Option<Settlement<T>> {
        self.slot.lock().settlement.clone()
    }

    /// The live latch for blocked threads, creating one if none exists.
    ///
    /// The flag is `true` when the latch is new and still needs a reaction
    /// registered to release it.
    pub(crate) fn observer(&self) -> (Arc<Latch<T>>, bool) {
        let mut slot = self.slot.lock();
        if let Some(latch) = slot.observer.as_ref().and_then(Weak::upgrade) {
            return (latch, false);
        }
        let latch = Arc::new(Latch::new());
        slot.observer = Some(Arc::downgrade(&latch));
        (latch, true)
    }

    /// Move a pending cell to its terminal state.
    ///
    /// Returns `false` without touching the cell if it was already settled.
    pub(crate) fn settle(self: &Arc<Self>, settlement: Settlement<T>) -> bool {
        let schedule = {
            let mut slot = self.slot.lock();
            let current = slot
                .settlement
                .as_ref()
                .map_or(State::Pending, Settlement::state);
            let state = settlement.state();
            if !current.can_transition_to(state) {
                debug!(
                    state = %current,
                    attempted = %state,
                    "ignoring settlement of an already settled cell"
                );
                return false;
            }

            let waiting = slot.registry.len();
            if state == State::Rejected && waiting == 0 {
                debug!("cell rejected with no continuation registered");
            }
            trace!(state = %state, waiting, "cell settled");

            slot.settlement = Some(settlement);
            slot.claim_drain()
        };

        if schedule {
            self.schedule_drain();
        }
        true
    }

    /// Queue a reaction.
    ///
    /// On a settled cell this schedules a drain instead of running the
    /// reaction, so the reaction never fires before this call returns.
    pub(crate) fn register(self: &Arc<Self>, reaction: Box<dyn Reaction<T>>) {
        let schedule = {
            let mut slot = self.slot.lock();
            slot.registry.push(reaction);
            slot.claim_drain()
        };

        if schedule {
            self.schedule_drain();
        }
    }

    fn schedule_drain(self: &Arc<Self>) {
        let cell = Arc::clone(self);
        self.scheduler.schedule(Box::new(move || cell.drain()));
    }

    fn drain(&self) {
        trace!("draining cell");
        loop {
            let (reaction, settlement) = {
                let mut slot = self.slot.lock();
                let settlement = match &slot.settlement {
                    Some(settlement) => settlement.clone(),
                    None => {
                        slot.draining = false;
                        return;
                    }
                };
                match slot.registry.pop() {
                    Some(reaction) => (reaction, settlement),
                    None => {
                        slot.draining = false;
                        return;
                    }
                }
            };
            reaction.react(settlement);
        }
    }
}

/// Whether two cells, possibly of different value types, are the same cell.
pub(crate) fn same_cell<A, B>(a: &Arc<Cell<A>>, b: &Arc<Cell<B>>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}
