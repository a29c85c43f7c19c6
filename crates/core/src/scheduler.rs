//! The scheduler seam.
//!
//! Promises never run handlers on the caller's stack. Every continuation is
//! handed to a [`Scheduler`] supplied by the host, which runs it later.
//!
//! # Contract
//!
//! - Every scheduled task eventually runs exactly once.
//! - `schedule` must not run the task before returning.
//!
//! Per-cell ordering does not depend on the scheduler preserving submission
//! order; a FIFO scheduler merely makes the global interleaving deterministic.

use std::sync::Arc;

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Host-provided executor that defers continuation execution.
pub trait Scheduler: Send + Sync {
    /// Queue `task` to run later.
    fn schedule(&self, task: Task);
}

/// A scheduler shared by every promise derived from one deferred.
pub type SharedScheduler = Arc<dyn Scheduler>;

impl<S: Scheduler + ?Sized> Scheduler for Arc<S> {
    fn schedule(&self, task: Task) {
        (**self).schedule(task)
    }
}
