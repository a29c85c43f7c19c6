//! Deterministic scheduler driven by the caller

use parking_lot::Mutex;
use promises_core::{Scheduler, Task};
use std::collections::VecDeque;
use tracing::trace;

/// FIFO task queue that only runs when told to.
///
/// Nothing happens until the owner calls [`run_next`](Self::run_next) or
/// [`run_until_idle`](Self::run_until_idle), which makes every interleaving
/// reproducible. Tasks may schedule further tasks; they join the back of the
/// queue.
///
/// # Example
///
/// ```ignore
/// let scheduler = Arc::new(ManualScheduler::new());
/// let deferred = Deferred::new(scheduler.clone());
/// deferred.promise().then(|v: i32| println!("{v}"));
/// deferred.fulfill(1);
///
/// scheduler.run_until_idle(); // prints 1
/// ```
#[derive(Default)]
pub struct ManualScheduler {
    queue: Mutex<VecDeque<Task>>,
}

impl ManualScheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// Run the oldest queued task. Returns `false` if the queue was empty.
    pub fn run_next(&self) -> bool {
        // Release the lock before running: the task may schedule more work.
        let task = self.queue.lock().pop_front();
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Run tasks until the queue is empty, including tasks scheduled along
    /// the way. Returns how many ran.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        trace!(ran, "manual scheduler idle");
        ran
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, task: Task) {
        self.queue.lock().push_back(task);
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("pending", &self.pending())
            .finish()
    }
}
