//! Background event loop
//!
//! One worker thread draining a FIFO task queue. Any thread may submit work
//! through an [`EventLoopHandle`]; tasks run one at a time, in submission
//! order, on the worker.
//!
//! ## Shutdown
//!
//! [`EventLoop::shutdown`] closes the queue to other threads, lets the worker
//! finish everything already queued (plus anything those tasks schedule from
//! the worker itself, so in-flight promise chains complete), then joins it.
//! Tasks submitted from other threads after shutdown are dropped with a
//! warning.

use crate::error::{ExecutorError, Result};
use parking_lot::{Condvar, Mutex};
use promises_core::{Error, Scheduler, Task};
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle, ThreadId};
use tracing::{debug, error, warn};

/// Configuration for an [`EventLoop`].
///
/// ```ignore
/// let options = EventLoopOptions::new()
///     .thread_name("io-callbacks")
///     .max_batch(16);
/// let event_loop = EventLoop::with_options(options)?;
/// ```
#[derive(Debug, Clone)]
pub struct EventLoopOptions {
    /// Name of the worker thread
    pub thread_name: String,
    /// Queue capacity reserved up front
    pub initial_capacity: usize,
    /// Most tasks taken from the queue per lock acquisition
    pub max_batch: usize,
}

impl EventLoopOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the worker thread name.
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Reserve queue capacity up front.
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Limit how many tasks the worker takes per batch. Zero is treated as one.
    pub fn max_batch(mut self, max_batch: usize) -> Self {
        self.max_batch = max_batch;
        self
    }
}

impl Default for EventLoopOptions {
    fn default() -> Self {
        Self {
            thread_name: "promises-event-loop".to_string(),
            initial_capacity: 64,
            max_batch: 64,
        }
    }
}

struct Queue {
    tasks: VecDeque<Task>,
    open: bool,
}

struct Shared {
    queue: Mutex<Queue>,
    available: Condvar,
    worker: OnceLock<ThreadId>,
    max_batch: usize,
}

impl Shared {
    fn on_worker(&self) -> bool {
        self.worker.get() == Some(&thread::current().id())
    }

    fn submit(&self, task: Task) {
        let mut queue = self.queue.lock();
        if !queue.open && !self.on_worker() {
            warn!(queued = queue.tasks.len(), "event loop shut down; dropping task");
            return;
        }
        queue.tasks.push_back(task);
        drop(queue);
        self.available.notify_one();
    }

    /// Next batch of tasks, or `None` once closed and empty.
    fn next_batch(&self) -> Option<Vec<Task>> {
        let mut queue = self.queue.lock();
        while queue.tasks.is_empty() && queue.open {
            self.available.wait(&mut queue);
        }
        if queue.tasks.is_empty() {
            return None;
        }
        let take = queue.tasks.len().min(self.max_batch);
        Some(queue.tasks.drain(..take).collect())
    }

    fn run(&self) {
        let _ = self.worker.set(thread::current().id());
        while let Some(batch) = self.next_batch() {
            for task in batch {
                if let Err(payload) = catch_unwind(AssertUnwindSafe(task)) {
                    let reason = Error::from_panic(&*payload);
                    error!(panic = %reason.message(), "task panicked on event loop");
                }
            }
        }
        debug!("event loop drained; worker exiting");
    }
}

/// A single-threaded background scheduler.
///
/// Dropping the loop shuts it down.
pub struct EventLoop {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
    thread_name: String,
}

impl EventLoop {
    /// Start a loop with default options.
    pub fn new() -> Result<Self> {
        Self::with_options(EventLoopOptions::default())
    }

    /// Start a loop with the given options.
    pub fn with_options(options: EventLoopOptions) -> Result<Self> {
        let shared = Arc::new(Shared {
            queue: Mutex::new(Queue {
                tasks: VecDeque::with_capacity(options.initial_capacity),
                open: true,
            }),
            available: Condvar::new(),
            worker: OnceLock::new(),
            max_batch: options.max_batch.max(1),
        });

        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name(options.thread_name.clone())
            .spawn(move || worker_shared.run())?;

        debug!(thread = %options.thread_name, "event loop started");
        Ok(Self {
            shared,
            worker: Mutex::new(Some(worker)),
            thread_name: options.thread_name,
        })
    }

    /// A cloneable scheduler that submits to this loop.
    pub fn handle(&self) -> EventLoopHandle {
        EventLoopHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.shared.queue.lock().tasks.len()
    }

    /// Whether the loop still accepts tasks from other threads.
    pub fn is_running(&self) -> bool {
        self.shared.queue.lock().open
    }

    /// Stop accepting tasks, run what is queued, and join the worker.
    ///
    /// Idempotent. Called from a task on the loop itself, this only closes
    /// the queue; the worker exits once drained.
    pub fn shutdown(&self) -> Result<()> {
        self.shared.queue.lock().open = false;
        self.shared.available.notify_all();

        if self.shared.on_worker() {
            return Ok(());
        }
        let worker = self.worker.lock().take();
        match worker {
            Some(worker) => worker
                .join()
                .map_err(|_| ExecutorError::ShutDown(self.thread_name.clone())),
            None => Ok(()),
        }
    }
}

impl Scheduler for EventLoop {
    fn schedule(&self, task: Task) {
        self.shared.submit(task);
    }
}

impl Drop for EventLoop {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            error!(error = %e, "event loop did not shut down cleanly");
        }
    }
}

impl std::fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLoop")
            .field("thread_name", &self.thread_name)
            .field("pending", &self.pending())
            .field("running", &self.is_running())
            .finish()
    }
}

/// Submits tasks to an [`EventLoop`].
///
/// Outlives the loop safely: once the loop is shut down, submissions are
/// dropped with a warning.
#[derive(Clone)]
pub struct EventLoopHandle {
    shared: Arc<Shared>,
}

impl Scheduler for EventLoopHandle {
    fn schedule(&self, task: Task) {
        self.shared.submit(task);
    }
}

impl std::fmt::Debug for EventLoopHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLoopHandle").finish_non_exhaustive()
    }
}
