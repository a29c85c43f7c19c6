use crate::error::RuntimeResult;
use promises_core::{Error, SharedScheduler};
use promises_engine::{Deferred, Promise};
use promises_executor::{EventLoop, EventLoopOptions, ManualScheduler};
use std::sync::Arc;
use tracing::debug;

/// Owns a scheduler and creates promises bound to it.
///
/// Every deferred created here, and every promise chained from one, runs its
/// continuations on this runtime's scheduler.
///
/// # Example
///
/// ```ignore
/// use promises::prelude::*;
///
/// let runtime = Runtime::manual();
/// let deferred = runtime.defer::<String>();
///
/// deferred
///     .promise()
///     .then(|message| Ok(message + "!!!"))
///     .then(|message| println!("{message}"));
///
/// deferred.fulfill("Hello World".to_string());
/// runtime.run_until_idle();
/// ```
///
/// # Backends
///
/// | Constructor | Scheduler | Who runs continuations |
/// |-------------|-----------|------------------------|
/// | `Runtime::manual()` | [`ManualScheduler`] | the caller, via `run_until_idle()` |
/// | `Runtime::event_loop()` | [`EventLoop`] | a background thread |
/// | `builder().scheduler(s)` | any [`Scheduler`](promises_core::Scheduler) | the host |
pub struct Runtime {
    scheduler: SharedScheduler,
    backend: Backend,
}

enum Backend {
    Manual(Arc<ManualScheduler>),
    EventLoop(Arc<EventLoop>),
    Host,
}

impl Runtime {
    /// Runtime over a fresh [`ManualScheduler`].
    pub fn manual() -> Self {
        Self::from_manual(Arc::new(ManualScheduler::new()))
    }

    /// Runtime over a fresh [`EventLoop`] with default options.
    pub fn event_loop() -> RuntimeResult<Self> {
        Self::builder().event_loop().build()
    }

    /// Create a builder for runtime configuration.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// A new pending deferred on this runtime.
    pub fn defer<T: Clone + Send + 'static>(&self) -> Deferred<T> {
        Deferred::new(Arc::clone(&self.scheduler))
    }

    /// A promise already fulfilled with `value`.
    pub fn fulfilled<T: Clone + Send + 'static>(&self, value: T) -> Promise<T> {
        Promise::fulfilled(Arc::clone(&self.scheduler), value)
    }

    /// A promise already rejected with `reason`.
    pub fn rejected<T: Clone + Send + 'static>(&self, reason: impl Into<Error>) -> Promise<T> {
        Promise::rejected(Arc::clone(&self.scheduler), reason)
    }

    /// The scheduler this runtime hands to every deferred.
    pub fn scheduler(&self) -> &SharedScheduler {
        &self.scheduler
    }

    /// The manual scheduler, if this runtime uses one.
    pub fn manual_scheduler(&self) -> Option<&Arc<ManualScheduler>> {
        match &self.backend {
            Backend::Manual(scheduler) => Some(scheduler),
            _ => None,
        }
    }

    /// Run queued continuations on the calling thread until none remain.
    ///
    /// Only a manual runtime has a queue the caller drives; other backends
    /// return 0.
    pub fn run_until_idle(&self) -> usize {
        match &self.backend {
            Backend::Manual(scheduler) => scheduler.run_until_idle(),
            _ => 0,
        }
    }

    /// Stop the backend.
    ///
    /// For an event loop this runs everything already queued and joins the
    /// worker. Manual and host schedulers have nothing to stop.
    pub fn shutdown(&self) -> RuntimeResult<()> {
        if let Backend::EventLoop(event_loop) = &self.backend {
            event_loop.shutdown()?;
            debug!("runtime event loop shut down");
        }
        Ok(())
    }

    fn from_manual(scheduler: Arc<ManualScheduler>) -> Self {
        Self {
            scheduler: scheduler.clone(),
            backend: Backend::Manual(scheduler),
        }
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backend = match &self.backend {
            Backend::Manual(_) => "manual",
            Backend::EventLoop(_) => "event_loop",
            Backend::Host => "host",
        };
        f.debug_struct("Runtime").field("backend", &backend).finish()
    }
}

enum Choice {
    Manual,
    EventLoop(EventLoopOptions),
    Host(SharedScheduler),
}

/// Builder for runtime configuration.
///
/// # Example
///
/// ```ignore
/// // Deterministic, caller-driven (tests, single-threaded hosts)
/// let runtime = Runtime::builder().manual().build()?;
///
/// // Background worker thread
/// let runtime = Runtime::builder()
///     .event_loop_with(EventLoopOptions::new().thread_name("callbacks"))
///     .build()?;
///
/// // Host-provided scheduler
/// let runtime = Runtime::builder().scheduler(host_scheduler).build()?;
/// ```
pub struct RuntimeBuilder {
    choice: Choice,
}

impl RuntimeBuilder {
    /// Create a new builder. Defaults to a manual scheduler.
    pub fn new() -> Self {
        Self {
            choice: Choice::Manual,
        }
    }

    /// Use a [`ManualScheduler`].
    pub fn manual(mut self) -> Self {
        self.choice = Choice::Manual;
        self
    }

    /// Use an [`EventLoop`] with default options.
    pub fn event_loop(self) -> Self {
        self.event_loop_with(EventLoopOptions::default())
    }

    /// Use an [`EventLoop`] with custom options.
    pub fn event_loop_with(mut self, options: EventLoopOptions) -> Self {
        self.choice = Choice::EventLoop(options);
        self
    }

    /// Use a host-provided scheduler.
    pub fn scheduler(mut self, scheduler: SharedScheduler) -> Self {
        self.choice = Choice::Host(scheduler);
        self
    }

    /// Start the runtime.
    ///
    /// Fails only if an event loop thread cannot be spawned.
    pub fn build(self) -> RuntimeResult<Runtime> {
        let runtime = match self.choice {
            Choice::Manual => Runtime::from_manual(Arc::new(ManualScheduler::new())),
            Choice::EventLoop(options) => {
                let event_loop = Arc::new(EventLoop::with_options(options)?);
                Runtime {
                    scheduler: event_loop.clone(),
                    backend: Backend::EventLoop(event_loop),
                }
            }
            Choice::Host(scheduler) => Runtime {
                scheduler,
                backend: Backend::Host,
            },
        };
        debug!(runtime = ?runtime, "runtime built");
        Ok(runtime)
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
