//! Convenient imports for promises.
//!
//! ```ignore
//! use promises::prelude::*;
//!
//! let runtime = Runtime::manual();
//! let deferred = runtime.defer::<i32>();
//! ```

// Main entry point
pub use crate::runtime::{Runtime, RuntimeBuilder};

// Producer and consumer handles
pub use promises_engine::{Deferred, IntoOutcome, Outcome, Promise, Settlement};

// Error handling
pub use promises_core::{Error, Result, State};

// Schedulers
pub use promises_core::{Scheduler, SharedScheduler};
pub use promises_executor::{EventLoop, EventLoopOptions, ManualScheduler};
