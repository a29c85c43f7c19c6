//! Reference schedulers for promises
//!
//! - [`ManualScheduler`]: FIFO queue drained explicitly by its owner;
//!   deterministic, for tests and hosts that own their loop
//! - [`EventLoop`]: one background worker thread draining a FIFO queue
//!
//! Both implement [`promises_core::Scheduler`]. Hosts with their own loop
//! implement the trait directly instead.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod event_loop;
pub mod manual;

pub use error::{ExecutorError, Result};
pub use event_loop::{EventLoop, EventLoopHandle, EventLoopOptions};
pub use manual::ManualScheduler;
