//! # Promises
//!
//! A deferred/promise primitive: a producer settles a value or failure
//! exactly once, and any number of consumers chain continuations before or
//! after that happens.
//!
//! ## Quick Start
//!
//! ```ignore
//! use promises::prelude::*;
//!
//! let runtime = Runtime::manual();
//! let deferred = runtime.defer::<String>();
//!
//! deferred
//!     .promise()
//!     .then(|message| Ok(message + "!!!"))
//!     .then(|message| assert_eq!(message, "Hello World!!!"))
//!     .fail(|reason| eprintln!("failed: {reason}"))
//!     .fin(|| println!("done"));
//!
//! deferred.fulfill("Hello World".to_string());
//! runtime.run_until_idle();
//! ```
//!
//! ## Guarantees
//!
//! - A cell settles at most once; later `fulfill`/`reject` calls return `false`
//! - Handlers never run on the stack that registered them or settled the cell
//! - Continuations on one promise run in registration order
//! - A handler returning a promise is flattened: the chained promise adopts
//!   its settlement
//! - A handler returning `Err` or panicking rejects the chained promise
//!
//! ## Crates
//!
//! - [`promises_core`] - rejection reason, state, and the `Scheduler` seam
//! - [`promises_engine`] - settlement cells, propagation, `Deferred`/`Promise`
//! - [`promises_executor`] - `ManualScheduler` and `EventLoop`

#![warn(missing_docs)]

mod error;
mod runtime;

pub mod prelude;

// Re-export main entry points
pub use error::{RuntimeError, RuntimeResult};
pub use runtime::{Runtime, RuntimeBuilder};

// Re-export the promise surface
pub use promises_core::{Error, Result, Scheduler, SharedScheduler, State, Task};
pub use promises_engine::{Deferred, IntoOutcome, Outcome, Promise, PromiseFuture, Settlement};
pub use promises_executor::{
    EventLoop, EventLoopHandle, EventLoopOptions, ExecutorError, ManualScheduler,
};
