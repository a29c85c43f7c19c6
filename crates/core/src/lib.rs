//! Core types for promises
//!
//! This crate defines the vocabulary shared by every other crate in the
//! workspace. It performs no scheduling and owns no threads.
//!
//! - [`Error`]: the rejection reason carried by a rejected promise
//! - [`State`]: the three states of a settlement cell
//! - [`Scheduler`]: the host seam through which continuations are deferred

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod scheduler;
pub mod state;

pub use error::{Error, Result};
pub use scheduler::{Scheduler, SharedScheduler, Task};
pub use state::State;
