//! Promise engine
//!
//! This crate implements the promise state machine:
//! - Settlement cells: pending until settled exactly once
//! - Continuation registry: FIFO queue of reactions per cell
//! - Resolution propagation: handler outcomes settle dependent cells,
//!   flattening returned promises and converting errors and panics into
//!   rejections
//! - [`Deferred`] (producer) and [`Promise`] (consumer) handles
//!
//! Handlers never run inline. Every reaction is handed to the
//! [`Scheduler`](promises_core::Scheduler) the cell was created with.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod cell;
mod continuation;
pub mod deferred;
pub mod outcome;
pub mod promise;
mod registry;
mod wait;

pub use cell::Settlement;
pub use deferred::Deferred;
pub use outcome::{IntoOutcome, Outcome};
pub use promise::Promise;
pub use wait::PromiseFuture;

// Re-export the core types handlers and hosts need
pub use promises_core::{Error, Result, Scheduler, SharedScheduler, State, Task};
