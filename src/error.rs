//! Runtime lifecycle errors.
//!
//! Promise rejections are carried by [`promises_core::Error`]; this module
//! only covers starting and stopping a [`Runtime`](crate::Runtime).

use promises_executor::ExecutorError;
use thiserror::Error;

/// Errors from building or shutting down a runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The scheduler backend failed to start or stop
    #[error("scheduler error: {0}")]
    Executor(#[from] ExecutorError),
}

/// Result type for runtime lifecycle operations
pub type RuntimeResult<T> = std::result::Result<T, RuntimeError>;
