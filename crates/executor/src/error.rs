//! Error types for the reference schedulers

use thiserror::Error;

/// Errors raised while starting or stopping an event loop.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// The worker thread could not be spawned
    #[error("failed to spawn event loop thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// The worker thread terminated abnormally
    #[error("event loop thread '{0}' panicked")]
    ShutDown(String),
}

impl ExecutorError {
    /// Check if this is a spawn failure
    pub fn is_spawn(&self) -> bool {
        matches!(self, ExecutorError::Spawn(_))
    }
}

/// Result type for scheduler lifecycle operations
pub type Result<T> = std::result::Result<T, ExecutorError>;
