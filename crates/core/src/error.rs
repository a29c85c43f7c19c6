//! Rejection reasons.
//!
//! A rejected promise carries an [`Error`]. Reasons fan out to every
//! continuation registered on the rejected cell, so the type is cheap to
//! clone: arbitrary user errors are held behind an `Arc`.

use std::sync::Arc;
use thiserror::Error;

/// Why a promise was rejected.
///
/// Handlers that fail (by returning `Err` or by panicking) and producers that
/// call `reject` both end up here.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Rejected with a plain message
    #[error("{0}")]
    Rejected(String),

    /// A handler panicked; the panic payload rendered as text
    #[error("handler panicked: {0}")]
    Panicked(String),

    /// A handler returned the promise it was supposed to settle
    #[error("chaining cycle: a promise cannot adopt its own settlement")]
    ChainingCycle,

    /// Any other error raised by a handler or a producer
    #[error(transparent)]
    Custom(Arc<dyn std::error::Error + Send + Sync + 'static>),
}

/// Result type whose error arm is a rejection reason.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a rejection from a plain message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Error::Rejected(message.into())
    }

    /// Wrap an arbitrary error as a rejection reason.
    pub fn custom<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Custom(Arc::new(error))
    }

    /// Build a rejection from a panic payload.
    ///
    /// `&str` and `String` payloads are kept verbatim; anything else is
    /// reported as an unknown panic.
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        Error::Panicked(message)
    }

    /// The message a consumer would display for this reason.
    ///
    /// Unlike `to_string()`, a panic reason yields just the panic message.
    pub fn message(&self) -> String {
        match self {
            Error::Rejected(msg) | Error::Panicked(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    /// Borrow the wrapped error as a concrete type, if it is one.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        match self {
            Error::Custom(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Check if this reason came from a panicking handler.
    pub fn is_panic(&self) -> bool {
        matches!(self, Error::Panicked(_))
    }

    /// Check if this reason is a chaining cycle.
    pub fn is_cycle(&self) -> bool {
        matches!(self, Error::ChainingCycle)
    }
}

impl From<&str> for Error {
    fn from(message: &str) -> Self {
        Error::Rejected(message.to_string())
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Error::Rejected(message)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::custom(e)
    }
}
