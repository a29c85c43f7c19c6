//! Handler outcomes
//!
//! A handler may produce a plain value, a promise whose settlement should be
//! adopted, or an error. [`Outcome`] tags which one it was; [`IntoOutcome`]
//! lets handlers return whatever is most natural:
//!
//! | Handler returns | Outcome |
//! |-----------------|---------|
//! | `Ok(value)` | `Value(value)` |
//! | `Err(reason)` | `Error(reason)` |
//! | `Promise<T>` | `Promise(promise)` |
//! | `()` | `Value(())` |
//! | `Outcome<T>` | itself |

use crate::promise::Promise;
use promises_core::{Error, Result};

/// What a handler produced.
#[derive(Debug)]
pub enum Outcome<T> {
    /// Fulfill the dependent promise with this value
    Value(T),
    /// Adopt this promise's eventual settlement
    Promise(Promise<T>),
    /// Reject the dependent promise with this reason
    Error(Error),
}

impl<T> Outcome<T> {
    /// Lift a `Result` into an outcome.
    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(value) => Outcome::Value(value),
            Err(reason) => Outcome::Error(reason),
        }
    }

    /// Reject with a reason convertible into [`Error`].
    pub fn reject(reason: impl Into<Error>) -> Self {
        Outcome::Error(reason.into())
    }
}

/// Conversion from a handler's return value into an [`Outcome`].
pub trait IntoOutcome<T> {
    /// Perform the conversion.
    fn into_outcome(self) -> Outcome<T>;
}

impl<T> IntoOutcome<T> for Outcome<T> {
    fn into_outcome(self) -> Outcome<T> {
        self
    }
}

impl<T> IntoOutcome<T> for Promise<T> {
    fn into_outcome(self) -> Outcome<T> {
        Outcome::Promise(self)
    }
}

impl<T> IntoOutcome<T> for Result<T> {
    fn into_outcome(self) -> Outcome<T> {
        Outcome::from_result(self)
    }
}

impl IntoOutcome<()> for () {
    fn into_outcome(self) -> Outcome<()> {
        Outcome::Value(())
    }
}
