//! Settlement state of a promise.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The state of a settlement cell.
///
/// A cell starts `Pending` and moves to exactly one terminal state:
///
/// ```text
/// Pending ──fulfill──▶ Fulfilled
///    │
///    └─────reject────▶ Rejected
/// ```
///
/// Terminal states are sticky.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    /// Not yet settled
    Pending,
    /// Settled with a value
    Fulfilled,
    /// Settled with a reason
    Rejected,
}

impl State {
    /// Check if the cell is still pending.
    pub fn is_pending(&self) -> bool {
        matches!(self, State::Pending)
    }

    /// Check if the cell reached a terminal state.
    pub fn is_settled(&self) -> bool {
        !self.is_pending()
    }

    /// Whether moving from `self` to `next` is a legal transition.
    ///
    /// Only `Pending → Fulfilled` and `Pending → Rejected` are legal.
    pub fn can_transition_to(&self, next: State) -> bool {
        matches!(
            (self, next),
            (State::Pending, State::Fulfilled) | (State::Pending, State::Rejected)
        )
    }

    /// Lowercase name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            State::Pending => "pending",
            State::Fulfilled => "fulfilled",
            State::Rejected => "rejected",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
