//! Continuation registry
//!
//! FIFO queue of reactions waiting on one settlement cell. No priority and
//! no deduplication: a reaction registered twice runs twice.

use crate::cell::Reaction;
use std::collections::VecDeque;

/// Ordered reactions awaiting (or being drained from) one cell.
pub(crate) struct ContinuationRegistry<T> {
    queue: VecDeque<Box<dyn Reaction<T>>>,
}

impl<T> ContinuationRegistry<T> {
    pub(crate) fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Append behind every reaction registered so far.
    pub(crate) fn push(&mut self, reaction: Box<dyn Reaction<T>>) {
        self.queue.push_back(reaction);
    }

    /// Take the oldest reaction.
    pub(crate) fn pop(&mut self) -> Option<Box<dyn Reaction<T>>> {
        self.queue.pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.queue.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
