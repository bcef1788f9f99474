use std::collections::VecDeque;
use std::fmt;

use itertools::Itertools;

/// A first-in first-out queue.
///
/// `push` appends at the tail and `pop` removes from the head, both in O(1). Membership is a
/// linear scan, which is fine for the handful of blocks a simulated heap has. `iter` walks the
/// pending values from head to tail without disturbing them, so a frame can show what is queued.
#[derive(Clone, PartialEq, Eq)]
pub struct Queue<T> {
    items: VecDeque<T>,
}

impl<T> Queue<T> {
    pub const fn new() -> Self {
        Queue {
            items: VecDeque::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Append a value at the tail.
    pub fn push(&mut self, value: T) {
        self.items.push_back(value);
    }

    /// Look at the head without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.items.front()
    }

    /// Remove and return the head.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Pending values in insertion order, head first.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: PartialEq> Queue<T> {
    pub fn contains(&self, value: &T) -> bool {
        self.items.iter().any(|v| v == value)
    }

    /// Push `value` unless it is already queued. Returns whether it was pushed.
    pub fn push_unique(&mut self, value: T) -> bool {
        if self.contains(&value) {
            return false;
        }
        self.push(value);
        true
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Display> fmt::Display for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}]", self.items.iter().join(" "))
    }
}

impl<T: fmt::Debug> fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}
