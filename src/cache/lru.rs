//! Access Order Module
//!
//! Recency tracking used when a cache is given a capacity bound.

use std::collections::VecDeque;

// == Access Order ==
/// Keys ordered by last access. Front is most recent, back is least recent.
#[derive(Debug, Default)]
pub struct AccessOrder {
    order: VecDeque<String>,
}

impl AccessOrder {
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks `key` as the most recently used.
    pub fn touch(&mut self, key: &str) {
        self.forget(key);
        self.order.push_front(key.to_string());
    }

    // == Forget ==
    /// Stops tracking `key`. Unknown keys are ignored.
    pub fn forget(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }

    // == Pop Least Recent ==
    /// Removes and returns the least recently used key.
    pub fn pop_least_recent(&mut self) -> Option<String> {
        self.order.pop_back()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
