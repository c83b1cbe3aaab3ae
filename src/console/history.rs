//! Bounded store of committed input lines.

use std::collections::VecDeque;

/// Past input lines, oldest first.
///
/// Appending an empty line, or a line equal to the most recent entry, is a
/// no-op. Once `capacity` is reached each append evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct History {
    lines: VecDeque<String>,
    capacity: usize,
}

impl History {
    /// Create an empty history holding at most `capacity` lines.
    ///
    /// A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Maximum number of lines retained.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of stored lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Record a committed line. Returns `true` if it was stored.
    pub fn append(&mut self, line: &str) -> bool {
        if line.is_empty() || self.lines.back().is_some_and(|last| last == line) {
            return false;
        }
        while self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line.to_owned());
        true
    }

    /// Line at `index`, counting from the oldest.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Most recent line.
    pub fn last(&self) -> Option<&str> {
        self.lines.back().map(String::as_str)
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}
