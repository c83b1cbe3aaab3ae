//! Key and click queues feeding the engine's blocking accessors.

use std::collections::VecDeque;

/// Key code queued in front of every click.
pub const CLICK_SENTINEL: u8 = 0;

/// A key FIFO and a click FIFO.
///
/// Each click is paired with one [`CLICK_SENTINEL`] in the key queue, so an
/// engine that reads a 0 key knows a coordinate is waiting.
#[derive(Debug, Default, Clone)]
pub struct EventQueues {
    keys: VecDeque<u8>,
    clicks: VecDeque<(u16, u16)>,
}

impl EventQueues {
    /// Create empty queues.
    pub const fn new() -> Self {
        Self {
            keys: VecDeque::new(),
            clicks: VecDeque::new(),
        }
    }

    /// Append a key code.
    pub fn push_key(&mut self, code: u8) {
        self.keys.push_back(code);
    }

    /// Append a click and its sentinel key.
    pub fn push_click(&mut self, x: u16, y: u16) {
        self.clicks.push_back((x, y));
        self.keys.push_back(CLICK_SENTINEL);
    }

    /// Oldest key, if any.
    pub fn pop_key(&mut self) -> Option<u8> {
        self.keys.pop_front()
    }

    /// Oldest click, if any.
    pub fn pop_click(&mut self) -> Option<(u16, u16)> {
        self.clicks.pop_front()
    }

    /// Whether a key is waiting.
    pub fn has_key(&self) -> bool {
        !self.keys.is_empty()
    }

    /// Number of waiting keys.
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Number of waiting clicks.
    pub fn click_count(&self) -> usize {
        self.clicks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_pairs_with_sentinel() {
        let mut queues = EventQueues::new();
        queues.push_key(b'a');
        queues.push_click(10, 20);

        assert_eq!(queues.pop_key(), Some(b'a'));
        assert_eq!(queues.pop_key(), Some(CLICK_SENTINEL));
        assert_eq!(queues.pop_click(), Some((10, 20)));
        assert_eq!(queues.pop_key(), None);
        assert_eq!(queues.pop_click(), None);
    }

    #[test]
    fn test_fifo_order() {
        let mut queues = EventQueues::new();
        for code in b"look" {
            queues.push_key(*code);
        }
        let drained: Vec<u8> = std::iter::from_fn(|| queues.pop_key()).collect();
        assert_eq!(drained, b"look");
    }
}
