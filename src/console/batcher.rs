//! Text flush batcher.
//!
//! Streamed output arrives a few characters at a time. Drawing each piece
//! separately would repaint the same row over and over, so printed text is
//! collected here and drawn as one run at the next flush point.

/// Pending text and the cell where it starts.
#[derive(Debug, Default, Clone)]
pub struct TextBatcher {
    pending: String,
    origin: Option<(u16, u16)>,
}

impl TextBatcher {
    /// Create an empty batcher.
    pub const fn new() -> Self {
        Self {
            pending: String::new(),
            origin: None,
        }
    }

    /// Queue `text`. The origin is fixed by the first call after a flush;
    /// later coordinates are ignored until the run is taken.
    pub fn push(&mut self, text: &str, x: u16, y: u16) {
        if text.is_empty() {
            return;
        }
        if self.pending.is_empty() {
            self.origin = Some((x, y));
        }
        self.pending.push_str(text);
    }

    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Origin of the pending run.
    pub const fn origin(&self) -> Option<(u16, u16)> {
        self.origin
    }

    /// Pending text, without taking it.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Take the pending run and its origin, leaving the batcher empty.
    pub fn take(&mut self) -> Option<(u16, u16, String)> {
        let (x, y) = self.origin.take()?;
        if self.pending.is_empty() {
            return None;
        }
        Some((x, y, std::mem::take(&mut self.pending)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_fixed_by_first_push() {
        let mut batcher = TextBatcher::new();
        batcher.push("You are ", 2, 3);
        batcher.push("in a cave.", 40, 9);
        assert_eq!(batcher.take(), Some((2, 3, "You are in a cave.".to_string())));
    }

    #[test]
    fn test_take_twice_yields_nothing() {
        let mut batcher = TextBatcher::new();
        batcher.push("x", 0, 0);
        assert!(batcher.take().is_some());
        assert!(batcher.take().is_none());
        assert!(batcher.is_empty());
    }

    #[test]
    fn test_empty_push_does_not_set_origin() {
        let mut batcher = TextBatcher::new();
        batcher.push("", 5, 5);
        batcher.push("a", 1, 1);
        assert_eq!(batcher.origin(), Some((1, 1)));
    }
}
