//! Line editor: the single line of player input and its history recall.
//!
//! The line is kept as a `Vec<char>` so the cursor is a char offset and
//! every motion is plain index arithmetic. Display columns are computed
//! only when the caret is placed.

use super::history::History;
use super::keymap::EditAction;
use crate::buffer::{Cell, Style, Surface};
use crate::layout::Rect;
use unicode_width::UnicodeWidthChar;

/// Result of applying an [`EditAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The line or cursor may have changed; redraw it.
    Edited,
    /// Enter was pressed.
    Commit,
    /// The host should show scrollback.
    ScrollBack,
    /// The caller should insert the clipboard contents.
    PasteRequested,
    /// The key is not an editing key.
    Unhandled,
}

/// The in-progress input line.
#[derive(Debug, Default, Clone)]
pub struct LineEditor {
    buf: Vec<char>,
    cursor: usize,
    /// Live line saved when history recall starts.
    backup: Option<Vec<char>>,
    /// 0 is the live line, `n` the n-th most recent history entry.
    hist_index: usize,
    origin: (u16, u16),
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

impl LineEditor {
    /// Create an empty editor at (0, 0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh line drawn at (x, y).
    pub fn begin(&mut self, x: u16, y: u16) {
        self.origin = (x, y);
        self.buf.clear();
        self.cursor = 0;
        self.backup = None;
        self.hist_index = 0;
    }

    /// Current text.
    pub fn text(&self) -> String {
        self.buf.iter().collect()
    }

    /// Line length in chars.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the line is empty.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Cursor offset in chars.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Cell where the line starts.
    pub const fn origin(&self) -> (u16, u16) {
        self.origin
    }

    /// History recall position.
    pub const fn history_index(&self) -> usize {
        self.hist_index
    }

    /// Whether the live line is saved away during recall.
    pub const fn has_backup(&self) -> bool {
        self.backup.is_some()
    }

    /// Replace the text and put the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.buf = text.chars().collect();
        self.cursor = self.buf.len();
    }

    /// Empty the line.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.cursor = 0;
    }

    /// Insert text at the cursor, skipping control characters.
    pub fn insert_str(&mut self, text: &str) {
        let chars: Vec<char> = text.chars().filter(|c| !c.is_control()).collect();
        let n = chars.len();
        self.buf.splice(self.cursor..self.cursor, chars);
        self.cursor += n;
    }

    /// Apply one editing action.
    pub fn apply(&mut self, action: EditAction, history: &History) -> EditOutcome {
        match action {
            EditAction::StartOfLine => self.cursor = 0,
            EditAction::EndOfLine => self.cursor = self.buf.len(),
            EditAction::PrevChar => self.cursor = self.cursor.saturating_sub(1),
            EditAction::NextChar => self.cursor = (self.cursor + 1).min(self.buf.len()),
            EditAction::PrevWord => self.cursor = self.prev_word_start(),
            EditAction::NextWord => self.cursor = self.next_word_end(),
            EditAction::DeleteForward => {
                if self.cursor < self.buf.len() {
                    self.buf.remove(self.cursor);
                }
            }
            EditAction::DeleteBackward => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.buf.remove(self.cursor);
                }
            }
            EditAction::DeleteWordForward => {
                let end = self.next_word_end();
                self.buf.drain(self.cursor..end);
            }
            EditAction::DeleteWordBackward => {
                let start = self.prev_word_start();
                self.buf.drain(start..self.cursor);
                self.cursor = start;
            }
            EditAction::HistoryPrev => self.recall_previous(history),
            EditAction::HistoryNext => self.recall_next(history),
            EditAction::Insert(c) => {
                self.buf.insert(self.cursor, c);
                self.cursor += 1;
            }
            EditAction::ScrollBack => return EditOutcome::ScrollBack,
            EditAction::Paste => return EditOutcome::PasteRequested,
            EditAction::Commit => return EditOutcome::Commit,
            EditAction::Unhandled => return EditOutcome::Unhandled,
        }
        EditOutcome::Edited
    }

    /// Finish the line: optionally record it, reset recall and hand the
    /// text back. The editor is left empty.
    pub fn commit(&mut self, history: &mut History, add_to_history: bool) -> String {
        let text = self.text();
        if add_to_history {
            history.append(&text);
        }
        self.hist_index = 0;
        self.backup = None;
        self.clear();
        text
    }

    fn prev_word_start(&self) -> usize {
        let mut pos = self.cursor;
        while pos > 0 && !is_word_char(self.buf[pos - 1]) {
            pos -= 1;
        }
        while pos > 0 && is_word_char(self.buf[pos - 1]) {
            pos -= 1;
        }
        pos
    }

    fn next_word_end(&self) -> usize {
        let len = self.buf.len();
        let mut pos = self.cursor;
        while pos < len && !is_word_char(self.buf[pos]) {
            pos += 1;
        }
        while pos < len && is_word_char(self.buf[pos]) {
            pos += 1;
        }
        pos
    }

    fn recall_previous(&mut self, history: &History) {
        let size = history.len();
        if size == 0 || self.hist_index >= size {
            return;
        }
        if self.hist_index == 0 {
            self.backup = Some(self.buf.clone());
        }
        if let Some(line) = history.get(size - 1 - self.hist_index) {
            self.set_text(line);
        }
        self.hist_index += 1;
    }

    fn recall_next(&mut self, history: &History) {
        if self.hist_index == 0 {
            return;
        }
        self.hist_index -= 1;
        if self.hist_index == 0 {
            self.buf = self.backup.take().unwrap_or_default();
            self.cursor = self.buf.len();
        } else if let Some(line) = history.get(history.len() - self.hist_index) {
            self.set_text(line);
        }
    }

    /// Column of the caret on screen.
    pub fn caret_column(&self) -> u16 {
        let width: usize = self.buf[..self.cursor]
            .iter()
            .map(|c| c.width().unwrap_or(0))
            .sum();
        u16::try_from(width)
            .unwrap_or(u16::MAX)
            .saturating_add(self.origin.0)
    }

    /// Caret cell.
    pub fn caret(&self) -> (u16, u16) {
        (self.caret_column(), self.origin.1)
    }

    /// Area the line occupies: its row from the origin to the right edge.
    pub const fn line_rect(&self, surface_width: u16) -> Rect {
        let (x, y) = self.origin;
        Rect::new(x, y, surface_width.saturating_sub(x), 1)
    }

    /// Paint the line onto `surface` over whatever is there.
    pub fn draw_onto(&self, surface: &mut Surface, style: Style) -> Rect {
        let area = self.line_rect(surface.width());
        surface.fill_rect(area, Cell::blank(style.bg));
        surface.draw_text(self.origin.0, self.origin.1, &self.text(), style);
        area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn editor_with(text: &str) -> LineEditor {
        let mut editor = LineEditor::new();
        editor.set_text(text);
        editor
    }

    #[test]
    fn test_previous_word_twice_reaches_start() {
        let history = History::new(10);
        let mut editor = editor_with("go north");
        editor.apply(EditAction::PrevWord, &history);
        assert_eq!(editor.cursor(), 3);
        editor.apply(EditAction::PrevWord, &history);
        assert_eq!(editor.cursor(), 0);
    }

    #[test]
    fn test_history_walk_restores_live_line() {
        let mut history = History::new(10);
        history.append("look");
        history.append("go north");
        let mut editor = LineEditor::new();

        editor.apply(EditAction::HistoryPrev, &history);
        assert_eq!(editor.text(), "go north");
        editor.apply(EditAction::HistoryPrev, &history);
        assert_eq!(editor.text(), "look");
        // Already at the oldest entry.
        editor.apply(EditAction::HistoryPrev, &history);
        assert_eq!(editor.text(), "look");
        assert_eq!(editor.history_index(), 2);

        editor.apply(EditAction::HistoryNext, &history);
        assert_eq!(editor.text(), "go north");
        editor.apply(EditAction::HistoryNext, &history);
        assert_eq!(editor.text(), "");
        assert!(!editor.has_backup());
        assert_eq!(editor.cursor(), 0);
    }

    #[test]
    fn test_recall_keeps_partial_line() {
        let mut history = History::new(10);
        history.append("inventory");
        let mut editor = editor_with("tak");

        editor.apply(EditAction::HistoryPrev, &history);
        assert_eq!(editor.cursor(), 9);
        editor.apply(EditAction::HistoryNext, &history);
        assert_eq!(editor.text(), "tak");
        assert_eq!(editor.cursor(), 3);
    }

    #[test]
    fn test_history_next_at_live_line_is_noop() {
        let history = History::new(10);
        let mut editor = editor_with("x");
        assert_eq!(editor.apply(EditAction::HistoryNext, &history), EditOutcome::Edited);
        assert_eq!(editor.text(), "x");
    }

    #[test]
    fn test_word_deletion() {
        let history = History::new(10);
        let mut editor = editor_with("take the lamp");
        editor.apply(EditAction::DeleteWordBackward, &history);
        assert_eq!(editor.text(), "take the ");

        editor.apply(EditAction::StartOfLine, &history);
        editor.apply(EditAction::DeleteWordForward, &history);
        assert_eq!(editor.text(), " the ");
        assert_eq!(editor.cursor(), 0);
    }

    #[test]
    fn test_char_editing() {
        let history = History::new(10);
        let mut editor = editor_with("lok");
        editor.apply(EditAction::PrevChar, &history);
        editor.apply(EditAction::Insert('o'), &history);
        assert_eq!(editor.text(), "look");
        editor.apply(EditAction::DeleteBackward, &history);
        editor.apply(EditAction::DeleteForward, &history);
        assert_eq!(editor.text(), "lo");
    }

    #[test]
    fn test_commit_records_and_resets() {
        let mut history = History::new(10);
        history.append("look");
        let mut editor = LineEditor::new();
        editor.apply(EditAction::HistoryPrev, &history);

        let text = editor.commit(&mut history, true);
        assert_eq!(text, "look");
        assert_eq!(history.len(), 1);
        assert_eq!(editor.history_index(), 0);
        assert!(editor.is_empty());
    }

    #[test]
    fn test_non_editing_outcomes() {
        let history = History::new(10);
        let mut editor = editor_with("abc");
        assert_eq!(editor.apply(EditAction::ScrollBack, &history), EditOutcome::ScrollBack);
        assert_eq!(editor.apply(EditAction::Paste, &history), EditOutcome::PasteRequested);
        assert_eq!(editor.apply(EditAction::Unhandled, &history), EditOutcome::Unhandled);
        assert_eq!(editor.text(), "abc");
        assert_eq!(editor.cursor(), 3);
    }

    #[test]
    fn test_caret_column_counts_wide_chars() {
        let mut editor = LineEditor::new();
        editor.begin(2, 5);
        editor.insert_str("日本a");
        assert_eq!(editor.caret(), (7, 5));
    }

    proptest! {
        #[test]
        fn prop_next_word_visits_run_ends(words in proptest::collection::vec(("[a-z0-9]{1,4}", "[ .,!-]{1,3}"), 1..6)) {
            let history = History::new(1);
            let mut text = String::new();
            let mut expected = Vec::new();
            for (word, gap) in &words {
                text.push_str(gap);
                text.push_str(word);
                expected.push(text.chars().count());
            }
            let mut editor = editor_with(&text);
            editor.apply(EditAction::StartOfLine, &history);

            let mut visited = Vec::new();
            for _ in 0..words.len() {
                editor.apply(EditAction::NextWord, &history);
                visited.push(editor.cursor());
            }
            prop_assert_eq!(visited, expected);
            prop_assert_eq!(editor.cursor(), editor.len());
        }

        #[test]
        fn prop_recall_round_trip(
            entries in proptest::collection::vec("[a-z]{1,5}", 1..8),
            live in "[a-z ]{0,6}",
            k_seed in 0usize..8,
        ) {
            let mut history = History::new(16);
            for entry in &entries {
                history.append(entry);
            }
            let k = k_seed % (history.len() + 1);
            let mut editor = editor_with(&live);

            for _ in 0..k {
                editor.apply(EditAction::HistoryPrev, &history);
            }
            for _ in 0..k {
                editor.apply(EditAction::HistoryNext, &history);
            }
            prop_assert_eq!(editor.text(), live);
            prop_assert_eq!(editor.history_index(), 0);
        }
    }
}
