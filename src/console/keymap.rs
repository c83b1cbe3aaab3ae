//! Key bindings for the line editor and the byte codes queued for the
//! engine outside line mode.

use crate::actor::{KeyCode, KeyModifiers};

/// Code queued for the left arrow.
pub const KEY_LEFT: u8 = 8;
/// Code queued for the up arrow.
pub const KEY_UP: u8 = 11;
/// Code queued for the right arrow.
pub const KEY_RIGHT: u8 = 21;
/// Code queued for the down arrow.
pub const KEY_DOWN: u8 = 10;

const KEY_ENTER: u8 = 13;
const KEY_BACKSPACE: u8 = 8;
const KEY_TAB: u8 = 9;
const KEY_ESCAPE: u8 = 27;
const KEY_DELETE: u8 = 127;

/// What a key press does to the line being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    /// Cursor to the start of the line.
    StartOfLine,
    /// Cursor to the end of the line.
    EndOfLine,
    /// Cursor one char left.
    PrevChar,
    /// Cursor one char right.
    NextChar,
    /// Cursor to the start of the previous word.
    PrevWord,
    /// Cursor past the end of the next word.
    NextWord,
    /// Remove the char under the cursor.
    DeleteForward,
    /// Remove the char before the cursor.
    DeleteBackward,
    /// Remove up to the end of the next word.
    DeleteWordForward,
    /// Remove back to the start of the previous word.
    DeleteWordBackward,
    /// Recall an older line.
    HistoryPrev,
    /// Recall a newer line, or the live one.
    HistoryNext,
    /// Ask the host to show scrollback.
    ScrollBack,
    /// Insert the clipboard contents.
    Paste,
    /// Insert one char at the cursor.
    Insert(char),
    /// Finish the line.
    Commit,
    /// Not an editing key.
    Unhandled,
}

impl EditAction {
    /// Classify a key press made while a line is being edited.
    pub fn classify(code: KeyCode, modifiers: KeyModifiers) -> Self {
        let ctrl = modifiers.control;
        let alt = modifiers.alt;

        match code {
            KeyCode::Home => Self::StartOfLine,
            KeyCode::End => Self::EndOfLine,
            KeyCode::Left if ctrl => Self::PrevWord,
            KeyCode::Left => Self::PrevChar,
            KeyCode::Right if ctrl => Self::NextWord,
            KeyCode::Right => Self::NextChar,
            KeyCode::Delete if ctrl => Self::DeleteWordForward,
            KeyCode::Delete => Self::DeleteForward,
            KeyCode::Backspace if ctrl || alt => Self::DeleteWordBackward,
            KeyCode::Backspace => Self::DeleteBackward,
            KeyCode::Up => Self::HistoryPrev,
            KeyCode::Down => Self::HistoryNext,
            KeyCode::PageUp => Self::ScrollBack,
            KeyCode::Insert if modifiers.shift => Self::Paste,
            KeyCode::Enter => Self::Commit,
            KeyCode::Char(c) if ctrl => match c.to_ascii_lowercase() {
                'a' => Self::StartOfLine,
                'e' => Self::EndOfLine,
                'd' => Self::DeleteForward,
                'w' => Self::DeleteWordBackward,
                'v' => Self::Paste,
                _ => Self::Unhandled,
            },
            KeyCode::Char(c) if alt => match c.to_ascii_lowercase() {
                'b' => Self::PrevWord,
                'f' => Self::NextWord,
                'd' => Self::DeleteWordForward,
                _ => Self::Unhandled,
            },
            KeyCode::Char(c) if !c.is_control() => Self::Insert(c),
            _ => Self::Unhandled,
        }
    }
}

/// Translate a key press made outside line mode into the byte the engine
/// reads from [`get_next_key`](crate::Console::get_next_key).
///
/// Returns `None` for keys the engine has no code for.
pub fn raw_key_code(code: KeyCode, modifiers: KeyModifiers) -> Option<u8> {
    match code {
        KeyCode::Left => Some(KEY_LEFT),
        KeyCode::Up => Some(KEY_UP),
        KeyCode::Right => Some(KEY_RIGHT),
        KeyCode::Down => Some(KEY_DOWN),
        KeyCode::Enter => Some(KEY_ENTER),
        KeyCode::Backspace => Some(KEY_BACKSPACE),
        KeyCode::Tab => Some(KEY_TAB),
        KeyCode::Esc => Some(KEY_ESCAPE),
        KeyCode::Delete => Some(KEY_DELETE),
        KeyCode::Char(c) if modifiers.control && c.is_ascii_alphabetic() => {
            u8::try_from(c.to_ascii_lowercase()).ok().map(|b| b & 0x1f)
        }
        KeyCode::Char(c) => u8::try_from(u32::from(c)).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_arrow_codes() {
        let none = KeyModifiers::NONE;
        assert_eq!(raw_key_code(KeyCode::Left, none), Some(8));
        assert_eq!(raw_key_code(KeyCode::Up, none), Some(11));
        assert_eq!(raw_key_code(KeyCode::Right, none), Some(21));
        assert_eq!(raw_key_code(KeyCode::Down, none), Some(10));
    }

    #[test]
    fn test_chars_and_control_codes() {
        assert_eq!(raw_key_code(KeyCode::Char('n'), KeyModifiers::NONE), Some(b'n'));
        assert_eq!(raw_key_code(KeyCode::Char('é'), KeyModifiers::NONE), Some(0xE9));
        assert_eq!(raw_key_code(KeyCode::Char('C'), KeyModifiers::CONTROL), Some(3));
        assert_eq!(raw_key_code(KeyCode::Char('λ'), KeyModifiers::NONE), None);
        assert_eq!(raw_key_code(KeyCode::F(1), KeyModifiers::NONE), None);
    }

    #[test]
    fn test_editing_bindings() {
        let ctrl = KeyModifiers::CONTROL;
        let alt = KeyModifiers::ALT;
        assert_eq!(EditAction::classify(KeyCode::Left, ctrl), EditAction::PrevWord);
        assert_eq!(EditAction::classify(KeyCode::Char('b'), alt), EditAction::PrevWord);
        assert_eq!(EditAction::classify(KeyCode::Char('w'), ctrl), EditAction::DeleteWordBackward);
        assert_eq!(EditAction::classify(KeyCode::Insert, KeyModifiers::SHIFT), EditAction::Paste);
        assert_eq!(
            EditAction::classify(KeyCode::Char('x'), KeyModifiers::NONE),
            EditAction::Insert('x')
        );
        assert_eq!(EditAction::classify(KeyCode::F(5), KeyModifiers::NONE), EditAction::Unhandled);
        assert_eq!(EditAction::classify(KeyCode::Char('q'), ctrl), EditAction::Unhandled);
    }
}
