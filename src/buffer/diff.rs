//! Diffing engine: minimal ANSI output between two surfaces.
//!
//! The presenter keeps a copy of what the terminal currently shows and asks
//! this module for the escape sequences that turn it into the next frame.
//! Only the rectangles the console reported as dirty are compared, so a
//! caret blink costs one cell and a scroll costs its region.
//!
//! All output is accumulated in a single buffer and flushed with one write.

use super::{Cell, Modifiers, Rgb, Surface};
use crate::layout::Rect;
use std::io::Write;

/// Terminal state as last emitted, used to skip redundant sequences.
#[derive(Debug, Clone)]
pub struct DiffState {
    cursor_x: u16,
    cursor_y: u16,
    fg: Option<Rgb>,
    bg: Option<Rgb>,
    modifiers: Option<Modifiers>,
}

impl Default for DiffState {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffState {
    /// Create a new diff state with unknown terminal state.
    pub const fn new() -> Self {
        Self {
            cursor_x: 0,
            cursor_y: 0,
            fg: None,
            bg: None,
            modifiers: None,
        }
    }

    /// Forget everything, forcing explicit moves and colours next time.
    pub const fn reset(&mut self) {
        self.fg = None;
        self.bg = None;
        self.modifiers = None;
        self.cursor_x = u16::MAX;
        self.cursor_y = u16::MAX;
    }
}

/// Statistics from a diff pass.
#[derive(Debug, Clone, Default)]
pub struct DiffResult {
    /// Number of cells that were different.
    pub cells_changed: usize,
    /// Number of cursor move sequences emitted.
    pub cursor_moves: usize,
    /// Number of color change sequences emitted.
    pub color_changes: usize,
}

/// Emit the sequences that turn `current` into `next` within `dirty_rects`.
///
/// An empty `dirty_rects` slice diffs the whole surface. Both surfaces must
/// have the same dimensions.
pub fn render_diff(
    current: &Surface,
    next: &Surface,
    dirty_rects: &[Rect],
    output: &mut Vec<u8>,
    state: &mut DiffState,
) -> DiffResult {
    debug_assert_eq!(current.width(), next.width());
    debug_assert_eq!(current.height(), next.height());

    let mut result = DiffResult::default();
    let full_rect = next.bounds();
    let rects: &[Rect] = if dirty_rects.is_empty() {
        std::slice::from_ref(&full_rect)
    } else {
        dirty_rects
    };

    for rect in rects {
        diff_rect(current, next, rect.intersection(&full_rect), output, state, &mut result);
    }

    result
}

fn diff_rect(
    current: &Surface,
    next: &Surface,
    rect: Rect,
    output: &mut Vec<u8>,
    state: &mut DiffState,
    result: &mut DiffResult,
) {
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            let (Some(old), Some(new)) = (current.get(x, y), next.get(x, y)) else {
                continue;
            };
            if old == new || new.is_wide_continuation() {
                continue;
            }

            result.cells_changed += 1;

            if state.cursor_y != y || state.cursor_x != x {
                emit_cursor_move(output, x, y);
                state.cursor_x = x;
                state.cursor_y = y;
                result.cursor_moves += 1;
            }

            emit_style(output, new, state, result);
            emit_char(output, new);

            state.cursor_x += u16::from(new.display_width().max(1));
        }
    }
}

/// Bring the terminal's SGR state in line with `cell`.
///
/// Dropping a modifier requires a full reset, which also forgets colours.
fn emit_style(output: &mut Vec<u8>, cell: &Cell, state: &mut DiffState, result: &mut DiffResult) {
    let wanted = cell.modifiers();
    let active = state.modifiers.unwrap_or(Modifiers::empty());
    if !active.difference(wanted).is_empty() {
        output.extend_from_slice(b"\x1b[0m");
        state.fg = None;
        state.bg = None;
        state.modifiers = None;
    }

    if state.fg != Some(cell.fg()) {
        emit_fg_color(output, cell.fg());
        state.fg = Some(cell.fg());
        result.color_changes += 1;
    }
    if state.bg != Some(cell.bg()) {
        emit_bg_color(output, cell.bg());
        state.bg = Some(cell.bg());
        result.color_changes += 1;
    }
    if state.modifiers != Some(wanted) {
        let active = state.modifiers.unwrap_or(Modifiers::empty());
        emit_modifier_set(output, wanted.difference(active));
        state.modifiers = Some(wanted);
    }
}

/// Emit a cursor move, using the short forms for home and column one.
#[inline]
fn emit_cursor_move(output: &mut Vec<u8>, x: u16, y: u16) {
    let row = u32::from(y) + 1;
    let col = u32::from(x) + 1;

    if row == 1 && col == 1 {
        output.extend_from_slice(b"\x1b[H");
    } else if col == 1 {
        let _ = write!(output, "\x1b[{row}H");
    } else {
        let _ = write!(output, "\x1b[{row};{col}H");
    }
}

#[inline]
fn emit_fg_color(output: &mut Vec<u8>, color: Rgb) {
    let _ = write!(output, "\x1b[38;2;{};{};{}m", color.r, color.g, color.b);
}

#[inline]
fn emit_bg_color(output: &mut Vec<u8>, color: Rgb) {
    let _ = write!(output, "\x1b[48;2;{};{};{}m", color.r, color.g, color.b);
}

fn emit_modifier_set(output: &mut Vec<u8>, modifiers: Modifiers) {
    if modifiers.contains(Modifiers::BOLD) {
        output.extend_from_slice(b"\x1b[1m");
    }
    if modifiers.contains(Modifiers::DIM) {
        output.extend_from_slice(b"\x1b[2m");
    }
    if modifiers.contains(Modifiers::ITALIC) {
        output.extend_from_slice(b"\x1b[3m");
    }
    if modifiers.contains(Modifiers::UNDERLINE) {
        output.extend_from_slice(b"\x1b[4m");
    }
    if modifiers.contains(Modifiers::REVERSED) {
        output.extend_from_slice(b"\x1b[7m");
    }
}

#[inline]
fn emit_char(output: &mut Vec<u8>, cell: &Cell) {
    let mut utf8 = [0u8; 4];
    output.extend_from_slice(cell.ch().encode_utf8(&mut utf8).as_bytes());
}

/// Generate a full redraw sequence (no diffing).
///
/// Used for the first frame, after a resize, or whenever the terminal
/// contents are unknown.
pub fn render_full(surface: &Surface, output: &mut Vec<u8>, state: &mut DiffState) {
    output.extend_from_slice(b"\x1b[?25l\x1b[0m");
    state.reset();
    let mut result = DiffResult::default();

    for (y, row) in (0u16..).zip(surface.rows()) {
        emit_cursor_move(output, 0, y);
        for cell in row.iter().filter(|c| !c.is_wide_continuation()) {
            emit_style(output, cell, state, &mut result);
            emit_char(output, cell);
        }
    }

    output.extend_from_slice(b"\x1b[0m");
    state.reset();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Style;

    fn blank(width: u16, height: u16) -> Surface {
        Surface::new(width, height, Rgb::DEFAULT_BG)
    }

    #[test]
    fn test_diff_identical_surfaces() {
        let a = blank(10, 5);
        let b = blank(10, 5);
        let mut output = Vec::new();
        let mut state = DiffState::new();

        let result = render_diff(&a, &b, &[], &mut output, &mut state);

        assert_eq!(result.cells_changed, 0);
        assert!(output.is_empty());
    }

    #[test]
    fn test_diff_single_cell_change() {
        let a = blank(10, 5);
        let mut b = blank(10, 5);
        b.set(5, 2, Cell::new('X'));

        let mut output = Vec::new();
        let mut state = DiffState::new();
        let result = render_diff(&a, &b, &[], &mut output, &mut state);

        assert_eq!(result.cells_changed, 1);
        let output_str = String::from_utf8_lossy(&output);
        assert!(output_str.contains("\x1b[3;6H"));
        assert!(output_str.ends_with('X'));
    }

    #[test]
    fn test_diff_adjacent_cells_no_cursor_move() {
        let a = blank(10, 5);
        let mut b = blank(10, 5);
        b.draw_text(0, 0, "ABC", Style::default());

        let mut output = Vec::new();
        let mut state = DiffState::new();
        let result = render_diff(&a, &b, &[], &mut output, &mut state);

        assert_eq!(result.cells_changed, 3);
        assert_eq!(result.cursor_moves, 0);
        assert_eq!(result.color_changes, 2);
    }

    #[test]
    fn test_diff_only_dirty_rects() {
        let a = blank(20, 10);
        let mut b = blank(20, 10);
        b.set(0, 0, Cell::new('X'));
        b.set(10, 5, Cell::new('Y'));

        let mut output = Vec::new();
        let mut state = DiffState::new();
        let result = render_diff(&a, &b, &[Rect::new(8, 4, 5, 3)], &mut output, &mut state);

        assert_eq!(result.cells_changed, 1);
    }

    #[test]
    fn test_modifier_removal_resets() {
        let mut a = blank(4, 1);
        let mut b = blank(4, 1);
        a.set(0, 0, Cell::new('a'));
        b.set(0, 0, Cell::new('a').with_modifiers(Modifiers::BOLD));
        b.set(1, 0, Cell::new('b'));

        let mut output = Vec::new();
        let mut state = DiffState::new();
        render_diff(&a, &b, &[], &mut output, &mut state);

        let output_str = String::from_utf8_lossy(&output);
        assert!(output_str.contains("\x1b[1ma\x1b[0m"));
    }

    #[test]
    fn test_cursor_move_short_forms() {
        let mut output = Vec::new();
        emit_cursor_move(&mut output, 0, 0);
        assert_eq!(&output, b"\x1b[H");

        output.clear();
        emit_cursor_move(&mut output, 0, 5);
        assert_eq!(&output, b"\x1b[6H");

        output.clear();
        emit_cursor_move(&mut output, 10, 5);
        assert_eq!(&output, b"\x1b[6;11H");
    }

    #[test]
    fn test_render_full() {
        let mut surface = blank(3, 2);
        surface.draw_text(0, 0, "ABC", Style::default());

        let mut output = Vec::new();
        let mut state = DiffState::new();
        render_full(&surface, &mut output, &mut state);

        let output_str = String::from_utf8_lossy(&output);
        assert!(output_str.starts_with("\x1b[?25l\x1b[0m\x1b[H"));
        assert!(output_str.contains("ABC"));
        assert!(output_str.ends_with("\x1b[0m"));
    }
}
