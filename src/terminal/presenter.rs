//! Presenter: turns console frames into minimal terminal output.
//!
//! The presenter keeps a copy of what it last wrote. Each frame is diffed
//! against that copy within the dirty areas the console reports, and the
//! resulting escape sequences are written in a single `write_all`.

use crate::buffer::diff::{render_diff, render_full, DiffState};
use crate::buffer::Surface;
use crate::layout::Rect;
use std::io::{self, Write};
use std::time::Instant;

/// Render statistics for debugging/profiling.
#[derive(Debug, Clone, Default)]
pub struct RenderStats {
    /// Total frames presented.
    pub frames: u64,
    /// Frames that had to be drawn in full.
    pub full_frames: u64,
    /// Total cells changed across all diffed frames.
    pub cells_changed: u64,
    /// Total bytes written.
    pub bytes_written: u64,
    /// Smoothed render time in microseconds.
    pub avg_render_us: u64,
    /// Last render time in microseconds.
    pub last_render_us: u64,
}

/// Diffing frame writer.
pub struct Presenter<W: Write> {
    writer: W,
    /// What the terminal currently shows, if known.
    current: Option<Surface>,
    diff_state: DiffState,
    /// Pre-allocated output buffer.
    output: Vec<u8>,
    stats: RenderStats,
}

impl<W: Write> Presenter<W> {
    /// Create a presenter writing to `writer`. The first frame is drawn in
    /// full.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            current: None,
            diff_state: DiffState::new(),
            output: Vec::with_capacity(65536),
            stats: RenderStats::default(),
        }
    }

    /// Render statistics so far.
    pub const fn stats(&self) -> &RenderStats {
        &self.stats
    }

    /// The underlying writer.
    pub const fn writer(&self) -> &W {
        &self.writer
    }

    /// Forget what is on screen, forcing the next frame to be drawn in full.
    pub fn invalidate(&mut self) {
        self.current = None;
        self.diff_state.reset();
    }

    /// Write `frame`, diffing within `dirty` (empty means the whole frame),
    /// then place or hide the hardware cursor for the caret.
    pub fn present(&mut self, frame: &Surface, dirty: &[Rect], caret: Option<(u16, u16)>) -> io::Result<()> {
        let start = Instant::now();
        self.output.clear();

        match &self.current {
            Some(current)
                if current.width() == frame.width() && current.height() == frame.height() =>
            {
                let result = render_diff(current, frame, dirty, &mut self.output, &mut self.diff_state);
                self.stats.cells_changed += result.cells_changed as u64;
            }
            _ => {
                render_full(frame, &mut self.output, &mut self.diff_state);
                self.stats.full_frames += 1;
            }
        }

        if let Some((x, y)) = caret {
            write!(&mut self.output, "\x1b[{};{}H\x1b[?25h", y + 1, x + 1)?;
            // The diff state no longer knows where the cursor is.
            self.diff_state.reset();
        } else {
            self.output.extend_from_slice(b"\x1b[?25l");
        }

        self.writer.write_all(&self.output)?;
        self.writer.flush()?;

        match &mut self.current {
            Some(current) => current.clone_from(frame),
            None => self.current = Some(frame.clone()),
        }

        let elapsed = start.elapsed();
        self.stats.frames += 1;
        self.stats.bytes_written += self.output.len() as u64;
        self.stats.last_render_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.stats.avg_render_us = if self.stats.avg_render_us == 0 {
            self.stats.last_render_us
        } else {
            (self.stats.avg_render_us * 15 + self.stats.last_render_us) / 16
        };

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{Rgb, Style};

    fn frame() -> Surface {
        Surface::new(20, 4, Rgb::DEFAULT_BG)
    }

    #[test]
    fn test_first_frame_is_full() {
        let mut presenter = Presenter::new(Vec::new());
        presenter.present(&frame(), &[], None).unwrap();
        assert_eq!(presenter.stats().full_frames, 1);
        assert!(presenter.writer().starts_with(b"\x1b[?25l\x1b[0m"));
    }

    #[test]
    fn test_unchanged_frame_writes_only_cursor_state() {
        let mut presenter = Presenter::new(Vec::new());
        let surface = frame();
        presenter.present(&surface, &[], None).unwrap();
        let before = presenter.writer().len();

        presenter.present(&surface, &[], None).unwrap();
        assert_eq!(&presenter.writer()[before..], b"\x1b[?25l");
    }

    #[test]
    fn test_changed_text_is_diffed() {
        let mut presenter = Presenter::new(Vec::new());
        let mut surface = frame();
        presenter.present(&surface, &[], None).unwrap();
        let before = presenter.writer().len();

        let area = surface.draw_text(2, 1, "hi", Style::default());
        presenter.present(&surface, &[area], Some((4, 1))).unwrap();

        let written = String::from_utf8_lossy(&presenter.writer()[before..]).into_owned();
        assert!(written.contains("hi"));
        assert!(written.ends_with("\x1b[2;5H\x1b[?25h"));
        assert_eq!(presenter.stats().cells_changed, 2);
        assert_eq!(presenter.stats().full_frames, 1);
    }

    #[test]
    fn test_size_change_forces_full_frame() {
        let mut presenter = Presenter::new(Vec::new());
        presenter.present(&frame(), &[], None).unwrap();
        presenter
            .present(&Surface::new(30, 4, Rgb::DEFAULT_BG), &[], None)
            .unwrap();
        assert_eq!(presenter.stats().full_frames, 2);
    }
}
