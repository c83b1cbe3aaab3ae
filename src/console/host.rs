//! The seam between the console and whatever drives the screen.

use crate::actor::InputEvent;
use crate::buffer::Surface;
use crate::layout::Rect;
use std::io;
use std::time::{Duration, Instant};

/// Services the console needs from its host.
///
/// The console is single-threaded and cooperative: when the engine blocks
/// for a key or a line, the console repeatedly calls [`wait_event`] and
/// processes whatever comes back. Only the methods without defaults are
/// required.
///
/// [`wait_event`]: Host::wait_event
pub trait Host {
    /// Whether the session is still running. Once this returns `false`,
    /// blocking accessors return their session-ended sentinel.
    fn is_running(&self) -> bool;

    /// Current display size in cells.
    fn size(&self) -> (u16, u16);

    /// Wait up to `timeout` for the next UI event.
    fn wait_event(&mut self, timeout: Duration) -> Option<InputEvent>;

    /// Show `frame`. `dirty` lists the areas changed since the last call
    /// (empty means everything). `caret` is the caret cell, if drawn.
    fn present(&mut self, frame: &Surface, dirty: &[Rect], caret: Option<(u16, u16)>)
        -> io::Result<()>;

    /// Current time. Override to drive timers from a test clock.
    fn now(&self) -> Instant {
        Instant::now()
    }

    /// Block for `duration`.
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }

    /// Mute or unmute audio.
    fn set_muted(&mut self, _muted: bool) {}

    /// Text on the clipboard, if any.
    fn clipboard_text(&mut self) -> Option<String> {
        None
    }

    /// The player asked to see scrolled-off output.
    fn request_scrollback(&mut self) {}

    /// A line was committed.
    fn input_committed(&mut self, _line: &str) {}

    /// Escape was pressed.
    fn escape_pressed(&mut self) {}

    /// An event the console had no use for.
    fn unhandled_event(&mut self, _event: &InputEvent) {}
}
