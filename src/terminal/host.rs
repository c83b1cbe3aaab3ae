//! Terminal host: runs a [`Console`](crate::Console) on a real terminal.
//!
//! Sets up raw mode, the alternate screen and mouse/focus/paste reporting,
//! spawns the input actor and presents frames through a [`Presenter`].
//! Everything is restored on drop.

use super::presenter::{Presenter, RenderStats};
use crate::actor::{InputActor, InputEvent, KeyCode};
use crate::buffer::Surface;
use crate::console::Host;
use crate::error::Result;
use crate::layout::Rect;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};
use crossterm::{
    cursor,
    event::{
        DisableBracketedPaste, DisableFocusChange, DisableMouseCapture, EnableBracketedPaste,
        EnableFocusChange, EnableMouseCapture,
    },
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the [`TerminalHost`].
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// How long the input thread waits per poll.
    pub input_poll_timeout: Duration,
    /// Capacity of the input event channel.
    pub channel_capacity: usize,
    /// Report mouse clicks.
    pub enable_mouse: bool,
    /// Use the alternate screen buffer.
    pub alternate_screen: bool,
    /// Report focus changes (drives caret blur and background muting).
    pub focus_reporting: bool,
    /// Deliver pastes as single events.
    pub bracketed_paste: bool,
    /// End the session on Ctrl-C.
    pub interrupt_ends_session: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            input_poll_timeout: Duration::from_millis(10),
            channel_capacity: 64,
            enable_mouse: true,
            alternate_screen: true,
            focus_reporting: true,
            bracketed_paste: true,
            interrupt_ends_session: true,
        }
    }
}

/// Shared flag marking the session as running. Clone it to end the session
/// from elsewhere, e.g. a signal handler.
#[derive(Debug, Clone)]
pub struct SessionHandle(Arc<AtomicBool>);

impl SessionHandle {
    /// A running session.
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    /// Whether the session is still running.
    pub fn is_running(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// End the session. Blocked console calls return their session-ended
    /// sentinel on their next cycle.
    pub fn end(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// A [`Host`] backed by the controlling terminal.
pub struct TerminalHost {
    config: HostConfig,
    input_rx: Receiver<InputEvent>,
    input_actor: Option<InputActor>,
    presenter: Presenter<Stdout>,
    size: (u16, u16),
    session: SessionHandle,
    muted: bool,
    /// Most recent paste, served as clipboard contents.
    clipboard: Option<String>,
}

impl TerminalHost {
    /// Take over the terminal with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(HostConfig::default())
    }

    /// Take over the terminal.
    pub fn with_config(config: HostConfig) -> Result<Self> {
        let size = terminal::size()?;

        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        if config.alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
        }
        if config.enable_mouse {
            execute!(stdout, EnableMouseCapture)?;
        }
        if config.focus_reporting {
            execute!(stdout, EnableFocusChange)?;
        }
        if config.bracketed_paste {
            execute!(stdout, EnableBracketedPaste)?;
        }
        execute!(stdout, cursor::Hide)?;

        let (input_tx, input_rx) = bounded::<InputEvent>(config.channel_capacity);
        let input_actor = InputActor::spawn(input_tx, config.input_poll_timeout)?;

        tracing::debug!(width = size.0, height = size.1, "terminal host ready");

        Ok(Self {
            config,
            input_rx,
            input_actor: Some(input_actor),
            presenter: Presenter::new(stdout),
            size,
            session: SessionHandle::new(),
            muted: false,
            clipboard: None,
        })
    }

    /// A handle that can end the session.
    pub fn session(&self) -> SessionHandle {
        self.session.clone()
    }

    /// Whether the console asked for audio to be muted.
    pub const fn is_muted(&self) -> bool {
        self.muted
    }

    /// Set the text served by [`Host::clipboard_text`].
    pub fn set_clipboard_text(&mut self, text: impl Into<String>) {
        self.clipboard = Some(text.into());
    }

    /// Presentation statistics.
    pub const fn render_stats(&self) -> &RenderStats {
        self.presenter.stats()
    }

    fn is_interrupt(&self, event: &InputEvent) -> bool {
        self.config.interrupt_ends_session
            && matches!(
                event,
                InputEvent::Key { code: KeyCode::Char('c' | 'C'), modifiers } if modifiers.control
            )
    }
}

impl Host for TerminalHost {
    fn is_running(&self) -> bool {
        self.session.is_running()
    }

    fn size(&self) -> (u16, u16) {
        self.size
    }

    fn wait_event(&mut self, timeout: Duration) -> Option<InputEvent> {
        if !self.session.is_running() {
            return None;
        }

        let event = match self.input_rx.recv_timeout(timeout) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => return None,
            Err(RecvTimeoutError::Disconnected) => {
                tracing::warn!("input channel disconnected, ending session");
                self.session.end();
                return None;
            }
        };

        if self.is_interrupt(&event) {
            tracing::debug!("interrupt, ending session");
            self.session.end();
            return None;
        }

        match &event {
            InputEvent::Resize { width, height } if *width > 0 && *height > 0 => {
                self.size = (*width, *height);
                self.presenter.invalidate();
            }
            InputEvent::Paste(text) => self.clipboard = Some(text.clone()),
            _ => {}
        }
        Some(event)
    }

    fn present(&mut self, frame: &Surface, dirty: &[Rect], caret: Option<(u16, u16)>) -> io::Result<()> {
        self.presenter.present(frame, dirty, caret)
    }

    fn set_muted(&mut self, muted: bool) {
        tracing::debug!(muted, "audio mute changed");
        self.muted = muted;
    }

    fn clipboard_text(&mut self) -> Option<String> {
        self.clipboard.clone()
    }

    fn request_scrollback(&mut self) {
        tracing::trace!("scrollback requested");
    }

    fn input_committed(&mut self, line: &str) {
        tracing::debug!(%line, "input committed");
    }

    fn escape_pressed(&mut self) {
        tracing::trace!("escape pressed");
    }

    fn unhandled_event(&mut self, event: &InputEvent) {
        tracing::trace!(?event, "unhandled event");
    }
}

impl Drop for TerminalHost {
    fn drop(&mut self) {
        if let Some(actor) = self.input_actor.take() {
            actor.join();
        }

        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show);
        if self.config.bracketed_paste {
            let _ = execute!(stdout, DisableBracketedPaste);
        }
        if self.config.focus_reporting {
            let _ = execute!(stdout, DisableFocusChange);
        }
        if self.config.enable_mouse {
            let _ = execute!(stdout, DisableMouseCapture);
        }
        if self.config.alternate_screen {
            let _ = execute!(stdout, LeaveAlternateScreen);
        }
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_handle_is_shared() {
        let session = SessionHandle::new();
        let other = session.clone();
        assert!(session.is_running());
        other.end();
        assert!(!session.is_running());
    }

    #[test]
    fn test_default_config_reports_focus() {
        let config = HostConfig::default();
        assert!(config.focus_reporting);
        assert!(config.interrupt_ends_session);
    }
}
