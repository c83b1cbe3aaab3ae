//! Input Actor: Dedicated thread for polling terminal events.
//!
//! This actor runs in its own thread and uses crossterm's event polling to
//! capture keyboard, mouse, focus, paste and resize events. It owns no
//! console state; it only forwards converted events over a channel that the
//! console drains while the engine waits.

use super::messages::{InputEvent, KeyCode, KeyModifiers, MouseButton, MouseEvent};
use crossbeam_channel::{SendTimeoutError, Sender};
use crossterm::event::{self, Event, KeyEventKind};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Input actor that polls terminal events.
pub struct InputActor {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl InputActor {
    /// Spawn the input actor thread.
    ///
    /// `poll_timeout` bounds how long the thread waits for an event before
    /// re-checking for shutdown.
    pub fn spawn(sender: Sender<InputEvent>, poll_timeout: Duration) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("fable-input".to_string())
            .spawn(move || {
                Self::run_loop(&sender, &shutdown_clone, poll_timeout);
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the input thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the input thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn run_loop(sender: &Sender<InputEvent>, shutdown: &AtomicBool, poll_timeout: Duration) {
        while !shutdown.load(Ordering::Relaxed) {
            let event = match event::poll(poll_timeout) {
                Ok(true) => match event::read() {
                    Ok(event) => Self::convert_event(event),
                    Err(e) => Some(InputEvent::Error(e.to_string())),
                },
                Ok(false) => None,
                Err(e) => Some(InputEvent::Error(e.to_string())),
            };

            if let Some(event) = event {
                tracing::trace!(?event, "terminal event");
                if !Self::forward(sender, shutdown, event, poll_timeout) {
                    break;
                }
            }
        }
    }

    /// Send `event`, waiting while the channel is full but giving up once
    /// shutdown is requested. Returns `false` when the loop should exit.
    fn forward(
        sender: &Sender<InputEvent>,
        shutdown: &AtomicBool,
        mut event: InputEvent,
        retry: Duration,
    ) -> bool {
        loop {
            match sender.send_timeout(event, retry) {
                Ok(()) => return true,
                // Receiver dropped
                Err(SendTimeoutError::Disconnected(_)) => return false,
                Err(SendTimeoutError::Timeout(unsent)) => {
                    if shutdown.load(Ordering::Relaxed) {
                        tracing::debug!("dropping input event on shutdown");
                        return false;
                    }
                    event = unsent;
                }
            }
        }
    }

    /// Convert a crossterm event to our `InputEvent`.
    pub(crate) fn convert_event(event: Event) -> Option<InputEvent> {
        match event {
            Event::Key(key_event) => {
                // Only process key press events (not release or repeat)
                if key_event.kind != KeyEventKind::Press {
                    return None;
                }

                let code = Self::convert_key_code(key_event.code)?;
                let modifiers = Self::convert_modifiers(key_event.modifiers);

                Some(InputEvent::Key { code, modifiers })
            }

            Event::Mouse(mouse_event) => Self::convert_mouse_event(mouse_event),

            Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),

            Event::FocusGained => Some(InputEvent::FocusGained),

            Event::FocusLost => Some(InputEvent::FocusLost),

            Event::Paste(text) => Some(InputEvent::Paste(text)),
        }
    }

    fn convert_key_code(code: event::KeyCode) -> Option<KeyCode> {
        Some(match code {
            event::KeyCode::Char(c) => KeyCode::Char(c),
            event::KeyCode::F(n) => KeyCode::F(n),
            event::KeyCode::Backspace => KeyCode::Backspace,
            event::KeyCode::Enter => KeyCode::Enter,
            event::KeyCode::Left => KeyCode::Left,
            event::KeyCode::Right => KeyCode::Right,
            event::KeyCode::Up => KeyCode::Up,
            event::KeyCode::Down => KeyCode::Down,
            event::KeyCode::Home => KeyCode::Home,
            event::KeyCode::End => KeyCode::End,
            event::KeyCode::PageUp => KeyCode::PageUp,
            event::KeyCode::PageDown => KeyCode::PageDown,
            event::KeyCode::Tab => KeyCode::Tab,
            event::KeyCode::BackTab => KeyCode::BackTab,
            event::KeyCode::Delete => KeyCode::Delete,
            event::KeyCode::Insert => KeyCode::Insert,
            event::KeyCode::Esc => KeyCode::Esc,
            event::KeyCode::Null => KeyCode::Null,
            _ => return None,
        })
    }

    fn convert_modifiers(mods: event::KeyModifiers) -> KeyModifiers {
        KeyModifiers {
            shift: mods.contains(event::KeyModifiers::SHIFT),
            control: mods.contains(event::KeyModifiers::CONTROL),
            alt: mods.contains(event::KeyModifiers::ALT),
            super_key: mods.contains(event::KeyModifiers::SUPER),
        }
    }

    fn convert_mouse_event(mouse: event::MouseEvent) -> Option<InputEvent> {
        match mouse.kind {
            event::MouseEventKind::Down(button) => Some(InputEvent::MouseDown(MouseEvent {
                x: mouse.column,
                y: mouse.row,
                button: Some(Self::convert_mouse_button(button)),
                modifiers: Self::convert_modifiers(mouse.modifiers),
            })),
            event::MouseEventKind::ScrollUp => Some(InputEvent::MouseScroll {
                x: mouse.column,
                y: mouse.row,
                delta: 1,
            }),
            event::MouseEventKind::ScrollDown => Some(InputEvent::MouseScroll {
                x: mouse.column,
                y: mouse.row,
                delta: -1,
            }),
            _ => None,
        }
    }

    const fn convert_mouse_button(button: event::MouseButton) -> MouseButton {
        match button {
            event::MouseButton::Left => MouseButton::Left,
            event::MouseButton::Right => MouseButton::Right,
            event::MouseButton::Middle => MouseButton::Middle,
        }
    }
}

impl Drop for InputActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyEventState, MouseEventKind};

    #[test]
    fn test_full_channel_does_not_block_shutdown() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        tx.send(InputEvent::Repaint).unwrap();
        let shutdown = Arc::new(AtomicBool::new(false));

        let flag = shutdown.clone();
        let sender = thread::spawn(move || {
            InputActor::forward(&tx, &flag, InputEvent::FocusLost, Duration::from_millis(5))
        });
        thread::sleep(Duration::from_millis(20));
        shutdown.store(true, Ordering::Relaxed);

        // The receiver is still alive and nobody drains it.
        assert!(!sender.join().unwrap());
        assert_eq!(rx.len(), 1);
    }

    #[test]
    fn test_forward_stops_when_receiver_is_gone() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        drop(rx);
        let shutdown = AtomicBool::new(false);
        assert!(!InputActor::forward(&tx, &shutdown, InputEvent::Repaint, Duration::from_millis(5)));
    }

    #[test]
    fn test_converts_key_press_with_modifiers() {
        let event = Event::Key(KeyEvent::new(
            event::KeyCode::Left,
            event::KeyModifiers::CONTROL,
        ));
        assert_eq!(
            InputActor::convert_event(event),
            Some(InputEvent::key_with(KeyCode::Left, KeyModifiers::CONTROL))
        );
    }

    #[test]
    fn test_ignores_key_release() {
        let event = Event::Key(KeyEvent {
            code: event::KeyCode::Char('a'),
            modifiers: event::KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(InputActor::convert_event(event), None);
    }

    #[test]
    fn test_converts_left_click() {
        let event = Event::Mouse(event::MouseEvent {
            kind: MouseEventKind::Down(event::MouseButton::Left),
            column: 10,
            row: 20,
            modifiers: event::KeyModifiers::NONE,
        });
        assert_eq!(InputActor::convert_event(event), Some(InputEvent::click(10, 20)));
    }

    #[test]
    fn test_converts_focus_and_resize() {
        assert_eq!(InputActor::convert_event(Event::FocusLost), Some(InputEvent::FocusLost));
        assert_eq!(
            InputActor::convert_event(Event::Resize(100, 40)),
            Some(InputEvent::Resize { width: 100, height: 40 })
        );
    }
}
