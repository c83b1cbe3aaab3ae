//! Console module: the story console and its parts.
//!
//! This module contains:
//! - [`Console`]: surface, input line and the engine's blocking API
//! - [`Host`]: what the console needs from the program driving the screen
//! - [`LineEditor`] and [`History`]: the input line and its recall
//! - [`keymap`]: key bindings and the codes queued for the engine
//! - [`TextBatcher`], [`EventQueues`], [`CaretBlink`], [`MuteDebouncer`]:
//!   the smaller state machines the console is built from

mod batcher;
mod blink;
#[allow(clippy::module_inception)]
mod console;
mod editor;
mod history;
mod host;
pub mod keymap;
mod mute;
mod queue;

pub use batcher::TextBatcher;
pub use blink::CaretBlink;
pub use console::{Console, FontFlags, InputMode, KeyPress, MenuEntry, Outcome};
pub use editor::{EditOutcome, LineEditor};
pub use history::History;
pub use host::Host;
pub use keymap::EditAction;
pub use mute::MuteDebouncer;
pub use queue::{EventQueues, CLICK_SENTINEL};
