//! # Fable
//!
//! A story console for text adventure interpreters.
//!
//! The engine prints styled text onto a persistent cell surface, scrolls
//! it, and blocks in [`Console::get_next_key`] or [`Console::get_input`]
//! while the player types. The console never spawns threads of its own:
//! while the engine waits it pumps a [`Host`], handling UI events, firing
//! the caret and mute timers, and presenting only what changed.
//!
//! ## Core Concepts
//!
//! - **Batched output**: printed text is drawn in one run at the next flush
//! - **Exposed-band scrolling**: scrolling copies rows and blanks only the
//!   newly uncovered band
//! - **Line editing**: word motion, history recall and paste on one line
//! - **Host seam**: a terminal host is provided; tests script their own
//!
//! ## Example
//!
//! ```rust,ignore
//! use fable::{Console, ConsoleConfig, Outcome, TerminalHost};
//!
//! let host = TerminalHost::new()?;
//! let mut console = Console::new(host, ConsoleConfig::default())?;
//!
//! console.print_text("West of House", 0, 0);
//! console.print_text(">", 0, 2);
//! if let Outcome::Ready(command) = console.get_input(80, 1, 2) {
//!     // hand `command` to the parser
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod buffer;
pub mod config;
pub mod console;
pub mod error;
pub mod layout;
pub mod terminal;
pub mod timer;

// Re-exports for convenience
pub use actor::{InputEvent, KeyCode, KeyModifiers, MouseButton, MouseEvent};
pub use buffer::{Cell, Image, Modifiers, Rgb, Style, Surface};
pub use config::{CaretBlurPolicy, ConsoleConfig};
pub use console::{Console, FontFlags, History, Host, InputMode, KeyPress, LineEditor, MenuEntry, Outcome};
pub use error::{ConsoleError, Result};
pub use layout::Rect;
pub use terminal::{HostConfig, SessionHandle, TerminalHost};
