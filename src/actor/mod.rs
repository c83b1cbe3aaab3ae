//! Input plumbing between the terminal and the console.
//!
//! The console itself is single-threaded. The only other thread is the
//! input actor, which turns crossterm events into [`InputEvent`]s and sends
//! them over a crossbeam channel. The console drains that channel whenever
//! the engine is waiting for a key or a line.
//!
//! ```text
//! ┌──────────────┐   InputEvent    ┌──────────────┐  get_next_key  ┌────────┐
//! │ Input Thread │ ──────────────▶ │   Console    │ ◀───────────── │ Engine │
//! └──────────────┘                 │ (host pump)  │  get_input     └────────┘
//!                                  └──────────────┘
//! ```

mod input;
mod messages;

pub use input::InputActor;
pub use messages::{InputEvent, KeyCode, KeyModifiers, MouseButton, MouseEvent};
