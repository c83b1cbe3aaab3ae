//! Terminal backend: a crossterm [`Host`](crate::Host) and its diffing
//! presenter.

mod host;
mod presenter;

pub use host::{HostConfig, SessionHandle, TerminalHost};
pub use presenter::{Presenter, RenderStats};
