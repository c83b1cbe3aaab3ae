//! Buffer module: the cell canvas the story is drawn on.
//!
//! This module contains:
//! - [`Cell`]: one character position with colours and modifiers
//! - [`Surface`]: the persistent grid of cells the engine draws into
//! - [`Image`]: a pre-rendered block of cells for blitting
//! - [`diff`]: minimal ANSI output between two surfaces

mod cell;
mod image;
mod surface;
pub mod diff;

pub use cell::{Cell, CellFlags, Modifiers, Rgb, Style};
pub use image::Image;
pub use surface::Surface;
