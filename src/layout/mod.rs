//! Layout module: rectangles addressing surface regions.

mod rect;

pub use rect::Rect;
