//! Image: a rectangular block of pre-rendered cells.
//!
//! Engines hand pictures to the console already converted to cells (for
//! example block-art or a thumbnail rendered with half blocks). The console
//! only blits them.

use super::cell::{Cell, Style};

/// A block of cells that can be blitted onto a [`Surface`](super::Surface).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    cells: Vec<Cell>,
    width: u16,
    height: u16,
}

impl Image {
    /// Create an image filled with `fill`.
    pub fn new(width: u16, height: u16, fill: Cell) -> Self {
        Self {
            cells: vec![fill; usize::from(width) * usize::from(height)],
            width,
            height,
        }
    }

    /// Build an image from lines of text drawn in `style`.
    ///
    /// The image is as wide as the widest line; shorter lines are padded
    /// with blanks in the style's background.
    pub fn from_lines(lines: &[&str], style: Style) -> Self {
        let width = lines
            .iter()
            .map(|l| l.chars().map(|c| usize::from(Cell::new(c).display_width())).sum::<usize>())
            .max()
            .unwrap_or(0);
        let width = u16::try_from(width).unwrap_or(u16::MAX);
        let height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        let mut image = Self::new(width, height, Cell::blank(style.bg));

        for (y, line) in lines.iter().enumerate().take(usize::from(height)) {
            let Ok(row) = u16::try_from(y) else { break };
            let mut x = 0u16;
            for c in line.chars() {
                let cell = style.cell(c);
                let w = u16::from(cell.display_width());
                if x + w > width {
                    break;
                }
                image.set(x, row, cell);
                if w == 2 {
                    image.set(x + 1, row, Cell::wide_continuation().with_bg(style.bg));
                }
                x += w;
            }
        }
        image
    }

    /// Image width in cells.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Image height in cells.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Get the cell at (x, y).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if x < self.width && y < self.height {
            self.cells.get(usize::from(y) * usize::from(self.width) + usize::from(x))
        } else {
            None
        }
    }

    /// Set the cell at (x, y). Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[usize::from(y) * usize::from(self.width) + usize::from(x)] = cell;
        }
    }
}
