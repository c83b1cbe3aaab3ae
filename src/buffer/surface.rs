//! Surface: the persistent story canvas.
//!
//! The surface retains everything the engine has drawn. Cells are stored
//! contiguously in row-major order (`index = y * width + x`). All mutating
//! operations report the rectangle they touched so callers can repaint only
//! that area.

use super::cell::{Cell, Rgb, Style};
use super::image::Image;
use crate::error::{ConsoleError, Result};
use crate::layout::Rect;
use unicode_segmentation::UnicodeSegmentation;

/// A grid of cells holding rendered story output.
#[derive(Clone, PartialEq, Eq)]
pub struct Surface {
    /// Contiguous cell storage (row-major order).
    cells: Vec<Cell>,
    width: u16,
    height: u16,
}

impl Surface {
    /// Create a surface filled with blanks in `bg`.
    ///
    /// # Panics
    /// Panics if width or height is 0.
    pub fn new(width: u16, height: u16, bg: Rgb) -> Self {
        assert!(width > 0 && height > 0, "Surface dimensions must be non-zero");
        Self {
            cells: vec![Cell::blank(bg); usize::from(width) * usize::from(height)],
            width,
            height,
        }
    }

    /// Get the surface width.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the surface height.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The rectangle covering the whole surface.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Get the total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the surface is empty (never true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get a reference to the underlying cell slice.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Convert (x, y) coordinates to a linear index.
    ///
    /// Returns `None` if coordinates are out of bounds.
    #[inline]
    pub fn index_of(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(usize::from(y) * usize::from(self.width) + usize::from(x))
        } else {
            None
        }
    }

    /// Get a reference to a cell at (x, y).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index_of(x, y).map(|i| &self.cells[i])
    }

    /// Set a cell at (x, y).
    ///
    /// Returns `false` if coordinates are out of bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if let Some(idx) = self.index_of(x, y) {
            self.cells[idx] = cell;
            true
        } else {
            false
        }
    }

    /// Get an iterator over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(usize::from(self.width))
    }

    /// Fill a rectangular region with a cell, clipped to the surface.
    ///
    /// Returns the area actually filled.
    pub fn fill_rect(&mut self, rect: Rect, cell: Cell) -> Rect {
        let area = rect.intersection(&self.bounds());
        let w = usize::from(self.width);
        for row in area.y..area.bottom() {
            let start = usize::from(row) * w + usize::from(area.x);
            self.cells[start..start + usize::from(area.width)].fill(cell);
        }
        area
    }

    /// Fill the whole surface with blanks in `bg`.
    pub fn clear(&mut self, bg: Rgb) {
        self.cells.fill(Cell::blank(bg));
    }

    /// Draw a run of text starting at (x, y) on a single row.
    ///
    /// Control characters are skipped. Text running past the right edge is
    /// clipped; a wide character that does not fit is dropped. Returns the
    /// area painted.
    pub fn draw_text(&mut self, x: u16, y: u16, text: &str, style: Style) -> Rect {
        if y >= self.height || x >= self.width {
            return Rect::ZERO;
        }
        let mut col = x;
        let (mut left, mut right) = (x, x);
        for c in text.chars().filter(|c| !c.is_control()) {
            let cell = style.cell(c);
            let w = u16::from(cell.display_width());
            if col + w > self.width {
                break;
            }
            let (l, r) = self.split_wide_partners(col, y, w);
            left = left.min(l);
            right = right.max(r);
            self.set(col, y, cell);
            if w == 2 {
                self.set(col + 1, y, Cell::wide_continuation().with_bg(style.bg));
            }
            col += w;
        }
        Rect::new(left, y, right.max(col) - left, 1)
    }

    /// Blank the halves of wide characters that writing `w` cells at
    /// (x, y) would cut in two. Returns the columns touched, end exclusive.
    fn split_wide_partners(&mut self, x: u16, y: u16, w: u16) -> (u16, u16) {
        let (mut left, mut right) = (x, x + w);
        if x > 0 && self.get(x, y).is_some_and(Cell::is_wide_continuation) {
            if let Some(lead) = self.get(x - 1, y).filter(|c| c.display_width() == 2) {
                let bg = lead.bg();
                self.set(x - 1, y, Cell::blank(bg));
                left = x - 1;
            }
        }
        let last = x + w - 1;
        if self.get(last, y).is_some_and(|c| c.display_width() == 2) {
            if let Some(tail) = self.get(last + 1, y).filter(|c| c.is_wide_continuation()) {
                let bg = tail.bg();
                self.set(last + 1, y, Cell::blank(bg));
                right = last + 2;
            }
        }
        (left, right)
    }

    /// Shift the contents of `region` up by `distance` rows and blank the
    /// rows uncovered at the bottom.
    ///
    /// Only the exposed band is filled: the bottom `distance` rows of the
    /// region, or the whole region when `distance` reaches its height. Rows
    /// that merely moved are copied, never refilled. Returns the exposed
    /// band (empty when `distance` is 0 or the region is off-surface).
    pub fn scroll_up(&mut self, region: Rect, distance: u16, bg: Rgb) -> Rect {
        let region = region.intersection(&self.bounds());
        if region.is_empty() || distance == 0 {
            return Rect::ZERO;
        }

        let distance = distance.min(region.height);
        let kept = region.height - distance;
        let w = usize::from(self.width);
        let span = usize::from(region.width);

        for row in region.y..region.y + kept {
            let dst = usize::from(row) * w + usize::from(region.x);
            let src = usize::from(row + distance) * w + usize::from(region.x);
            self.cells.copy_within(src..src + span, dst);
        }

        let exposed = Rect::new(region.x, region.y + kept, region.width, distance);
        self.fill_rect(exposed, Cell::blank(bg))
    }

    /// Copy `image` onto the surface with its top-left at (x, y), clipped.
    ///
    /// Returns the area painted.
    pub fn blit(&mut self, image: &Image, x: u16, y: u16) -> Rect {
        let target = Rect::new(x, y, image.width(), image.height()).intersection(&self.bounds());
        for row in target.y..target.bottom() {
            for col in target.x..target.right() {
                if let Some(cell) = image.get(col - x, row - y) {
                    self.set(col, row, *cell);
                }
            }
        }
        target
    }

    /// Resize the surface, keeping existing content anchored at the top-left.
    ///
    /// Newly uncovered cells are filled with `bg`. Zero-sized geometry is
    /// rejected and the surface is left untouched.
    pub fn resize(&mut self, new_width: u16, new_height: u16, bg: Rgb) -> Result<()> {
        if new_width == 0 || new_height == 0 {
            return Err(ConsoleError::InvalidGeometry {
                width: new_width,
                height: new_height,
            });
        }
        if new_width == self.width && new_height == self.height {
            return Ok(());
        }

        let mut resized = Self::new(new_width, new_height, bg);
        let copy_width = usize::from(self.width.min(new_width));
        let copy_height = usize::from(self.height.min(new_height));

        for y in 0..copy_height {
            let old_start = y * usize::from(self.width);
            let new_start = y * usize::from(new_width);
            resized.cells[new_start..new_start + copy_width]
                .copy_from_slice(&self.cells[old_start..old_start + copy_width]);
        }

        *self = resized;
        Ok(())
    }

    /// The text of row `y`, one char per occupied cell.
    pub fn row_text(&self, y: u16) -> String {
        self.rows()
            .nth(usize::from(y))
            .map(|row| {
                row.iter()
                    .filter(|c| !c.is_wide_continuation())
                    .map(Cell::ch)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The word under cell (x, y), if that cell is part of one.
    ///
    /// Word boundaries follow Unicode word segmentation; a segment counts
    /// as a word when it contains an alphanumeric character.
    pub fn word_at(&self, x: u16, y: u16) -> Option<String> {
        let row = self.rows().nth(usize::from(y))?;
        if x >= self.width {
            return None;
        }

        let mut text = String::with_capacity(row.len());
        let mut target = None;
        for (col, cell) in row.iter().enumerate() {
            if cell.is_wide_continuation() {
                continue;
            }
            if col <= usize::from(x) {
                target = Some(text.len());
            }
            text.push(cell.ch());
        }
        let target = target?;

        text.split_word_bound_indices()
            .find(|(start, word)| (*start..start + word.len()).contains(&target))
            .map(|(_, word)| word)
            .filter(|word| word.chars().any(char::is_alphanumeric))
            .map(str::to_owned)
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
