#![forbid(unsafe_code)]

//! Buffer grid storage.
//!
//! The `Buffer` is a 2D grid of [`Cell`]s. Cells are stored in row-major
//! order: `index = y * width + x`.
//!
//! # Invariants
//!
//! 1. `cells.len() == width * height`
//! 2. Width and height never change after creation
//! 3. A wide character is written whole or not at all; its trailing cells
//!    hold [`Cell::CONTINUATION`]

use crate::cell::Cell;
use pillbox_core::geometry::Rect;

/// A 2D grid of cells.
///
/// # Example
///
/// ```
/// use pillbox_render::buffer::Buffer;
/// use pillbox_render::cell::Cell;
///
/// let mut buffer = Buffer::new(80, 24);
/// buffer.set(0, 0, Cell::from_char('H'));
/// buffer.set(1, 0, Cell::from_char('i'));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    /// Create a new buffer with the given dimensions.
    ///
    /// A zero dimension yields a buffer with no cells; every write is then
    /// a no-op.
    pub fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::default(); size],
        }
    }

    /// Buffer width in cells.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Buffer height in cells.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Bounding rect of the entire buffer.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Get a reference to the cell at (x, y).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Get a mutable reference to the cell at (x, y).
    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    /// Set the cell at (x, y).
    ///
    /// Wide characters fill their trailing cells with continuations. If a
    /// wide character does not fit inside the buffer, nothing is written.
    /// Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let width = cell.content.width().max(1);
        let end = x as usize + width;
        if end > self.width as usize || y >= self.height {
            return;
        }

        for i in 0..width {
            let cx = x + i as u16;
            self.clear_wide_overlap(cx, y);
        }

        let head = y as usize * self.width as usize + x as usize;
        self.cells[head] = cell;
        for i in 1..width {
            self.cells[head + i] = Cell {
                bg: cell.bg,
                ..Cell::CONTINUATION
            };
        }
    }

    /// Blank the remains of any wide character that overlaps (x, y).
    fn clear_wide_overlap(&mut self, x: u16, y: u16) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        let row_start = y as usize * self.width as usize;
        let row_end = row_start + self.width as usize;

        if self.cells[idx].is_continuation() {
            // Walk back to the head and blank the whole glyph.
            let mut head = idx;
            while head > row_start && self.cells[head].is_continuation() {
                head -= 1;
            }
            let mut i = head;
            while i < row_end && (i == head || self.cells[i].is_continuation()) {
                self.cells[i] = Cell::default();
                i += 1;
            }
        } else if self.cells[idx].content.width() > 1 {
            let mut i = idx + 1;
            while i < row_end && self.cells[i].is_continuation() {
                self.cells[i] = Cell::default();
                i += 1;
            }
        }
    }

    /// Fill a rectangular region with the given cell.
    pub fn fill(&mut self, rect: Rect, cell: Cell) {
        let clipped = self.bounds().intersection(&rect);
        for y in clipped.y..clipped.bottom() {
            for x in clipped.x..clipped.right() {
                self.set(x, y, cell);
            }
        }
    }

    /// Reset every cell to the default.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Access the raw cell slice.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The text of row `y`, skipping continuation cells and rendering empty
    /// cells as spaces. Trailing spaces are kept.
    pub fn row_text(&self, y: u16) -> String {
        let mut out = String::with_capacity(self.width as usize);
        for x in 0..self.width {
            let Some(cell) = self.get(x, y) else {
                break;
            };
            if cell.is_continuation() {
                continue;
            }
            out.push(cell.content.as_char().unwrap_or(' '));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::PackedRgba;

    #[test]
    fn zero_sized_buffer_ignores_writes() {
        let mut buf = Buffer::new(0, 3);
        buf.set(0, 0, Cell::from_char('A'));
        assert!(buf.cells().is_empty());
        assert!(buf.get(0, 0).is_none());
    }

    #[test]
    fn set_and_get() {
        let mut buf = Buffer::new(4, 2);
        buf.set(1, 1, Cell::from_char('Z'));
        assert_eq!(buf.get(1, 1).unwrap().content.as_char(), Some('Z'));
        assert!(buf.get(4, 0).is_none());
    }

    #[test]
    fn wide_char_writes_continuation() {
        let mut buf = Buffer::new(4, 1);
        buf.set(0, 0, Cell::from_char('🎂').with_bg(PackedRgba::rgb(1, 2, 3)));
        assert_eq!(buf.get(0, 0).unwrap().content.as_char(), Some('🎂'));
        let tail = buf.get(1, 0).unwrap();
        assert!(tail.is_continuation());
        assert_eq!(tail.bg, PackedRgba::rgb(1, 2, 3));
    }

    #[test]
    fn wide_char_that_does_not_fit_is_skipped() {
        let mut buf = Buffer::new(2, 1);
        buf.set(1, 0, Cell::from_char('🎂'));
        assert!(buf.get(1, 0).unwrap().is_empty());
    }

    #[test]
    fn overwriting_tail_clears_head() {
        let mut buf = Buffer::new(4, 1);
        buf.set(0, 0, Cell::from_char('🎂'));
        buf.set(1, 0, Cell::from_char('x'));
        assert!(buf.get(0, 0).unwrap().is_empty());
        assert_eq!(buf.get(1, 0).unwrap().content.as_char(), Some('x'));
    }

    #[test]
    fn overwriting_head_clears_tail() {
        let mut buf = Buffer::new(4, 1);
        buf.set(0, 0, Cell::from_char('🎂'));
        buf.set(0, 0, Cell::from_char('a'));
        assert!(!buf.get(1, 0).unwrap().is_continuation());
    }

    #[test]
    fn fill_clips_to_bounds() {
        let mut buf = Buffer::new(3, 3);
        buf.fill(Rect::new(2, 2, 5, 5), Cell::from_char('#'));
        assert_eq!(buf.get(2, 2).unwrap().content.as_char(), Some('#'));
        assert!(buf.get(1, 1).unwrap().is_empty());
    }

    #[test]
    fn row_text_skips_continuations() {
        let mut buf = Buffer::new(5, 1);
        buf.set(0, 0, Cell::from_char('🎂'));
        buf.set(2, 0, Cell::from_char('A'));
        assert_eq!(buf.row_text(0), "🎂A  ");
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        const GLYPHS: [char; 4] = ['a', '🎂', '日', ' '];

        proptest! {
            #[test]
            fn continuations_always_follow_a_wide_head(
                writes in proptest::collection::vec((0u16..8, 0u16..2, 0usize..4), 0..40)
            ) {
                let mut buf = Buffer::new(8, 2);
                for (x, y, glyph) in writes {
                    buf.set(x, y, Cell::from_char(GLYPHS[glyph]));
                }
                for y in 0..2u16 {
                    for x in 0..8u16 {
                        let cell = buf.get(x, y).unwrap();
                        if cell.is_continuation() {
                            prop_assert!(x > 0);
                            prop_assert_eq!(buf.get(x - 1, y).unwrap().content.width(), 2);
                        }
                        if cell.content.width() == 2 {
                            prop_assert!(buf.get(x + 1, y).unwrap().is_continuation());
                        }
                    }
                }
            }
        }
    }
}
