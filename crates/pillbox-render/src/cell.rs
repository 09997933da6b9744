#![forbid(unsafe_code)]

//! Screen cells and their colors.

use crate::char_width;
use std::fmt;

/// What a cell shows.
///
/// A grapheme cluster is stored by its first scalar. The buffer takes the
/// width from that scalar when the cell is written, so a double-width glyph
/// occupies its head cell plus one [`CellContent::Continuation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellContent {
    #[default]
    Empty,
    Char(char),
    /// Trailing half of a wide glyph.
    Continuation,
}

impl CellContent {
    #[inline]
    pub const fn from_char(c: char) -> Self {
        Self::Char(c)
    }

    #[inline]
    pub const fn is_continuation(self) -> bool {
        matches!(self, Self::Continuation)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    #[inline]
    pub const fn as_char(self) -> Option<char> {
        match self {
            Self::Char(c) => Some(c),
            Self::Empty | Self::Continuation => None,
        }
    }

    /// Columns taken by the content. Empty and continuation cells are 0.
    #[inline]
    pub fn width(self) -> usize {
        self.as_char().map_or(0, char_width)
    }
}

/// One screen cell.
///
/// The default is empty, white on transparent, with no attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub content: CellContent,
    pub fg: PackedRgba,
    pub bg: PackedRgba,
    pub attrs: StyleFlags,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            content: CellContent::Empty,
            fg: PackedRgba::WHITE,
            bg: PackedRgba::TRANSPARENT,
            attrs: StyleFlags::empty(),
        }
    }
}

impl Cell {
    /// Filler for the trailing half of a wide glyph.
    pub const CONTINUATION: Self = Self {
        content: CellContent::Continuation,
        fg: PackedRgba::TRANSPARENT,
        bg: PackedRgba::TRANSPARENT,
        attrs: StyleFlags::empty(),
    };

    #[inline]
    pub fn from_char(c: char) -> Self {
        Self {
            content: CellContent::Char(c),
            ..Self::default()
        }
    }

    #[inline]
    pub const fn is_continuation(&self) -> bool {
        self.content.is_continuation()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    #[inline]
    pub const fn with_fg(mut self, fg: PackedRgba) -> Self {
        self.fg = fg;
        self
    }

    #[inline]
    pub const fn with_bg(mut self, bg: PackedRgba) -> Self {
        self.bg = bg;
        self
    }
}

/// An RGBA color packed as `0xRRGGBBAA`.
///
/// Pill backgrounds resolved from color tokens end up here; alpha 0 means
/// "let whatever is underneath show".
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct PackedRgba(pub u32);

impl PackedRgba {
    pub const TRANSPARENT: Self = Self(0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, u8::MAX)
    }

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(u32::from_be_bytes([r, g, b, a]))
    }

    #[inline]
    pub const fn r(self) -> u8 {
        self.0.to_be_bytes()[0]
    }

    #[inline]
    pub const fn g(self) -> u8 {
        self.0.to_be_bytes()[1]
    }

    #[inline]
    pub const fn b(self) -> u8 {
        self.0.to_be_bytes()[2]
    }

    #[inline]
    pub const fn a(self) -> u8 {
        self.0.to_be_bytes()[3]
    }

    /// Perceived brightness in `0..=255`, Rec. 601 weights. Alpha is ignored.
    #[inline]
    pub const fn luminance(self) -> u8 {
        let [r, g, b, _] = self.0.to_be_bytes();
        let y = 299 * r as u32 + 587 * g as u32 + 114 * b as u32;
        (y / 1000) as u8
    }
}

impl fmt::Debug for PackedRgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08x}", self.0)
    }
}

bitflags::bitflags! {
    /// Text attributes a stylesheet class can switch on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StyleFlags: u8 {
        const BOLD      = 1;
        const DIM       = 1 << 1;
        const ITALIC    = 1 << 2;
        const UNDERLINE = 1 << 3;
        /// Swap foreground and background.
        const REVERSE   = 1 << 4;
    }
}
