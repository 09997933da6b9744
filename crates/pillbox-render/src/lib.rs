#![forbid(unsafe_code)]

//! Render kernel: cells, buffers, hit testing, and semantic nodes.
//!
//! A render pass writes into a [`frame::Frame`], which bundles three
//! parallel views of the same screen:
//!
//! - [`buffer::Buffer`]: what is drawn, one [`cell::Cell`] per column/row
//! - [`frame::HitGrid`]: which widget region owns each cell for pointer input
//! - [`semantics::SemanticTree`]: roles, accessible names, classes and focus
//!   for assistive technology and test queries

pub mod buffer;
pub mod cell;
pub mod frame;
pub mod semantics;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a single character in cells.
///
/// Control characters are zero-width.
#[inline]
pub fn char_width(ch: char) -> usize {
    if ch.is_ascii() {
        return match ch {
            ' '..='~' => 1,
            _ => 0,
        };
    }
    ch.width().unwrap_or(0)
}

/// Display width of a grapheme cluster in cells.
#[inline]
pub fn grapheme_width(grapheme: &str) -> usize {
    if grapheme.is_ascii() {
        return grapheme.bytes().filter(|b| (b' '..=b'~').contains(b)).count();
    }
    UnicodeWidthStr::width(grapheme)
}

/// Display width of a string in cells, summed over grapheme clusters.
#[inline]
pub fn display_width(text: &str) -> usize {
    if text.is_ascii() {
        return grapheme_width(text);
    }
    text.graphemes(true).map(grapheme_width).sum()
}
