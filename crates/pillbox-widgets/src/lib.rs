#![forbid(unsafe_code)]

//! Pill widgets.
//!
//! [`pill::Pill`] draws a single tag with optional icon and close button and
//! owns its pointer/keyboard wiring. [`pill_list::PillList`] lays out many
//! pills inline and routes input to the right one.

pub mod pill;
pub mod pill_list;

pub use pill::{
    FocusTarget, Pill, PillCallback, PillOptions, PillOutcome, PillRecord, PillState,
    ResolvedPillOptions,
};
pub use pill_list::{PillItem, PillKey, PillList, PillListState};

use pillbox_core::geometry::Rect;
use pillbox_core::glyph_policy::GlyphPolicy;
use pillbox_render::cell::Cell;
use pillbox_render::frame::Frame;
use pillbox_style::Style;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A renderable component.
pub trait Widget {
    /// Render into the frame within `area`.
    fn render(&self, area: Rect, frame: &mut Frame);
}

/// A widget whose rendering reads (and may update) external state.
pub trait StatefulWidget {
    type State;

    /// Render into the frame within `area`.
    fn render(&self, area: Rect, frame: &mut Frame, state: &mut Self::State);
}

/// Helper to apply style to a cell.
pub(crate) fn apply_style(cell: &mut Cell, style: Style) {
    style.apply_to(cell);
}

/// Draw `n` styled spaces starting at `x`, stopping at `max_x` (exclusive).
///
/// Returns the x position after the last drawn cell.
pub(crate) fn draw_spaces(
    frame: &mut Frame,
    mut x: u16,
    y: u16,
    n: u16,
    style: Style,
    max_x: u16,
) -> u16 {
    let mut cell = Cell::from_char(' ');
    apply_style(&mut cell, style);
    for _ in 0..n {
        if x >= max_x {
            break;
        }
        frame.buffer.set(x, y, cell);
        x += 1;
    }
    x
}

/// Draw a text span into the frame at the given position.
///
/// Returns the x position after the last drawn character. Graphemes that
/// would cross `max_x` (exclusive) are not drawn.
///
/// A cell holds one scalar. Narrow clusters draw their base character, and
/// wide multi-scalar clusters such as flags or skin-tone emoji draw
/// [`GlyphPolicy::ICON_FALLBACK`] in their first cell.
pub(crate) fn draw_text_span(
    frame: &mut Frame,
    mut x: u16,
    y: u16,
    content: &str,
    style: Style,
    max_x: u16,
) -> u16 {
    for grapheme in content.graphemes(true) {
        if x >= max_x {
            break;
        }
        let w = UnicodeWidthStr::width(grapheme);
        if w == 0 {
            continue;
        }
        if x as usize + w > max_x as usize {
            break;
        }
        let mut chars = grapheme.chars();
        if let Some(first) = chars.next() {
            let c = if w > 1 && chars.next().is_some() {
                GlyphPolicy::ICON_FALLBACK
            } else {
                first
            };
            let mut cell = Cell::from_char(c);
            apply_style(&mut cell, style);
            frame.buffer.set(x, y, cell);
        }
        x = x.saturating_add(w as u16);
    }
    x
}
