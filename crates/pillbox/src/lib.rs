#![forbid(unsafe_code)]

//! Pillbox public facade crate.
//!
//! Re-exports the pill widgets together with the geometry, event, render,
//! and style types they are driven with, plus a prelude for day-to-day use.
//!
//! ```
//! use pillbox::prelude::*;
//!
//! let list = PillList::from_records([
//!     PillRecord::new("rust").bgcolor("#dea584"),
//!     PillRecord::new("tui").icon("🎂"),
//! ])
//! .with_options(PillOptions::new().rounded(true).on_close(|pill| {
//!     println!("closed {}", pill.label);
//! }));
//!
//! let mut frame = Frame::with_hit_grid(40, 2);
//! let mut state = PillListState::new();
//! list.render(Rect::from_size(40, 2), &mut frame, &mut state);
//! assert_eq!(frame.semantics().by_role(Role::List).len(), 1);
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use pillbox_core::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, MouseButton, MouseEvent, MouseEventKind,
    ScrollDirection,
};
pub use pillbox_core::geometry::Rect;
pub use pillbox_core::glyph_policy::{GlyphMode, GlyphPolicy};

// --- Render re-exports -----------------------------------------------------

pub use pillbox_render::buffer::Buffer;
pub use pillbox_render::cell::{Cell, PackedRgba};
pub use pillbox_render::frame::{Frame, HitData, HitId, HitRegion};
pub use pillbox_render::semantics::{NodeId, Role, SemanticNode, SemanticTree};

// --- Style re-exports ------------------------------------------------------

pub use pillbox_style::{
    ColorParseError, PillTheme, Style, StyleFlags, StyleSheet, parse_color,
};

// --- Widget re-exports -----------------------------------------------------

pub use pillbox_widgets::{
    FocusTarget, Pill, PillCallback, PillItem, PillKey, PillList, PillListState, PillOptions,
    PillOutcome, PillRecord, PillState, ResolvedPillOptions, StatefulWidget, Widget,
};

// --- Harness re-exports ----------------------------------------------------

#[cfg(feature = "harness")]
pub use pillbox_harness::{QueryError, Screen, ScreenConfig};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for pillbox apps.
#[derive(Debug)]
pub enum Error {
    /// A color token could not be parsed.
    Color(ColorParseError),
    /// A screen query or action failed.
    #[cfg(feature = "harness")]
    Query(QueryError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color(err) => write!(f, "{err}"),
            #[cfg(feature = "harness")]
            Self::Query(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Color(err) => Some(err),
            #[cfg(feature = "harness")]
            Self::Query(err) => Some(err),
        }
    }
}

impl From<ColorParseError> for Error {
    fn from(err: ColorParseError) -> Self {
        Self::Color(err)
    }
}

#[cfg(feature = "harness")]
impl From<QueryError> for Error {
    fn from(err: QueryError) -> Self {
        Self::Query(err)
    }
}

/// Standard result type for pillbox APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Error, Event, FocusTarget, Frame, GlyphPolicy, KeyCode, PillList, PillListState,
        PillOptions, PillOutcome, PillRecord, PillTheme, Rect, Result, Role, StatefulWidget,
        Style,
    };

    #[cfg(feature = "harness")]
    pub use crate::Screen;

    pub use crate::{core, render, style, widgets};
}

pub use pillbox_core as core;
#[cfg(feature = "harness")]
pub use pillbox_harness as harness;
pub use pillbox_render as render;
pub use pillbox_style as style;
pub use pillbox_widgets as widgets;
