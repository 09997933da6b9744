#![forbid(unsafe_code)]

//! Style types, color tokens, and class-name stylesheets.

pub mod color;
pub mod style;
pub mod stylesheet;
pub mod theme;

pub use color::{ColorParseError, parse_color};
pub use pillbox_render::cell::StyleFlags;
pub use style::Style;
pub use stylesheet::StyleSheet;
pub use theme::PillTheme;
