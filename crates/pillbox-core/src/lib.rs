#![forbid(unsafe_code)]

//! Core: geometry, canonical input events, glyph policy, and logging.

pub mod event;
pub mod geometry;
pub mod glyph_policy;
pub mod logging;

#[cfg(feature = "tracing")]
pub use logging::{debug, trace, warn};
