#![forbid(unsafe_code)]

//! Class-name style registry.
//!
//! Widgets emit class lists (`pill`, `rounded`, caller-supplied names) and
//! the sheet turns them into a [`Style`]. Unknown class names compose to
//! nothing, so callers can pass arbitrary hooks for their own styling.
//!
//! # Example
//! ```
//! use pillbox_style::{Style, StyleSheet};
//! use pillbox_render::cell::PackedRgba;
//!
//! let mut sheet = StyleSheet::new();
//! sheet.define("pill", Style::new().fg(PackedRgba::WHITE));
//! sheet.define("urgent", Style::new().bold());
//!
//! let style = sheet.compose(&["pill", "urgent", "not-defined"]);
//! assert_eq!(style.fg, Some(PackedRgba::WHITE));
//! ```

use crate::style::Style;
use std::collections::HashMap;

/// A registry of styles keyed by class name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSheet {
    styles: HashMap<String, Style>,
}

impl StyleSheet {
    /// Create an empty sheet.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a class. Replaces any existing definition.
    pub fn define(&mut self, name: impl Into<String>, style: Style) {
        self.styles.insert(name.into(), style);
    }

    /// Builder form of [`define`](Self::define).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, style: Style) -> Self {
        self.define(name, style);
        self
    }

    /// Remove a class, returning its style if it existed.
    pub fn remove(&mut self, name: &str) -> Option<Style> {
        self.styles.remove(name)
    }

    /// Look up a class.
    pub fn get(&self, name: &str) -> Option<Style> {
        self.styles.get(name).copied()
    }

    /// Look up a class, or an empty style.
    pub fn get_or_default(&self, name: &str) -> Style {
        self.get(name).unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// All class names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.styles.keys().cloned().collect();
        names.sort();
        names
    }

    /// Compose classes left to right; later classes win conflicting colors.
    ///
    /// Undefined names are skipped.
    pub fn compose<S: AsRef<str>>(&self, names: &[S]) -> Style {
        names.iter().fold(Style::default(), |acc, name| {
            match self.styles.get(name.as_ref()) {
                Some(style) => style.merge(&acc),
                None => acc,
            }
        })
    }

    /// Copy every class from `other`, overriding same-named entries.
    pub fn extend(&mut self, other: &StyleSheet) {
        self.styles
            .extend(other.styles.iter().map(|(k, v)| (k.clone(), *v)));
    }

    pub fn clear(&mut self) {
        self.styles.clear();
    }
}
