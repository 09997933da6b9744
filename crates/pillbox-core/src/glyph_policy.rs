#![forbid(unsafe_code)]

//! Glyph capability policy (Unicode/ASCII and emoji).
//!
//! Pills draw a handful of decorative glyphs: the close mark and the
//! half-disc end caps used for rounded pills. This module decides which
//! variants to use. Decisions are deterministic given environment variables.

use unicode_width::UnicodeWidthChar;

/// Environment variable to override glyph mode (`unicode` or `ascii`).
pub const ENV_GLYPH_MODE: &str = "PILLBOX_GLYPH_MODE";
/// Environment variable to override emoji support (`1/0/true/false`).
pub const ENV_GLYPH_EMOJI: &str = "PILLBOX_GLYPH_EMOJI";

/// Overall glyph rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlyphMode {
    /// Use Unicode glyphs.
    #[default]
    Unicode,
    /// Use ASCII-only fallbacks.
    Ascii,
}

impl GlyphMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "unicode" | "uni" | "u" => Some(Self::Unicode),
            "ascii" | "ansi" | "a" => Some(Self::Ascii),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unicode => "unicode",
            Self::Ascii => "ascii",
        }
    }
}

/// Glyph capability policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphPolicy {
    /// Overall glyph mode (Unicode vs ASCII).
    pub mode: GlyphMode,
    /// Whether emoji icons should be drawn as-is.
    ///
    /// When false, icons wider than one cell are replaced by
    /// [`GlyphPolicy::ICON_FALLBACK`].
    pub emoji: bool,
}

impl Default for GlyphPolicy {
    fn default() -> Self {
        Self {
            mode: GlyphMode::Unicode,
            emoji: true,
        }
    }
}

impl GlyphPolicy {
    /// Close mark in Unicode mode.
    pub const CLOSE_UNICODE: char = '×';
    /// Close mark in ASCII mode.
    pub const CLOSE_ASCII: char = 'x';
    /// Stand-in drawn for emoji icons when emoji are disabled.
    pub const ICON_FALLBACK: char = '*';

    /// ASCII-only policy.
    #[must_use]
    pub const fn ascii() -> Self {
        Self {
            mode: GlyphMode::Ascii,
            emoji: false,
        }
    }

    /// Detect policy from the process environment.
    #[must_use]
    pub fn detect() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Detect policy using a custom environment lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = get_env(ENV_GLYPH_MODE)
            .and_then(|value| GlyphMode::parse(&value))
            .unwrap_or_default();

        let emoji = match mode {
            GlyphMode::Ascii => false,
            GlyphMode::Unicode => env_override_bool(&get_env, ENV_GLYPH_EMOJI).unwrap_or(true),
        };

        crate::debug!(mode = mode.as_str(), emoji, "glyph policy detected");
        Self { mode, emoji }
    }

    /// The close mark for this policy.
    #[must_use]
    pub const fn close_glyph(&self) -> char {
        match self.mode {
            GlyphMode::Unicode => Self::CLOSE_UNICODE,
            GlyphMode::Ascii => Self::CLOSE_ASCII,
        }
    }

    /// Left and right end caps for rounded pills.
    #[must_use]
    pub const fn rounded_caps(&self) -> (char, char) {
        match self.mode {
            GlyphMode::Unicode => ('◖', '◗'),
            GlyphMode::Ascii => ('(', ')'),
        }
    }

    /// Whether `icon` can be drawn under this policy.
    ///
    /// Wide glyphs (emoji, CJK) need emoji support; ASCII mode only admits
    /// ASCII text.
    #[must_use]
    pub fn admits_icon(&self, icon: &str) -> bool {
        match self.mode {
            GlyphMode::Ascii => icon.is_ascii(),
            GlyphMode::Unicode => {
                self.emoji
                    || icon
                        .chars()
                        .all(|c| c.width().is_none_or(|width| width <= 1))
            }
        }
    }
}

fn env_override_bool<F>(get_env: &F, key: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let value = get_env(key)?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
