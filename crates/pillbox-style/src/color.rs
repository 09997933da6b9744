#![forbid(unsafe_code)]

//! Color token parsing.
//!
//! Pill records carry background colors as free-form strings. This module
//! turns the common CSS spellings into [`PackedRgba`]:
//!
//! - `#rgb`, `#rrggbb`, `#rrggbbaa`
//! - `rgb(r, g, b)` and `rgba(r, g, b, a)` with `a` in `0..=1`
//! - CSS named colors (`lime`, `rebeccapurple`, ...), case-insensitive
//! - `transparent`

use pillbox_render::cell::PackedRgba;
use std::fmt;

/// Why a color token could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// The token was empty or only whitespace.
    Empty,
    /// A `#` token with a length other than 3, 6 or 8 digits, or with
    /// non-hex characters.
    InvalidHex(String),
    /// A malformed `rgb()`/`rgba()` function.
    InvalidFunction(String),
    /// Not a known color name.
    UnknownName(String),
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty color token"),
            Self::InvalidHex(token) => write!(f, "invalid hex color: {token:?}"),
            Self::InvalidFunction(token) => write!(f, "invalid color function: {token:?}"),
            Self::UnknownName(token) => write!(f, "unknown color name: {token:?}"),
        }
    }
}

impl std::error::Error for ColorParseError {}

/// Parse a color token.
pub fn parse_color(token: &str) -> Result<PackedRgba, ColorParseError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ColorParseError::Empty);
    }

    if let Some(hex) = token.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| ColorParseError::InvalidHex(token.to_string()));
    }

    let lower = token.to_ascii_lowercase();
    if lower.starts_with("rgb") {
        return parse_function(&lower)
            .ok_or_else(|| ColorParseError::InvalidFunction(token.to_string()));
    }

    named_color(&lower).ok_or_else(|| ColorParseError::UnknownName(token.to_string()))
}

fn parse_hex(hex: &str) -> Option<PackedRgba> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok();
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => {
            let (r, g, b) = (nibble(0)?, nibble(1)?, nibble(2)?);
            Some(PackedRgba::rgb(r * 17, g * 17, b * 17))
        }
        6 => Some(PackedRgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(PackedRgba::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

fn parse_function(token: &str) -> Option<PackedRgba> {
    let (name, rest) = token.split_once('(')?;
    let args = rest.strip_suffix(')')?;
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();

    let channel = |s: &str| s.parse::<u16>().ok().filter(|v| *v <= 255).map(|v| v as u8);

    match (name.trim(), parts.as_slice()) {
        ("rgb", &[r, g, b]) => Some(PackedRgba::rgb(channel(r)?, channel(g)?, channel(b)?)),
        ("rgba", &[r, g, b, a]) => {
            let alpha = a.parse::<f32>().ok().filter(|v| (0.0..=1.0).contains(v))?;
            Some(PackedRgba::rgba(
                channel(r)?,
                channel(g)?,
                channel(b)?,
                (alpha * 255.0).round() as u8,
            ))
        }
        _ => None,
    }
}

fn named_color(name: &str) -> Option<PackedRgba> {
    NAMED_COLORS
        .binary_search_by(|(candidate, _)| candidate.cmp(&name))
        .ok()
        .map(|i| NAMED_COLORS[i].1)
}

/// CSS named colors, sorted by name for binary search.
const NAMED_COLORS: &[(&str, PackedRgba)] = &[
    ("aqua", PackedRgba::rgb(0, 255, 255)),
    ("black", PackedRgba::rgb(0, 0, 0)),
    ("blue", PackedRgba::rgb(0, 0, 255)),
    ("brown", PackedRgba::rgb(165, 42, 42)),
    ("coral", PackedRgba::rgb(255, 127, 80)),
    ("crimson", PackedRgba::rgb(220, 20, 60)),
    ("cyan", PackedRgba::rgb(0, 255, 255)),
    ("darkblue", PackedRgba::rgb(0, 0, 139)),
    ("darkgray", PackedRgba::rgb(169, 169, 169)),
    ("darkgreen", PackedRgba::rgb(0, 100, 0)),
    ("darkorange", PackedRgba::rgb(255, 140, 0)),
    ("darkred", PackedRgba::rgb(139, 0, 0)),
    ("fuchsia", PackedRgba::rgb(255, 0, 255)),
    ("gold", PackedRgba::rgb(255, 215, 0)),
    ("gray", PackedRgba::rgb(128, 128, 128)),
    ("green", PackedRgba::rgb(0, 128, 0)),
    ("grey", PackedRgba::rgb(128, 128, 128)),
    ("hotpink", PackedRgba::rgb(255, 105, 180)),
    ("indigo", PackedRgba::rgb(75, 0, 130)),
    ("khaki", PackedRgba::rgb(240, 230, 140)),
    ("lavender", PackedRgba::rgb(230, 230, 250)),
    ("lightblue", PackedRgba::rgb(173, 216, 230)),
    ("lightgray", PackedRgba::rgb(211, 211, 211)),
    ("lightgreen", PackedRgba::rgb(144, 238, 144)),
    ("lime", PackedRgba::rgb(0, 255, 0)),
    ("magenta", PackedRgba::rgb(255, 0, 255)),
    ("maroon", PackedRgba::rgb(128, 0, 0)),
    ("navy", PackedRgba::rgb(0, 0, 128)),
    ("olive", PackedRgba::rgb(128, 128, 0)),
    ("orange", PackedRgba::rgb(255, 165, 0)),
    ("orchid", PackedRgba::rgb(218, 112, 214)),
    ("pink", PackedRgba::rgb(255, 192, 203)),
    ("plum", PackedRgba::rgb(221, 160, 221)),
    ("purple", PackedRgba::rgb(128, 0, 128)),
    ("rebeccapurple", PackedRgba::rgb(102, 51, 153)),
    ("red", PackedRgba::rgb(255, 0, 0)),
    ("salmon", PackedRgba::rgb(250, 128, 114)),
    ("silver", PackedRgba::rgb(192, 192, 192)),
    ("skyblue", PackedRgba::rgb(135, 206, 235)),
    ("slategray", PackedRgba::rgb(112, 128, 144)),
    ("tan", PackedRgba::rgb(210, 180, 140)),
    ("teal", PackedRgba::rgb(0, 128, 128)),
    ("tomato", PackedRgba::rgb(255, 99, 71)),
    ("transparent", PackedRgba::TRANSPARENT),
    ("turquoise", PackedRgba::rgb(64, 224, 208)),
    ("violet", PackedRgba::rgb(238, 130, 238)),
    ("white", PackedRgba::rgb(255, 255, 255)),
    ("yellow", PackedRgba::rgb(255, 255, 0)),
    ("yellowgreen", PackedRgba::rgb(154, 205, 50)),
];
