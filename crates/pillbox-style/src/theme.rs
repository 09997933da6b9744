#![forbid(unsafe_code)]

//! Default pill theme.
//!
//! A [`PillTheme`] is a [`StyleSheet`] pre-populated with the classes pills
//! emit, plus the background used when a record carries no color (or an
//! unparseable one). Light and dark variants differ only in colors.

use crate::color::parse_color;
use crate::style::Style;
use crate::stylesheet::StyleSheet;
use pillbox_render::cell::PackedRgba;
use std::env;

/// Outer element class, always present.
pub const CLASS_PILL: &str = "pill";
/// Added when the pill is rounded.
pub const CLASS_ROUNDED: &str = "rounded";
/// Icon container class.
pub const CLASS_ICON: &str = "icon-container";
/// Label text class.
pub const CLASS_LABEL: &str = "pill-label";
/// Close affordance class.
pub const CLASS_CLOSE: &str = "pill-close";
/// Applied on top of whichever part holds focus.
pub const CLASS_FOCUSED: &str = "pill-focused";

/// Stylesheet and fallback background for pills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PillTheme {
    sheet: StyleSheet,
    default_background: PackedRgba,
    dark: bool,
}

impl Default for PillTheme {
    fn default() -> Self {
        Self::dark()
    }
}

impl PillTheme {
    /// Theme for dark terminal backgrounds.
    #[must_use]
    pub fn dark() -> Self {
        let background = PackedRgba::rgb(68, 71, 90);
        Self {
            sheet: base_sheet(background, PackedRgba::rgb(248, 248, 242))
                .with(CLASS_CLOSE, Style::new().fg(PackedRgba::rgb(255, 121, 121))),
            default_background: background,
            dark: true,
        }
    }

    /// Theme for light terminal backgrounds.
    #[must_use]
    pub fn light() -> Self {
        let background = PackedRgba::rgb(222, 226, 230);
        Self {
            sheet: base_sheet(background, PackedRgba::rgb(33, 37, 41))
                .with(CLASS_CLOSE, Style::new().fg(PackedRgba::rgb(176, 0, 32))),
            default_background: background,
            dark: false,
        }
    }

    /// Pick light or dark from the process environment.
    #[must_use]
    pub fn detect() -> Self {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Pick light or dark using a custom environment lookup.
    ///
    /// Reads `COLORFGBG` (`"fg;bg"` ANSI indices). A background of 7 or 15
    /// selects the light theme; anything else, including a missing or
    /// malformed value, selects dark.
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if is_dark_background(get_env("COLORFGBG").as_deref()) {
            Self::dark()
        } else {
            Self::light()
        }
    }

    #[inline]
    pub fn is_dark(&self) -> bool {
        self.dark
    }

    /// The underlying class registry.
    #[inline]
    pub fn sheet(&self) -> &StyleSheet {
        &self.sheet
    }

    /// Mutable access for overriding or adding classes.
    #[inline]
    pub fn sheet_mut(&mut self) -> &mut StyleSheet {
        &mut self.sheet
    }

    /// Background used when a record has no usable color.
    #[inline]
    pub fn default_background(&self) -> PackedRgba {
        self.default_background
    }

    /// Compose a class list into a style.
    pub fn style_for<S: AsRef<str>>(&self, classes: &[S]) -> Style {
        self.sheet.compose(classes)
    }

    /// Turn a record's color token into a background.
    ///
    /// Missing tokens use the default background. Invalid tokens do too,
    /// after logging a warning.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub fn resolve_background(&self, token: Option<&str>) -> PackedRgba {
        let Some(token) = token else {
            return self.default_background;
        };
        match parse_color(token) {
            Ok(color) => color,
            Err(err) => {
                pillbox_core::warn!(token, error = %err, "unusable pill color; using theme default");
                self.default_background
            }
        }
    }

    /// Foreground that stays readable over `background`.
    pub fn contrast_fg(&self, background: PackedRgba) -> PackedRgba {
        if background.a() == 0 {
            return self.sheet.get_or_default(CLASS_LABEL).fg.unwrap_or(PackedRgba::WHITE);
        }
        if background.luminance() > 140 {
            PackedRgba::rgb(20, 20, 20)
        } else {
            PackedRgba::rgb(245, 245, 245)
        }
    }
}

fn base_sheet(background: PackedRgba, foreground: PackedRgba) -> StyleSheet {
    StyleSheet::new()
        .with(CLASS_PILL, Style::new().fg(foreground).bg(background))
        .with(CLASS_ROUNDED, Style::new())
        .with(CLASS_ICON, Style::new())
        .with(CLASS_LABEL, Style::new().fg(foreground))
        .with(CLASS_FOCUSED, Style::new().bold().underline())
}

fn is_dark_background(colorfgbg: Option<&str>) -> bool {
    if let Some(value) = colorfgbg
        && let Some(bg) = value.split(';').next_back()
        && let Ok(bg) = bg.trim().parse::<u8>()
    {
        return bg != 7 && bg != 15;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use pillbox_render::cell::StyleFlags;

    fn env_of(value: Option<&'static str>) -> impl Fn(&str) -> Option<String> {
        move |key| (key == "COLORFGBG").then_some(value).flatten().map(String::from)
    }

    #[test]
    fn colorfgbg_selects_variant() {
        assert!(PillTheme::from_env_with(env_of(Some("15;0"))).is_dark());
        assert!(!PillTheme::from_env_with(env_of(Some("0;15"))).is_dark());
        assert!(!PillTheme::from_env_with(env_of(Some("0;7"))).is_dark());
        assert!(!PillTheme::from_env_with(env_of(Some("0;default;15"))).is_dark());
        assert!(!PillTheme::from_env_with(env_of(Some(" 0 ; 15 "))).is_dark());
    }

    #[test]
    fn missing_or_garbage_colorfgbg_is_dark() {
        assert!(PillTheme::from_env_with(env_of(None)).is_dark());
        assert!(PillTheme::from_env_with(env_of(Some(""))).is_dark());
        assert!(PillTheme::from_env_with(env_of(Some("abc"))).is_dark());
    }

    #[test]
    fn variants_differ() {
        assert_ne!(
            PillTheme::dark().default_background(),
            PillTheme::light().default_background()
        );
    }

    #[test]
    fn resolve_background_parses_or_falls_back() {
        let theme = PillTheme::dark();
        assert_eq!(
            theme.resolve_background(Some("lime")),
            PackedRgba::rgb(0, 255, 0)
        );
        assert_eq!(theme.resolve_background(None), theme.default_background());
        assert_eq!(
            theme.resolve_background(Some("not-a-color")),
            theme.default_background()
        );
    }

    #[test]
    fn pill_classes_are_defined() {
        let theme = PillTheme::light();
        for class in [
            CLASS_PILL,
            CLASS_ROUNDED,
            CLASS_ICON,
            CLASS_LABEL,
            CLASS_CLOSE,
            CLASS_FOCUSED,
        ] {
            assert!(theme.sheet().contains(class), "{class} missing");
        }
        let focused = theme.style_for(&[CLASS_PILL, CLASS_FOCUSED]);
        assert!(focused.has_attr(StyleFlags::BOLD));
        assert_eq!(focused.bg, Some(theme.default_background()));
    }

    #[test]
    fn contrast_fg_tracks_luminance() {
        let theme = PillTheme::dark();
        assert_eq!(
            theme.contrast_fg(PackedRgba::rgb(0, 255, 0)),
            PackedRgba::rgb(20, 20, 20)
        );
        assert_eq!(
            theme.contrast_fg(PackedRgba::rgb(0, 0, 128)),
            PackedRgba::rgb(245, 245, 245)
        );
    }

    #[test]
    fn custom_classes_can_be_added() {
        let mut theme = PillTheme::dark();
        theme
            .sheet_mut()
            .define("urgent", Style::new().fg(PackedRgba::rgb(255, 0, 0)));
        let style = theme.style_for(&["pill", "urgent"]);
        assert_eq!(style.fg, Some(PackedRgba::rgb(255, 0, 0)));
    }
}
