#![forbid(unsafe_code)]

//! Pill widget.
//!
//! A pill is a one-row tag: optional icon, label, and an optional close
//! button, drawn as `[cap][icon ][label][ ×][cap]`. Its behavior comes from
//! [`PillOptions`]:
//!
//! - `on_select` makes the body selectable by pointer (and by keyboard when
//!   there is no close handler).
//! - `on_close` adds the close button. Pointer activation on it, or
//!   `Enter`/`Space` while the pill is focused, runs the close handler.
//! - With neither handler the pill is a labeled, non-actionable badge.
//!
//! Input is dispatched through [`Pill::handle_event`]. The close button is
//! checked before the body, and a close activation returns immediately, so
//! a click on the close button never reaches the select handler.

use crate::{StatefulWidget, draw_spaces, draw_text_span};
use pillbox_core::event::{Event, KeyCode, KeyEvent, MouseEvent};
use pillbox_core::geometry::Rect;
use pillbox_core::glyph_policy::GlyphPolicy;
use pillbox_render::cell::PackedRgba;
use pillbox_render::display_width;
use pillbox_render::frame::{Frame, HitData, HitId, HitRegion};
use pillbox_render::semantics::{HitTarget, NodeId, Role, SemanticNode};
use pillbox_style::theme::{
    CLASS_CLOSE, CLASS_FOCUSED, CLASS_ICON, CLASS_LABEL, CLASS_PILL, CLASS_ROUNDED,
};
use pillbox_style::{PillTheme, Style};
use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;
use std::sync::LazyLock;

static DEFAULT_THEME: LazyLock<PillTheme> = LazyLock::new(PillTheme::detect);
static DEFAULT_GLYPHS: LazyLock<GlyphPolicy> = LazyLock::new(GlyphPolicy::detect);

/// One tag's data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PillRecord {
    /// Visible and accessible text.
    pub label: String,
    /// Background color token (`"lime"`, `"#ff0000"`, ...).
    pub bgcolor: Option<String>,
    /// Short glyph drawn before the label.
    pub icon: Option<String>,
}

impl PillRecord {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            bgcolor: None,
            icon: None,
        }
    }

    #[must_use]
    pub fn bgcolor(mut self, token: impl Into<String>) -> Self {
        self.bgcolor = Some(token.into());
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Accessible name of the close button.
    pub fn close_label(&self) -> String {
        format!("Close {}", self.label)
    }
}

/// Handler invoked with the record it belongs to.
pub type PillCallback = Rc<dyn Fn(&PillRecord)>;

/// Behavior and presentation flags.
///
/// Used both list-wide and per item; see [`PillOptions::merged_over`].
#[derive(Clone, Default)]
pub struct PillOptions {
    /// Extra class appended to the outer element.
    pub item_class_name: Option<String>,
    /// Rounded end caps. Defaults to `false`.
    pub rounded: Option<bool>,
    /// Close handler. Its presence renders the close button.
    pub on_close: Option<PillCallback>,
    /// Select handler. Its presence makes the body selectable.
    pub on_select: Option<PillCallback>,
}

impl fmt::Debug for PillOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PillOptions")
            .field("item_class_name", &self.item_class_name)
            .field("rounded", &self.rounded)
            .field("on_close", &self.on_close.as_ref().map(|_| "Fn"))
            .field("on_select", &self.on_select.as_ref().map(|_| "Fn"))
            .finish()
    }
}

impl PillOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn item_class_name(mut self, class: impl Into<String>) -> Self {
        self.item_class_name = Some(class.into());
        self
    }

    #[must_use]
    pub fn rounded(mut self, rounded: bool) -> Self {
        self.rounded = Some(rounded);
        self
    }

    #[must_use]
    pub fn on_close(mut self, handler: impl Fn(&PillRecord) + 'static) -> Self {
        self.on_close = Some(Rc::new(handler));
        self
    }

    #[must_use]
    pub fn on_select(mut self, handler: impl Fn(&PillRecord) + 'static) -> Self {
        self.on_select = Some(Rc::new(handler));
        self
    }

    /// Field-by-field merge: every field set here wins over `base`.
    #[must_use]
    pub fn merged_over(&self, base: &PillOptions) -> PillOptions {
        PillOptions {
            item_class_name: self
                .item_class_name
                .clone()
                .or_else(|| base.item_class_name.clone()),
            rounded: self.rounded.or(base.rounded),
            on_close: self.on_close.clone().or_else(|| base.on_close.clone()),
            on_select: self.on_select.clone().or_else(|| base.on_select.clone()),
        }
    }

    /// Apply built-in defaults.
    #[must_use]
    pub fn resolve(&self) -> ResolvedPillOptions {
        ResolvedPillOptions {
            item_class_name: self.item_class_name.clone().filter(|c| !c.is_empty()),
            rounded: self.rounded.unwrap_or(false),
            on_close: self.on_close.clone(),
            on_select: self.on_select.clone(),
        }
    }
}

/// Options with defaults applied.
#[derive(Clone, Default)]
pub struct ResolvedPillOptions {
    pub item_class_name: Option<String>,
    pub rounded: bool,
    pub on_close: Option<PillCallback>,
    pub on_select: Option<PillCallback>,
}

impl fmt::Debug for ResolvedPillOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedPillOptions")
            .field("item_class_name", &self.item_class_name)
            .field("rounded", &self.rounded)
            .field("on_close", &self.on_close.is_some())
            .field("on_select", &self.on_select.is_some())
            .finish()
    }
}

impl ResolvedPillOptions {
    /// Whether the outer element is an actionable button.
    #[inline]
    pub fn is_interactive(&self) -> bool {
        self.on_close.is_some() || self.on_select.is_some()
    }

    /// Whether the close button is rendered.
    #[inline]
    pub fn has_close(&self) -> bool {
        self.on_close.is_some()
    }
}

/// Which part of a pill holds focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    /// The outer element.
    Body,
    /// The close button.
    Close,
}

/// Transient interaction state of one pill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PillState {
    focus: Option<FocusTarget>,
}

impl PillState {
    /// The focused part, if any.
    #[inline]
    pub fn focused(&self) -> Option<FocusTarget> {
        self.focus
    }

    #[inline]
    pub fn is_focused(&self) -> bool {
        self.focus.is_some()
    }

    pub fn focus(&mut self, target: FocusTarget) {
        self.focus = Some(target);
    }

    pub fn blur(&mut self) {
        self.focus = None;
    }

    /// Drop focus on parts the options no longer render.
    fn sanitize(&mut self, options: &ResolvedPillOptions) {
        self.focus = match self.focus {
            Some(FocusTarget::Close) if !options.has_close() => None,
            Some(_) if !options.is_interactive() => None,
            focus => focus,
        };
    }
}

/// Result of dispatching one event to a pill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PillOutcome {
    /// Not handled; the host may route the event elsewhere.
    Ignored,
    /// The select handler ran.
    Selected,
    /// The close handler ran.
    Closed,
    /// Focus moved within the pill; no handler ran.
    FocusChanged,
    /// The pill gave up focus; the document root holds it now.
    FocusReleased,
}

impl PillOutcome {
    /// Whether the pill consumed the event.
    #[inline]
    pub fn is_consumed(self) -> bool {
        self != Self::Ignored
    }
}

/// Cell rectangles of a rendered pill, clipped to the render area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PillLayout {
    pub outer: Rect,
    pub icon: Option<Rect>,
    pub label: Rect,
    pub close: Option<Rect>,
}

/// A single pill, borrowing its record.
#[derive(Debug, Clone)]
pub struct Pill<'a> {
    record: &'a PillRecord,
    options: ResolvedPillOptions,
    theme: Option<&'a PillTheme>,
    glyphs: Option<GlyphPolicy>,
    hit_id: HitId,
    hit_data: HitData,
    parent: Option<NodeId>,
}

impl<'a> Pill<'a> {
    /// Create a pill from a record and (unresolved) options.
    pub fn new(record: &'a PillRecord, options: &PillOptions) -> Self {
        Self::from_resolved(record, options.resolve())
    }

    pub fn from_resolved(record: &'a PillRecord, options: ResolvedPillOptions) -> Self {
        Self {
            record,
            options,
            theme: None,
            glyphs: None,
            hit_id: HitId::default(),
            hit_data: 0,
            parent: None,
        }
    }

    /// Use a specific theme instead of the environment-detected one.
    #[must_use]
    pub fn theme(mut self, theme: &'a PillTheme) -> Self {
        self.theme = Some(theme);
        self
    }

    /// Use a specific glyph policy instead of the environment-detected one.
    #[must_use]
    pub fn glyphs(mut self, glyphs: GlyphPolicy) -> Self {
        self.glyphs = Some(glyphs);
        self
    }

    /// Hit ID and data this pill registers (and answers to).
    #[must_use]
    pub fn hit(mut self, id: HitId, data: HitData) -> Self {
        self.hit_id = id;
        self.hit_data = data;
        self
    }

    /// Parent semantic node (the list, when rendered by one).
    #[must_use]
    pub fn parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn record(&self) -> &'a PillRecord {
        self.record
    }

    pub fn options(&self) -> &ResolvedPillOptions {
        &self.options
    }

    fn theme_ref(&self) -> &PillTheme {
        match self.theme {
            Some(theme) => theme,
            None => LazyLock::force(&DEFAULT_THEME),
        }
    }

    fn glyph_policy(&self) -> GlyphPolicy {
        self.glyphs.unwrap_or(*DEFAULT_GLYPHS)
    }

    /// Class list of the outer element, in application order.
    pub fn classes(&self) -> Vec<&str> {
        let mut classes = vec![CLASS_PILL];
        if self.options.rounded {
            classes.push(CLASS_ROUNDED);
        }
        if let Some(extra) = &self.options.item_class_name {
            classes.push(extra);
        }
        classes
    }

    /// The icon as drawn: the record's icon, or a one-cell stand-in when the
    /// glyph policy cannot draw it.
    fn drawn_icon(&self, glyphs: &GlyphPolicy) -> Option<Cow<'a, str>> {
        let icon = self.record.icon.as_deref()?;
        if glyphs.admits_icon(icon) {
            Some(Cow::Borrowed(icon))
        } else {
            Some(Cow::Owned(GlyphPolicy::ICON_FALLBACK.to_string()))
        }
    }

    /// Width in cells, including both end caps.
    pub fn width(&self) -> u16 {
        let glyphs = self.glyph_policy();
        let mut width = 2 + display_width(&self.record.label);
        if let Some(icon) = self.drawn_icon(&glyphs) {
            width += display_width(&icon) + 1;
        }
        if self.options.has_close() {
            width += 1 + pillbox_render::char_width(glyphs.close_glyph());
        }
        width.min(u16::MAX as usize) as u16
    }

    /// Compute part rectangles for rendering at the top-left of `area`.
    pub fn layout(&self, area: Rect) -> PillLayout {
        let glyphs = self.glyph_policy();
        let y = area.y;
        let clip = |x: u16, width: u16| {
            let rect = Rect::new(x, y, width, 1);
            rect.intersection_opt(&area)
                .unwrap_or(Rect::new(x.min(area.right()), y, 0, 1))
        };

        let mut x = area.x.saturating_add(1);
        let icon = self.drawn_icon(&glyphs).map(|icon| {
            let width = cells(&icon);
            let rect = clip(x, width);
            x = x.saturating_add(width).saturating_add(1);
            rect
        });

        let label_width = cells(&self.record.label);
        let label = clip(x, label_width);
        x = x.saturating_add(label_width);

        let close = self.options.has_close().then(|| {
            let width = 1 + pillbox_render::char_width(glyphs.close_glyph()) as u16;
            clip(x, width)
        });

        PillLayout {
            outer: clip(area.x, self.width()),
            icon,
            label,
            close,
        }
    }

    /// Dispatch one event.
    ///
    /// `hit` is the hit-test result at the pointer position for mouse
    /// events; keyboard events ignore it.
    pub fn handle_event(
        &self,
        event: &Event,
        hit: Option<(HitId, HitRegion, HitData)>,
        state: &mut PillState,
    ) -> PillOutcome {
        match event {
            Event::Key(key) => self.handle_key(key, state),
            Event::Mouse(mouse) => self.handle_mouse(mouse, hit, state),
            _ => PillOutcome::Ignored,
        }
    }

    /// Handle a mouse event.
    ///
    /// Only a left-button press counts as activation. The close region is
    /// checked first; a close activation never reaches the body.
    pub fn handle_mouse(
        &self,
        event: &MouseEvent,
        hit: Option<(HitId, HitRegion, HitData)>,
        state: &mut PillState,
    ) -> PillOutcome {
        state.sanitize(&self.options);
        if !event.is_primary_activation() {
            return PillOutcome::Ignored;
        }
        let Some((id, region, data)) = hit else {
            return PillOutcome::Ignored;
        };
        if id != self.hit_id || data != self.hit_data {
            return PillOutcome::Ignored;
        }

        if region == HitRegion::Button {
            let Some(on_close) = &self.options.on_close else {
                return PillOutcome::Ignored;
            };
            state.focus(FocusTarget::Close);
            pillbox_core::debug!(label = %self.record.label, source = "pointer", "pill close");
            on_close(self.record);
            return PillOutcome::Closed;
        }

        if region != HitRegion::Content || !self.options.is_interactive() {
            return PillOutcome::Ignored;
        }
        state.focus(FocusTarget::Body);
        match &self.options.on_select {
            Some(on_select) => {
                pillbox_core::debug!(label = %self.record.label, source = "pointer", "pill select");
                on_select(self.record);
                PillOutcome::Selected
            }
            None => PillOutcome::FocusChanged,
        }
    }

    /// Handle a key event. Only a focused pill reacts.
    pub fn handle_key(&self, event: &KeyEvent, state: &mut PillState) -> PillOutcome {
        state.sanitize(&self.options);
        if !event.is_down() {
            return PillOutcome::Ignored;
        }
        let Some(target) = state.focused() else {
            return PillOutcome::Ignored;
        };

        match event.code {
            KeyCode::Escape => {
                state.blur();
                pillbox_core::debug!(label = %self.record.label, "pill focus released");
                PillOutcome::FocusReleased
            }
            KeyCode::Tab if target == FocusTarget::Body && self.options.has_close() => {
                state.focus(FocusTarget::Close);
                PillOutcome::FocusChanged
            }
            KeyCode::BackTab if target == FocusTarget::Close => {
                state.focus(FocusTarget::Body);
                PillOutcome::FocusChanged
            }
            _ if event.is_activation() => self.activate(target),
            _ => PillOutcome::Ignored,
        }
    }

    fn activate(&self, target: FocusTarget) -> PillOutcome {
        if let Some(on_close) = &self.options.on_close {
            pillbox_core::debug!(label = %self.record.label, source = "keyboard", "pill close");
            on_close(self.record);
            return PillOutcome::Closed;
        }
        match (&self.options.on_select, target) {
            (Some(on_select), FocusTarget::Body) => {
                pillbox_core::debug!(label = %self.record.label, source = "keyboard", "pill select");
                on_select(self.record);
                PillOutcome::Selected
            }
            _ => PillOutcome::Ignored,
        }
    }

    fn body_style(&self, theme: &PillTheme, background: PackedRgba, focused: bool) -> Style {
        let mut style = theme.style_for(self.classes().as_slice()).bg(background);
        if self.record.bgcolor.is_some() {
            style = style.fg(theme.contrast_fg(background));
        }
        if focused {
            style = theme.sheet().get_or_default(CLASS_FOCUSED).merge(&style);
        }
        style
    }
}

impl StatefulWidget for Pill<'_> {
    type State = PillState;

    fn render(&self, area: Rect, frame: &mut Frame, state: &mut Self::State) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "Pill",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        if area.is_empty() {
            return;
        }
        state.sanitize(&self.options);

        let theme = self.theme_ref();
        let glyphs = self.glyph_policy();
        let layout = self.layout(area);
        let background = theme.resolve_background(self.record.bgcolor.as_deref());
        let focus = state.focused();
        let body = self.body_style(theme, background, focus == Some(FocusTarget::Body));
        let max_x = layout.outer.right();
        let y = area.y;

        // Surface, then end caps.
        draw_spaces(frame, layout.outer.x, y, layout.outer.width, body, max_x);
        if self.options.rounded && layout.outer.width >= 2 {
            let (left, right) = glyphs.rounded_caps();
            let cap = Style::new().fg(background).bg(PackedRgba::TRANSPARENT);
            let mut buf = [0u8; 4];
            draw_text_span(frame, layout.outer.x, y, left.encode_utf8(&mut buf), cap, max_x);
            let right_x = area.x.saturating_add(self.width()).saturating_sub(1);
            draw_text_span(frame, right_x, y, right.encode_utf8(&mut buf), cap, max_x);
        }

        if let (Some(rect), Some(icon)) = (layout.icon, self.drawn_icon(&glyphs)) {
            let style = theme.sheet().get_or_default(CLASS_ICON).merge(&body);
            draw_text_span(frame, rect.x, y, &icon, style, max_x);
        }

        let label_style = body.merge(&theme.sheet().get_or_default(CLASS_LABEL));
        draw_text_span(frame, layout.label.x, y, &self.record.label, label_style, max_x);

        if let Some(rect) = layout.close {
            let mut style = theme.sheet().get_or_default(CLASS_CLOSE).merge(&body);
            if focus == Some(FocusTarget::Close) {
                style = theme.sheet().get_or_default(CLASS_FOCUSED).merge(&style);
            }
            let mut buf = [0u8; 4];
            let glyph = glyphs.close_glyph().encode_utf8(&mut buf);
            draw_text_span(frame, rect.x.saturating_add(1), y, glyph, style, max_x);
        }

        // Body first so the close button wins its cells.
        let interactive = self.options.is_interactive();
        if interactive {
            frame.register_hit(layout.outer, self.hit_id, HitRegion::Content, self.hit_data);
        }
        if let Some(rect) = layout.close {
            frame.register_hit(rect, self.hit_id, HitRegion::Button, self.hit_data);
        }

        let mut outer = SemanticNode::new(Role::Button, layout.outer)
            .classes(self.classes())
            .background(Some(background))
            .focusable(interactive)
            .focused(focus == Some(FocusTarget::Body));
        if interactive {
            outer = outer.target(HitTarget::new(
                self.hit_id,
                HitRegion::Content,
                self.hit_data,
            ));
        }
        if let Some(parent) = self.parent {
            outer = outer.parent(parent);
        }
        let tree = frame.semantics_mut();
        let outer = tree.push(outer);

        if let (Some(rect), Some(icon)) = (layout.icon, &self.record.icon) {
            tree.push(
                SemanticNode::new(Role::Presentation, rect)
                    .parent(outer)
                    .classes([CLASS_ICON])
                    .text(icon.as_str()),
            );
        }
        tree.push(
            SemanticNode::new(Role::Text, layout.label)
                .parent(outer)
                .classes([CLASS_LABEL])
                .text(self.record.label.as_str()),
        );
        if let Some(rect) = layout.close {
            tree.push(
                SemanticNode::new(Role::Button, rect)
                    .parent(outer)
                    .classes([CLASS_CLOSE])
                    .name(self.record.close_label())
                    .text(glyphs.close_glyph().to_string())
                    .focusable(true)
                    .focused(focus == Some(FocusTarget::Close))
                    .target(HitTarget::new(
                        self.hit_id,
                        HitRegion::Button,
                        self.hit_data,
                    )),
            );
        }
    }
}

/// Render unfocused, for display-only use.
impl crate::Widget for Pill<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        let mut state = PillState::default();
        StatefulWidget::render(self, area, frame, &mut state);
    }
}

/// Display width of `text`, saturating at `u16::MAX` cells.
fn cells(text: &str) -> u16 {
    u16::try_from(display_width(text)).unwrap_or(u16::MAX)
}
