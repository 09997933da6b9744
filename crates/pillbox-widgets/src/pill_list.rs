#![forbid(unsafe_code)]

//! Pill list widget.
//!
//! Lays pills out left to right with a one-cell gap, wrapping to the next
//! row when a pill does not fit. Pills that fall below the area are not
//! rendered at all: no cells, no hit regions, no semantic nodes.
//!
//! Every pill registers under the list's [`HitId`] with its index as hit
//! data, so one hit-test result identifies both the pill and the part of it
//! under the pointer.

use crate::StatefulWidget;
use crate::pill::{FocusTarget, Pill, PillOptions, PillOutcome, PillRecord, PillState};
use pillbox_core::event::{Event, KeyCode, KeyEvent, MouseEvent};
use pillbox_core::geometry::Rect;
use pillbox_core::glyph_policy::GlyphPolicy;
use pillbox_render::frame::{Frame, HitData, HitId, HitRegion};
use pillbox_render::semantics::{Role, SemanticNode};
use pillbox_style::PillTheme;
use std::collections::HashMap;

/// Columns between adjacent pills on a row.
pub const PILL_GAP: u16 = 1;

/// A record plus per-item option overrides.
#[derive(Debug, Clone, Default)]
pub struct PillItem {
    pub record: PillRecord,
    /// Fields set here win over the list-level options.
    pub overrides: PillOptions,
}

impl PillItem {
    pub fn new(record: PillRecord) -> Self {
        Self {
            record,
            overrides: PillOptions::default(),
        }
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: PillOptions) -> Self {
        self.overrides = overrides;
        self
    }
}

impl From<PillRecord> for PillItem {
    fn from(record: PillRecord) -> Self {
        Self::new(record)
    }
}

/// Identity of a list child across renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PillKey {
    /// Unique label.
    Label(String),
    /// Position, for labels shared by several items.
    Index(usize),
}

/// An ordered set of pills sharing list-level options.
#[derive(Debug, Clone, Default)]
pub struct PillList {
    items: Vec<PillItem>,
    options: PillOptions,
    theme: Option<PillTheme>,
    glyphs: Option<GlyphPolicy>,
    hit_id: HitId,
}

impl PillList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from records, in order.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = PillRecord>,
    {
        Self {
            items: records.into_iter().map(PillItem::new).collect(),
            ..Self::default()
        }
    }

    /// Options applied to every pill unless an item overrides them.
    #[must_use]
    pub fn with_options(mut self, options: PillOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn theme(mut self, theme: PillTheme) -> Self {
        self.theme = Some(theme);
        self
    }

    #[must_use]
    pub fn glyphs(mut self, glyphs: GlyphPolicy) -> Self {
        self.glyphs = Some(glyphs);
        self
    }

    /// Hit ID shared by all pills of this list.
    #[must_use]
    pub fn hit_id(mut self, id: HitId) -> Self {
        self.hit_id = id;
        self
    }

    pub fn push(&mut self, record: PillRecord) {
        self.items.push(PillItem::new(record));
    }

    pub fn push_with(&mut self, record: PillRecord, overrides: PillOptions) {
        self.items.push(PillItem::new(record).with_overrides(overrides));
    }

    pub fn options(&self) -> &PillOptions {
        &self.options
    }

    pub fn items(&self) -> &[PillItem] {
        &self.items
    }

    pub fn id(&self) -> HitId {
        self.hit_id
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Identity keys, one per item: the label when unique, else the index.
    pub fn keys(&self) -> Vec<PillKey> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for item in &self.items {
            *counts.entry(item.record.label.as_str()).or_default() += 1;
        }
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| match counts.get(item.record.label.as_str()) {
                Some(1) => PillKey::Label(item.record.label.clone()),
                _ => PillKey::Index(i),
            })
            .collect()
    }

    /// The pill widget for item `index`, with options merged.
    pub fn pill(&self, index: usize) -> Option<Pill<'_>> {
        let item = self.items.get(index)?;
        let options = item.overrides.merged_over(&self.options).resolve();
        let data = HitData::try_from(index).unwrap_or(HitData::MAX);
        let mut pill = Pill::from_resolved(&item.record, options).hit(self.hit_id, data);
        if let Some(theme) = &self.theme {
            pill = pill.theme(theme);
        }
        if let Some(glyphs) = self.glyphs {
            pill = pill.glyphs(glyphs);
        }
        Some(pill)
    }

    /// Flow layout: the rect of each item, or `None` when it falls outside
    /// `area`. A pill wider than the area starts its own row and is clipped.
    pub fn layout(&self, area: Rect) -> Vec<Option<Rect>> {
        let mut rects = Vec::with_capacity(self.items.len());
        if area.is_empty() {
            rects.resize(self.items.len(), None);
            return rects;
        }

        let right = area.right() as u32;
        let mut x = area.x as u32;
        let mut y = area.y as u32;
        for index in 0..self.items.len() {
            let width = self.pill(index).map_or(0, |p| p.width()) as u32;
            if x > area.x as u32 && x + width > right {
                x = area.x as u32;
                y += 1;
            }
            if y >= area.bottom() as u32 {
                rects.push(None);
                continue;
            }
            let visible = width.min(right - x);
            rects.push(Some(Rect::new(x as u16, y as u16, visible as u16, 1)));
            x = (x + width + PILL_GAP as u32).min(right);
        }
        rects
    }

    /// Dispatch one event.
    ///
    /// Keys go to the focused pill. `Tab`/`BackTab` that the pill does not
    /// consume move focus to the neighboring pill. Pointer activation goes
    /// to the pill under the pointer and blurs the others.
    pub fn handle_event(
        &self,
        event: &Event,
        hit: Option<(HitId, HitRegion, HitData)>,
        state: &mut PillListState,
    ) -> PillOutcome {
        state.sync(&self.keys());
        match event {
            Event::Key(key) => self.handle_key(key, state),
            Event::Mouse(mouse) => self.handle_mouse(mouse, hit, state),
            _ => PillOutcome::Ignored,
        }
    }

    fn handle_mouse(
        &self,
        event: &MouseEvent,
        hit: Option<(HitId, HitRegion, HitData)>,
        state: &mut PillListState,
    ) -> PillOutcome {
        if !event.is_primary_activation() {
            return PillOutcome::Ignored;
        }
        let Some((id, _, data)) = hit else {
            return PillOutcome::Ignored;
        };
        let index = data as usize;
        if id != self.hit_id || index >= self.items.len() {
            return PillOutcome::Ignored;
        }
        let Some(pill) = self.pill(index) else {
            return PillOutcome::Ignored;
        };

        state.blur_except(index);
        match state.state_mut(index) {
            Some(pill_state) => pill.handle_mouse(event, hit, pill_state),
            None => PillOutcome::Ignored,
        }
    }

    fn handle_key(&self, event: &KeyEvent, state: &mut PillListState) -> PillOutcome {
        let Some((index, _)) = state.focused() else {
            return PillOutcome::Ignored;
        };
        let Some(pill) = self.pill(index) else {
            return PillOutcome::Ignored;
        };
        let outcome = match state.state_mut(index) {
            Some(pill_state) => pill.handle_key(event, pill_state),
            None => PillOutcome::Ignored,
        };
        if outcome.is_consumed() || !event.is_down() {
            return outcome;
        }

        match event.code {
            KeyCode::Tab => self.move_focus(index, true, state),
            KeyCode::BackTab => self.move_focus(index, false, state),
            _ => outcome,
        }
    }

    /// Move focus to the nearest interactive pill after (or before) `from`.
    fn move_focus(&self, from: usize, forward: bool, state: &mut PillListState) -> PillOutcome {
        let candidates: Box<dyn Iterator<Item = usize>> = if forward {
            Box::new(from + 1..self.items.len())
        } else {
            Box::new((0..from).rev())
        };
        for index in candidates {
            let Some(pill) = self.pill(index) else {
                continue;
            };
            let options = pill.options();
            if !options.is_interactive() {
                continue;
            }
            let target = if !forward && options.has_close() {
                FocusTarget::Close
            } else {
                FocusTarget::Body
            };
            pillbox_core::trace!(from, to = index, ?target, "pill focus moved");
            state.focus(index, target);
            return PillOutcome::FocusChanged;
        }
        PillOutcome::Ignored
    }
}

impl StatefulWidget for PillList {
    type State = PillListState;

    fn render(&self, area: Rect, frame: &mut Frame, state: &mut Self::State) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "PillList",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height,
            items = self.items.len()
        )
        .entered();

        state.sync(&self.keys());
        if area.is_empty() {
            return;
        }

        let list = frame
            .semantics_mut()
            .push(SemanticNode::new(Role::List, area));
        for (index, rect) in self.layout(area).into_iter().enumerate() {
            let (Some(rect), Some(pill)) = (rect, self.pill(index)) else {
                continue;
            };
            if let Some(pill_state) = state.state_mut(index) {
                pill.parent(list).render(rect, frame, pill_state);
            }
        }
    }
}

/// Interaction state of every pill in a list, keyed by [`PillKey`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PillListState {
    keys: Vec<PillKey>,
    states: Vec<PillState>,
}

impl PillListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Align with the current items: surviving keys keep their state, new
    /// keys start fresh.
    pub fn sync(&mut self, keys: &[PillKey]) {
        if self.keys == keys {
            return;
        }
        let mut previous: HashMap<PillKey, PillState> = self
            .keys
            .drain(..)
            .zip(self.states.drain(..))
            .collect();
        self.states = keys
            .iter()
            .map(|key| previous.remove(key).unwrap_or_default())
            .collect();
        self.keys = keys.to_vec();
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn keys(&self) -> &[PillKey] {
        &self.keys
    }

    pub fn state(&self, index: usize) -> Option<&PillState> {
        self.states.get(index)
    }

    pub fn state_mut(&mut self, index: usize) -> Option<&mut PillState> {
        self.states.get_mut(index)
    }

    /// The focused pill and part, if any.
    pub fn focused(&self) -> Option<(usize, FocusTarget)> {
        self.states
            .iter()
            .enumerate()
            .find_map(|(i, s)| s.focused().map(|target| (i, target)))
    }

    /// Focus one part of one pill; every other pill is blurred.
    ///
    /// Returns `false` if `index` is out of range.
    pub fn focus(&mut self, index: usize, target: FocusTarget) -> bool {
        if index >= self.states.len() {
            return false;
        }
        self.blur_except(index);
        self.states[index].focus(target);
        true
    }

    /// Blur every pill.
    pub fn blur(&mut self) {
        self.states.iter_mut().for_each(PillState::blur);
    }

    fn blur_except(&mut self, keep: usize) {
        for (i, state) in self.states.iter_mut().enumerate() {
            if i != keep {
                state.blur();
            }
        }
    }
}

impl crate::Widget for PillList {
    fn render(&self, area: Rect, frame: &mut Frame) {
        let mut state = PillListState::default();
        StatefulWidget::render(self, area, frame, &mut state);
    }
}
