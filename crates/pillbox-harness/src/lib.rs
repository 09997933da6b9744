#![forbid(unsafe_code)]

//! Headless host for pill widgets.
//!
//! [`Screen`] mounts pill lists into an off-screen frame and plays the role
//! of a browser document for tests:
//!
//! - queries by role, text, and label text over the semantic tree,
//! - synthetic clicks aimed through the hit grid, focus, and key-downs,
//! - the active element, or `None` when the document root holds focus.
//!
//! # Quick Start
//!
//! ```
//! use pillbox_harness::Screen;
//! use pillbox_render::semantics::Role;
//! use pillbox_widgets::{PillList, PillRecord};
//!
//! let mut screen = Screen::with_size(40, 4);
//! screen.mount(PillList::from_records([PillRecord::new("Test")]));
//!
//! let button = screen.get_by_role(Role::Button).unwrap();
//! assert_eq!(screen.text_content(button), "Test");
//! ```
//!
//! # Configuration
//!
//! The default screen size is 80x24. Override it with
//! `PILLBOX_TEST_WIDTH` / `PILLBOX_TEST_HEIGHT`.

use std::fmt::{self, Write as FmtWrite};

use pillbox_core::event::{Event, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use pillbox_render::buffer::Buffer;
use pillbox_render::frame::{Frame, HitId, HitRegion};
use pillbox_render::semantics::{NodeId, Role, SemanticNode, SemanticTree};
use pillbox_widgets::{FocusTarget, PillList, PillListState, PillOutcome, StatefulWidget};

pub use pillbox_core::geometry::Rect;

/// Environment variable overriding the default screen width.
pub const ENV_TEST_WIDTH: &str = "PILLBOX_TEST_WIDTH";
/// Environment variable overriding the default screen height.
pub const ENV_TEST_HEIGHT: &str = "PILLBOX_TEST_HEIGHT";

const DEFAULT_WIDTH: u16 = 80;
const DEFAULT_HEIGHT: u16 = 24;

// ============================================================================
// Buffer → Text Conversion
// ============================================================================

/// Convert a `Buffer` to a plain text string.
///
/// Each row becomes one line. Empty cells become spaces. Continuation cells
/// are skipped so wide characters occupy their natural display width.
pub fn buffer_to_text(buf: &Buffer) -> String {
    let capacity = (buf.width() as usize + 1) * buf.height() as usize;
    let mut out = String::with_capacity(capacity);

    for y in 0..buf.height() {
        if y > 0 {
            out.push('\n');
        }
        out.push_str(&buf.row_text(y));
    }
    out
}

/// Line diff between two texts.
///
/// Lines prefixed with ` ` match, `-` appear only in `expected`, `+` only in
/// `actual`. Empty when the inputs are identical.
pub fn diff_text(expected: &str, actual: &str) -> String {
    let expected_lines: Vec<&str> = expected.lines().collect();
    let actual_lines: Vec<&str> = actual.lines().collect();

    let max_lines = expected_lines.len().max(actual_lines.len());
    let mut out = String::new();
    let mut has_diff = false;

    for i in 0..max_lines {
        match (expected_lines.get(i), actual_lines.get(i)) {
            (Some(e), Some(a)) if e == a => {
                let _ = writeln!(out, " {e}");
            }
            (e, a) => {
                if let Some(e) = e {
                    let _ = writeln!(out, "-{e}");
                }
                if let Some(a) = a {
                    let _ = writeln!(out, "+{a}");
                }
                has_diff = true;
            }
        }
    }

    if has_diff { out } else { String::new() }
}

/// Assert that `buf` shows `expected`, ignoring trailing spaces on each row.
///
/// # Panics
///
/// Panics with a line diff when the text differs.
#[track_caller]
pub fn assert_buffer_text(buf: &Buffer, expected: &str) {
    let trim = |text: &str| {
        text.lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
            .trim_end_matches('\n')
            .to_string()
    };
    let expected = trim(expected);
    let actual = trim(&buffer_to_text(buf));
    if expected != actual {
        let diff = diff_text(&expected, &actual);
        panic!(
            "\n\
             === Screen text mismatch ({w}x{h}) ===\n\
             Diff (- expected, + actual):\n{diff}",
            w = buf.width(),
            h = buf.height(),
        );
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Screen dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenConfig {
    pub width: u16,
    pub height: u16,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl ScreenConfig {
    /// Read the size from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Read the size using a custom environment lookup.
    ///
    /// Missing, zero, or unparseable values keep the default.
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str, default: u16| {
            get_env(key)
                .and_then(|value| value.trim().parse::<u16>().ok())
                .filter(|value| *value > 0)
                .unwrap_or(default)
        };
        Self {
            width: read(ENV_TEST_WIDTH, DEFAULT_WIDTH),
            height: read(ENV_TEST_HEIGHT, DEFAULT_HEIGHT),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Why a query or action could not be carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Nothing matched.
    NotFound { query: String },
    /// A single-result query matched several nodes.
    Multiple { query: String, count: usize },
    /// The node cannot hold focus.
    NotFocusable { node: NodeId },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { query } => write!(f, "unable to find an element {query}"),
            Self::Multiple { query, count } => {
                write!(f, "found {count} elements {query}, expected one")
            }
            Self::NotFocusable { node } => {
                write!(f, "node {} cannot take focus", node.index())
            }
        }
    }
}

impl std::error::Error for QueryError {}

// ============================================================================
// Screen
// ============================================================================

#[derive(Debug)]
struct Mount {
    list: PillList,
    state: PillListState,
}

/// An off-screen document hosting pill lists.
///
/// Lists are stacked top to bottom in mount order, each taking the rows its
/// pills wrap onto. The frame is re-rendered after every mount and every
/// dispatched event, so queries always see the current tree.
#[derive(Debug)]
pub struct Screen {
    frame: Frame,
    mounts: Vec<Mount>,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    /// A screen sized from the environment (80x24 by default).
    pub fn new() -> Self {
        let config = ScreenConfig::from_env();
        Self::with_size(config.width, config.height)
    }

    pub fn with_size(width: u16, height: u16) -> Self {
        Self {
            frame: Frame::with_hit_grid(width, height),
            mounts: Vec::new(),
        }
    }

    /// Mount a list below the previously mounted ones and render.
    ///
    /// The list's hit ID is replaced by one unique to this screen.
    pub fn mount(&mut self, list: PillList) -> HitId {
        let id = HitId::new(self.mounts.len() as u32 + 1);
        self.mounts.push(Mount {
            list: list.hit_id(id),
            state: PillListState::new(),
        });
        self.render();
        id
    }

    /// Swap the list mounted under `id` for `list` and render.
    ///
    /// The mount keeps its interaction state, so pills whose keys survive
    /// keep their focus and removed pills take theirs with them. This is how
    /// an app re-renders after a callback changed its records.
    pub fn replace(&mut self, id: HitId, list: PillList) -> Result<(), QueryError> {
        let mount = self
            .mounts
            .iter_mut()
            .find(|mount| mount.list.id() == id)
            .ok_or_else(|| QueryError::NotFound {
                query: format!("mounted with id {}", id.0),
            })?;
        mount.list = list.hit_id(id);
        self.render();
        Ok(())
    }

    /// Remove every list; the document is empty afterwards.
    pub fn unmount_all(&mut self) {
        self.mounts.clear();
        self.render();
    }

    /// Re-render every mounted list.
    pub fn render(&mut self) {
        self.frame.clear();
        let bounds = self.frame.bounds();
        let mut y = bounds.y;
        for mount in &mut self.mounts {
            let area = Rect::new(bounds.x, y, bounds.width, bounds.bottom().saturating_sub(y));
            mount.list.render(area, &mut self.frame, &mut mount.state);
            let used = mount
                .list
                .layout(area)
                .iter()
                .flatten()
                .map(|rect| rect.bottom())
                .max()
                .unwrap_or(y);
            y = used;
        }
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn tree(&self) -> &SemanticTree {
        self.frame.semantics()
    }

    /// The rendered cells as text, one line per row.
    pub fn text(&self) -> String {
        buffer_to_text(&self.frame.buffer)
    }

    /// Assert the rendered text, ignoring trailing spaces.
    #[track_caller]
    pub fn assert_text(&self, expected: &str) {
        assert_buffer_text(&self.frame.buffer, expected);
    }

    pub fn node(&self, id: NodeId) -> Option<&SemanticNode> {
        self.tree().get(id)
    }

    pub fn text_content(&self, id: NodeId) -> String {
        self.tree().text_content(id)
    }

    pub fn accessible_name(&self, id: NodeId) -> String {
        self.tree().accessible_name(id)
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node(id).is_some_and(|node| node.has_class(class))
    }

    /// Markup of the subtree rooted at `id`.
    pub fn markup(&self, id: NodeId) -> String {
        self.tree().markup(id)
    }

    /// Whether the markup of `id` contains `fragment`.
    pub fn contains_html(&self, id: NodeId, fragment: &str) -> bool {
        self.markup(id).contains(fragment)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn get_all_by_role(&self, role: Role) -> Vec<NodeId> {
        self.tree().by_role(role)
    }

    /// The only node with `role`.
    pub fn get_by_role(&self, role: Role) -> Result<NodeId, QueryError> {
        single(self.get_all_by_role(role), || format!("with role {role:?}"))
    }

    /// All nodes whose own text is exactly `text`.
    pub fn get_all_by_text(&self, text: &str) -> Vec<NodeId> {
        self.tree()
            .iter()
            .filter(|(_, node)| !node.text.is_empty() && node.text == text)
            .map(|(id, _)| id)
            .collect()
    }

    /// The only node whose own text is exactly `text`.
    pub fn get_by_text(&self, text: &str) -> Result<NodeId, QueryError> {
        single(self.get_all_by_text(text), || format!("with text {text:?}"))
    }

    /// Like [`get_by_text`](Self::get_by_text), but `Ok(None)` when absent.
    pub fn query_by_text(&self, text: &str) -> Result<Option<NodeId>, QueryError> {
        match self.get_by_text(text) {
            Ok(id) => Ok(Some(id)),
            Err(QueryError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// The only node whose explicit accessible name is exactly `label`.
    pub fn get_by_label_text(&self, label: &str) -> Result<NodeId, QueryError> {
        let matches = self
            .tree()
            .iter()
            .filter(|(_, node)| node.name.as_deref() == Some(label))
            .map(|(id, _)| id)
            .collect();
        single(matches, || format!("with label {label:?}"))
    }

    /// The focused node, or `None` when the document root holds focus.
    pub fn active_element(&self) -> Option<NodeId> {
        self.tree().focused()
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    /// Press and release the left button over `id`.
    ///
    /// A node with its own pointer target is clicked on a cell that routes
    /// to that target, so clicking a pill's body never lands on its close
    /// button. Other nodes are clicked at their center, and whatever is
    /// drawn on top there receives the click.
    pub fn click(&mut self, id: NodeId) -> Result<Vec<PillOutcome>, QueryError> {
        let node = self.node(id).ok_or_else(|| QueryError::NotFound {
            query: format!("with id {}", id.index()),
        })?;
        let Some((x, y)) = self.aim(node) else {
            return Ok(Vec::new());
        };
        let down = MouseEvent::new(MouseEventKind::Down(MouseButton::Left), x, y);
        let up = MouseEvent::new(MouseEventKind::Up(MouseButton::Left), x, y);
        Ok(vec![
            self.dispatch(&Event::Mouse(down)),
            self.dispatch(&Event::Mouse(up)),
        ])
    }

    /// Move focus to `id`, blurring everything else.
    pub fn focus(&mut self, id: NodeId) -> Result<(), QueryError> {
        let node = self.node(id).ok_or_else(|| QueryError::NotFound {
            query: format!("with id {}", id.index()),
        })?;
        let target = match (node.focusable, node.target) {
            (true, Some(target)) => target,
            _ => return Err(QueryError::NotFocusable { node: id }),
        };
        let part = if target.region == HitRegion::Button {
            FocusTarget::Close
        } else {
            FocusTarget::Body
        };

        for mount in &mut self.mounts {
            if mount.list.id() == target.id {
                mount.state.focus(target.data as usize, part);
            } else {
                mount.state.blur();
            }
        }
        self.render();
        Ok(())
    }

    /// Drop focus back to the document root.
    pub fn blur(&mut self) {
        for mount in &mut self.mounts {
            mount.state.blur();
        }
        self.render();
    }

    /// Press `code` on the active element.
    pub fn key_down(&mut self, code: KeyCode) -> PillOutcome {
        self.dispatch(&Event::Key(KeyEvent::new(code)))
    }

    /// Route one event like a document would, then re-render.
    ///
    /// - keys go to the list holding focus,
    /// - pointer events go to the list under the pointer; a press outside
    ///   every list returns focus to the document root,
    /// - resizes rebuild the frame.
    pub fn dispatch(&mut self, event: &Event) -> PillOutcome {
        let outcome = match event {
            Event::Key(_) => self
                .mounts
                .iter_mut()
                .find(|mount| mount.state.focused().is_some())
                .map_or(PillOutcome::Ignored, |mount| {
                    mount.list.handle_event(event, None, &mut mount.state)
                }),
            Event::Mouse(mouse) => self.dispatch_mouse(event, mouse),
            Event::Resize { width, height } => {
                self.frame = Frame::with_hit_grid(*width, *height);
                PillOutcome::Ignored
            }
            Event::Focus(_) => PillOutcome::Ignored,
        };
        self.render();
        outcome
    }

    /// The cell a click on `node` should land on.
    fn aim(&self, node: &SemanticNode) -> Option<(u16, u16)> {
        let Some(target) = node.target else {
            return node.rect.center();
        };
        let rect = node.rect;
        (rect.y..rect.bottom())
            .flat_map(|y| (rect.x..rect.right()).map(move |x| (x, y)))
            .find(|&(x, y)| self.frame.hit_test(x, y) == Some(target.into_parts()))
    }

    fn dispatch_mouse(&mut self, event: &Event, mouse: &MouseEvent) -> PillOutcome {
        let hit = self.frame.hit_test(mouse.x, mouse.y);
        let owner = hit.map(|(id, _, _)| id);
        if mouse.is_primary_activation() {
            for mount in &mut self.mounts {
                if Some(mount.list.id()) != owner {
                    mount.state.blur();
                }
            }
        }
        match self
            .mounts
            .iter_mut()
            .find(|mount| Some(mount.list.id()) == owner)
        {
            Some(mount) => mount.list.handle_event(event, hit, &mut mount.state),
            None => PillOutcome::Ignored,
        }
    }
}

fn single(matches: Vec<NodeId>, query: impl FnOnce() -> String) -> Result<NodeId, QueryError> {
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(QueryError::NotFound { query: query() }),
        _ => Err(QueryError::Multiple {
            query: query(),
            count: matches.len(),
        }),
    }
}
