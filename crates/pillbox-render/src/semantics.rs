#![forbid(unsafe_code)]

//! Semantic (accessibility) nodes recorded alongside the cell buffer.
//!
//! Widgets describe what they drew: a role, an accessible name, the class
//! list handed to the styling system, text content, and whether the node can
//! take focus. Nodes form a tree through parent links and are stored in
//! document order, so a parent always precedes its descendants.

use crate::cell::PackedRgba;
pub use crate::frame::HitTarget;
use pillbox_core::geometry::Rect;
use std::fmt::Write as _;

/// Index of a node in a [`SemanticTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Raw index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Accessibility role of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Ordered container of items.
    List,
    /// Pressable control. Non-focusable buttons are reported as disabled.
    Button,
    /// Plain text run.
    Text,
    /// Decorative content with no semantics of its own.
    Presentation,
}

impl Role {
    /// Markup tag used by [`SemanticTree::markup`].
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::List => "ul",
            Self::Button => "button",
            Self::Text | Self::Presentation => "span",
        }
    }
}

/// One node of the semantic tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticNode {
    /// Accessibility role.
    pub role: Role,
    /// Screen area covered by the node.
    pub rect: Rect,
    /// Parent node, `None` for roots.
    pub parent: Option<NodeId>,
    /// Explicit accessible name; falls back to text content when absent.
    pub name: Option<String>,
    /// Text owned directly by this node.
    pub text: String,
    /// Class list handed to the styling system, in application order.
    pub classes: Vec<String>,
    /// Background color applied to the node, if any.
    pub background: Option<PackedRgba>,
    /// Whether the node can hold input focus.
    pub focusable: bool,
    /// Whether the node held focus when the frame was rendered.
    pub focused: bool,
    /// Hit region that receives pointer input for this node.
    pub target: Option<HitTarget>,
}

impl SemanticNode {
    /// Create a node with the given role and area.
    pub fn new(role: Role, rect: Rect) -> Self {
        Self {
            role,
            rect,
            parent: None,
            name: None,
            text: String::new(),
            classes: Vec::new(),
            background: None,
            focusable: false,
            focused: false,
            target: None,
        }
    }

    #[must_use]
    pub fn parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Append classes. Empty names and exact duplicates are skipped.
    #[must_use]
    pub fn classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for class in classes {
            let class = class.as_ref();
            if !class.is_empty() && !self.classes.iter().any(|c| c == class) {
                self.classes.push(class.to_string());
            }
        }
        self
    }

    #[must_use]
    pub fn background(mut self, color: Option<PackedRgba>) -> Self {
        self.background = color;
        self
    }

    #[must_use]
    pub fn focusable(mut self, focusable: bool) -> Self {
        self.focusable = focusable;
        self
    }

    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    #[must_use]
    pub fn target(mut self, target: HitTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// Check whether the class list contains `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Semantic nodes for one frame, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SemanticTree {
    nodes: Vec<SemanticNode>,
}

impl SemanticTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Remove all nodes.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Append a node and return its ID.
    ///
    /// A parent must be pushed before its children.
    pub fn push(&mut self, node: SemanticNode) -> NodeId {
        debug_assert!(
            node.parent.is_none_or(|p| p.index() < self.nodes.len()),
            "parent must precede child"
        );
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Look up a node.
    pub fn get(&self, id: NodeId) -> Option<&SemanticNode> {
        self.nodes.get(id.index())
    }

    /// Iterate nodes in document order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SemanticNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }

    /// Direct children of `id`, in document order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.iter()
            .filter(move |(_, node)| node.parent == Some(id))
            .map(|(child, _)| child)
    }

    /// Concatenated text of the node and all its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        if let Some(node) = self.get(id) {
            out.push_str(&node.text);
        }
        for child in self.children(id) {
            self.collect_text(child, out);
        }
    }

    /// Accessible name: the explicit name, else the text content.
    pub fn accessible_name(&self, id: NodeId) -> String {
        match self.get(id).and_then(|node| node.name.clone()) {
            Some(name) => name,
            None => self.text_content(id),
        }
    }

    /// The node that held focus when the frame was rendered.
    pub fn focused(&self) -> Option<NodeId> {
        self.iter()
            .find(|(_, node)| node.focused)
            .map(|(id, _)| id)
    }

    /// All nodes with the given role, in document order.
    pub fn by_role(&self, role: Role) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, node)| node.role == role)
            .map(|(id, _)| id)
            .collect()
    }

    /// Serialize a subtree to HTML-like markup for snapshots and debugging.
    ///
    /// `aria-label` is emitted only for explicit names, `aria-disabled` for
    /// buttons that cannot take focus.
    pub fn markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(id, &mut out);
        out
    }

    fn write_markup(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else {
            return;
        };
        let tag = node.role.tag();
        out.push('<');
        out.push_str(tag);
        if !node.classes.is_empty() {
            let _ = write!(out, r#" class="{}""#, escape(&node.classes.join(" ")));
        }
        if let Some(name) = &node.name {
            let _ = write!(out, r#" aria-label="{}""#, escape(name));
        }
        if node.role == Role::Button && !node.focusable {
            out.push_str(r#" aria-disabled="true""#);
        }
        out.push('>');
        out.push_str(&escape(&node.text));
        for child in self.children(id) {
            self.write_markup(child, out);
        }
        let _ = write!(out, "</{tag}>");
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
