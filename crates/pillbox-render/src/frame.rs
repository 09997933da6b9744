#![forbid(unsafe_code)]

//! The render target: cells, pointer targets, and semantic nodes.
//!
//! Widgets draw into [`Frame::buffer`], claim cells for pointer input with
//! [`Frame::register_hit`], and describe themselves in
//! [`Frame::semantics_mut`]. Hosts read the frame back to route clicks and
//! to answer accessibility queries.
//!
//! ```
//! use pillbox_core::geometry::Rect;
//! use pillbox_render::frame::{Frame, HitId, HitRegion};
//!
//! let mut frame = Frame::with_hit_grid(20, 1);
//! frame.register_hit(Rect::new(0, 0, 6, 1), HitId::new(1), HitRegion::Content, 0);
//! frame.register_hit(Rect::new(4, 0, 2, 1), HitId::new(1), HitRegion::Button, 0);
//! assert_eq!(frame.hit_test(3, 0), Some((HitId::new(1), HitRegion::Content, 0)));
//! assert_eq!(frame.hit_test(5, 0), Some((HitId::new(1), HitRegion::Button, 0)));
//! ```

use crate::buffer::Buffer;
use crate::semantics::SemanticTree;
use pillbox_core::geometry::Rect;

/// Identifies the widget that owns a hit region.
///
/// Hosts hand out one ID per mounted widget; item-level detail goes in
/// [`HitData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HitId(pub u32);

impl HitId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Widget-defined payload. Pill lists store the item index here.
pub type HitData = u64;

/// Which part of a widget a cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HitRegion {
    #[default]
    None,
    /// The widget body.
    Content,
    /// A control nested inside the body, such as a pill's close button.
    Button,
}

/// Where pointer input lands: the owning widget, region, and payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitTarget {
    pub id: HitId,
    pub region: HitRegion,
    pub data: HitData,
}

impl HitTarget {
    #[inline]
    pub const fn new(id: HitId, region: HitRegion, data: HitData) -> Self {
        Self { id, region, data }
    }

    #[inline]
    pub const fn into_parts(self) -> (HitId, HitRegion, HitData) {
        (self.id, self.region, self.data)
    }
}

/// Per-cell pointer ownership.
///
/// Registration is last-writer-wins, so a control registered after its
/// container takes the cells it covers.
#[derive(Debug, Clone)]
pub struct HitGrid {
    width: u16,
    height: u16,
    cells: Vec<Option<HitTarget>>,
}

impl HitGrid {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    /// The target at (x, y), or `None` when unclaimed or out of bounds.
    pub fn get(&self, x: u16, y: u16) -> Option<HitTarget> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Claim every in-bounds cell of `rect` for `target`.
    pub fn register(&mut self, rect: Rect, target: HitTarget) {
        let clipped = Rect::from_size(self.width, self.height).intersection(&rect);
        let stride = self.width as usize;
        for y in clipped.y..clipped.bottom() {
            let row = y as usize * stride;
            let span = row + clipped.x as usize..row + clipped.right() as usize;
            self.cells[span].fill(Some(target));
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }
}

/// One render pass worth of output.
#[derive(Debug, Clone)]
pub struct Frame {
    pub buffer: Buffer,
    hit_grid: Option<HitGrid>,
    semantics: SemanticTree,
}

impl Frame {
    /// A frame that records no pointer targets.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            buffer: Buffer::new(width, height),
            hit_grid: None,
            semantics: SemanticTree::new(),
        }
    }

    /// A frame that records pointer targets.
    pub fn with_hit_grid(width: u16, height: u16) -> Self {
        Self {
            hit_grid: Some(HitGrid::new(width, height)),
            ..Self::new(width, height)
        }
    }

    pub fn enable_hit_testing(&mut self) {
        if self.hit_grid.is_none() {
            self.hit_grid = Some(HitGrid::new(self.width(), self.height()));
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.buffer.width()
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.buffer.height()
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.buffer.bounds()
    }

    /// Drop everything drawn, claimed, and described so far.
    pub fn clear(&mut self) {
        self.buffer.clear();
        if let Some(grid) = &mut self.hit_grid {
            grid.clear();
        }
        self.semantics.clear();
    }

    /// Claim `rect` for pointer input.
    ///
    /// Returns `false` when the frame has no hit grid.
    pub fn register_hit(
        &mut self,
        rect: Rect,
        id: HitId,
        region: HitRegion,
        data: HitData,
    ) -> bool {
        match &mut self.hit_grid {
            Some(grid) => {
                grid.register(rect, HitTarget::new(id, region, data));
                true
            }
            None => false,
        }
    }

    /// The pointer target at (x, y).
    pub fn hit_test(&self, x: u16, y: u16) -> Option<(HitId, HitRegion, HitData)> {
        self.hit_grid
            .as_ref()
            .and_then(|grid| grid.get(x, y))
            .map(HitTarget::into_parts)
    }

    pub fn hit_grid(&self) -> Option<&HitGrid> {
        self.hit_grid.as_ref()
    }

    pub fn semantics(&self) -> &SemanticTree {
        &self.semantics
    }

    pub fn semantics_mut(&mut self) -> &mut SemanticTree {
        &mut self.semantics
    }
}
