//! Per-element render state.
//!
//! The layout pass writes exactly one [`RenderState`] per live element; the
//! renderer consumes the table without touching the element tree again.
//! Entries are keyed by [`ElementId`], so a removed element's entry simply
//! goes stale and is dropped by [`StateTable::retain_live`] at the end of the
//! pass.

use std::collections::{HashMap, HashSet};

use marten_common::Rgba;
use marten_dom::{ElementId, ElementTree};
use serde::Serialize;

/// Per-side box sizes (margins or padding), in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EdgeSizes {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

/// One border edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BorderSide {
    /// Stroke width in pixels.
    pub width: f32,
    /// Line style keyword (`solid`, `dashed`, ...). The rasterizer decides
    /// what it supports.
    pub style: String,
    /// Stroke color.
    pub color: Rgba,
}

/// Resolved border state for all four edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Border {
    pub top: BorderSide,
    pub right: BorderSide,
    pub bottom: BorderSide,
    pub left: BorderSide,
    /// Corner radius in pixels.
    pub radius: f32,
}

impl Border {
    /// Whether any edge has a visible stroke.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.top.width > 0.0
            || self.right.width > 0.0
            || self.bottom.width > 0.0
            || self.left.width > 0.0
    }
}

/// Visible sub-rectangle of an element, relative to its own box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Crop {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Everything the renderer needs to draw one element.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderState {
    /// Viewport-absolute left edge.
    pub x: f32,
    /// Viewport-absolute top edge.
    pub y: f32,
    /// Stacking order.
    pub z: i32,
    pub width: f32,
    pub height: f32,
    /// Resolved font-size basis in pixels.
    pub em: f32,
    pub margin: EdgeSizes,
    pub padding: EdgeSizes,
    pub border: Border,
    /// Resolved background fill, if any.
    pub background: Option<Rgba>,
    /// Shelf keys for this element's bitmaps (glyph run, border, canvas).
    pub textures: Vec<String>,
    /// Whether an overflow ancestor scrolled this element out of view.
    pub hidden: bool,
    /// Partial visibility under an overflow ancestor.
    pub crop: Option<Crop>,
    /// Full content extent, for scroll clamping.
    pub scroll_height: f32,
    /// Applied vertical scroll displacement.
    pub scroll_offset: f32,
    /// Pointer cursor keyword.
    pub cursor: String,
    /// Keyboard focus order, if focusable.
    pub tab_index: Option<i32>,
    /// Whether the element accepts text editing.
    pub editable: bool,
}

/// Render state for every live element of a pass.
#[derive(Debug, Clone, Default)]
pub struct StateTable {
    entries: HashMap<ElementId, RenderState>,
}

impl StateTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow an element's state, if the pass produced one.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&RenderState> {
        self.entries.get(&id)
    }

    /// Mutably borrow an element's state.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut RenderState> {
        self.entries.get_mut(&id)
    }

    /// Borrow an element's state, creating a default entry if absent.
    pub fn ensure(&mut self, id: ElementId) -> &mut RenderState {
        self.entries.entry(id).or_default()
    }

    /// Copy of an element's state, or the zero state when absent. Plugins
    /// read sibling and parent state through this.
    #[must_use]
    pub fn snapshot(&self, id: ElementId) -> RenderState {
        self.entries.get(&id).cloned().unwrap_or_default()
    }

    /// Replace an element's state.
    pub fn insert(&mut self, id: ElementId, state: RenderState) {
        self.entries.insert(id, state);
    }

    /// Drop entries whose elements are no longer reachable from the root.
    pub fn retain_live(&mut self, tree: &ElementTree) {
        let live: HashSet<ElementId> = tree.live_ids().into_iter().collect();
        self.entries.retain(|id, _| live.contains(id));
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &RenderState)> {
        self.entries.iter().map(|(&id, state)| (id, state))
    }
}
