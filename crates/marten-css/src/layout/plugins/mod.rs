//! Phase plugins.
//!
//! A plugin is a display-phase correction that runs on one element after its
//! whole subtree has been computed, in ascending priority order. Handlers
//! read and write the state table only; the tree and cascade output are
//! immutable at this point.

use marten_dom::{ElementId, ElementTree};

use crate::cascade::{Effective, Property, StyleMap};
use crate::layout::Viewport;
use crate::state::StateTable;

mod block;
mod crop;
mod flex;
mod inline;
mod text_align;

pub use block::block;
pub use crop::crop;
pub use flex::flex;
pub use inline::inline;
pub use text_align::text_align;

/// Read-only context a handler sees.
pub struct PluginCtx<'a> {
    pub tree: &'a ElementTree,
    pub styles: &'a StyleMap,
    pub viewport: Viewport,
}

impl PluginCtx<'_> {
    pub fn style(&self, id: ElementId) -> Option<&Effective> {
        self.styles.get(&id)
    }

    pub fn display(&self, id: ElementId) -> &str {
        self.style(id)
            .and_then(|s| s.prop(Property::Display))
            .unwrap_or("block")
    }

    /// Whether the element is taken out of flow.
    pub fn is_absolute(&self, id: ElementId) -> bool {
        matches!(
            self.style(id).and_then(|s| s.prop(Property::Position)),
            Some("absolute" | "fixed")
        )
    }
}

/// One registered phase correction.
pub struct Plugin {
    pub name: &'static str,
    pub priority: i32,
    /// Decides from the element's effective styles whether the handler runs.
    pub selector: fn(&Effective) -> bool,
    pub handler: fn(&PluginCtx, ElementId, &mut StateTable),
}

/// The stock plugin set in registration order. Priorities keep block
/// normalization ahead of inline/flex placement, and cropping last.
pub fn canonical() -> Vec<Plugin> {
    vec![block(), inline(), flex(), text_align(), crop()]
}

/// Move an element's descendants by a delta, leaving the element itself.
pub(crate) fn offset_descendants(
    tree: &ElementTree,
    state: &mut StateTable,
    id: ElementId,
    dx: f32,
    dy: f32,
) {
    for &child in tree.children(id) {
        if let Some(child_state) = state.get_mut(child) {
            child_state.x += dx;
            child_state.y += dy;
        }
        offset_descendants(tree, state, child, dx, dy);
    }
}

/// Move an element and its whole subtree by a delta.
pub(crate) fn shift_subtree(
    tree: &ElementTree,
    state: &mut StateTable,
    id: ElementId,
    dx: f32,
    dy: f32,
) {
    if dx == 0.0 && dy == 0.0 {
        return;
    }
    if let Some(own) = state.get_mut(id) {
        own.x += dx;
        own.y += dy;
    }
    offset_descendants(tree, state, id, dx, dy);
}
