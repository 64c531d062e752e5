//! Block width normalization.

use marten_dom::ElementId;

use crate::cascade::{Effective, Property};
use crate::layout::plugins::{Plugin, PluginCtx};
use crate::state::StateTable;

/// Auto-width blocks fill the parent minus their own horizontal margins;
/// explicit widths grow by horizontal padding (content-box sizing).
pub fn block() -> Plugin {
    Plugin {
        name: "block",
        priority: 0,
        selector: |styles: &Effective| styles.prop(Property::Display).unwrap_or("block") == "block",
        handler: |ctx: &PluginCtx, id: ElementId, state: &mut StateTable| {
            let Some(parent) = ctx.tree.parent(id) else {
                return;
            };
            let Some(styles) = ctx.style(id) else {
                return;
            };
            let parent_width = state.snapshot(parent).width;
            let mut own = state.snapshot(id);
            if styles.has(Property::Width) {
                own.width += own.padding.left + own.padding.right;
            } else {
                own.width = parent_width - (own.margin.left + own.margin.right);
            }
            state.insert(id, own);
        },
    }
}
