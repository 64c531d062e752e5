//! Inline flow: horizontal advance, line wrapping, baseline alignment.

use marten_dom::ElementId;

use crate::cascade::{Effective, Property};
use crate::layout::plugins::{shift_subtree, Plugin, PluginCtx};
use crate::state::StateTable;

/// Fraction of the em square above the alphabetic baseline.
const ASCENT_RATIO: f32 = 0.7;

pub fn inline() -> Plugin {
    Plugin {
        name: "inline",
        priority: 1,
        selector: |styles: &Effective| styles.prop(Property::Display) == Some("inline"),
        handler,
    }
}

fn handler(ctx: &PluginCtx, id: ElementId, state: &mut StateTable) {
    let Some(parent) = ctx.tree.parent(id) else {
        return;
    };
    let parent_state = state.snapshot(parent);
    let start_x = parent_state.x + parent_state.padding.left;
    let line_right = parent_state.x + parent_state.width - parent_state.padding.right;

    let own = state.snapshot(id);
    let (target_x, target_y) = match previous_flow_sibling(ctx, id) {
        Some(sibling) if ctx.display(sibling) == "inline" => {
            let sib = state.snapshot(sibling);
            let candidate = sib.x + sib.width + own.margin.left;
            // Wrap only when the box could fit a fresh line at all.
            if candidate + own.width > line_right && own.width <= line_right - start_x {
                (start_x + own.margin.left, sib.y + sib.height)
            } else {
                (candidate, sib.y)
            }
        }
        // After a block sibling the vertical stack from the box pass
        // already holds; only the horizontal start needs resetting.
        Some(_) | None => (start_x + own.margin.left, own.y),
    };
    shift_subtree(ctx.tree, state, id, target_x - own.x, target_y - own.y);

    baseline_align(ctx, id, state);
}

/// Align the current line run on a shared alphabetic baseline: every member
/// sinks below the line top by the ascent difference against the largest em.
fn baseline_align(ctx: &PluginCtx, id: ElementId, state: &mut StateTable) {
    let own = state.snapshot(id);
    let mut members = vec![id];
    let mut cursor = previous_flow_sibling(ctx, id);
    while let Some(sibling) = cursor {
        if ctx.display(sibling) != "inline" {
            break;
        }
        let sib = state.snapshot(sibling);
        let overlaps = sib.y < own.y + own.height && own.y < sib.y + sib.height;
        if !overlaps {
            break;
        }
        members.push(sibling);
        cursor = previous_flow_sibling(ctx, sibling);
    }
    if members.len() < 2 {
        return;
    }

    let mut line_top = f32::MAX;
    let mut max_em = 0.0f32;
    for &member in &members {
        let s = state.snapshot(member);
        line_top = line_top.min(s.y);
        max_em = max_em.max(s.em);
    }
    let line_ascent = (ASCENT_RATIO * max_em).ceil();
    for &member in &members {
        let s = state.snapshot(member);
        let ascent = (ASCENT_RATIO * s.em).ceil();
        let target_y = line_top + (line_ascent - ascent);
        shift_subtree(ctx.tree, state, member, 0.0, target_y - s.y);
    }
}

fn previous_flow_sibling(ctx: &PluginCtx, id: ElementId) -> Option<ElementId> {
    let mut current = ctx.tree.prev_sibling(id);
    while let Some(sibling) = current {
        let none = ctx
            .style(sibling)
            .and_then(|s| s.prop(Property::Display))
            == Some("none");
        if !ctx.is_absolute(sibling) && !none {
            return Some(sibling);
        }
        current = ctx.tree.prev_sibling(sibling);
    }
    None
}
