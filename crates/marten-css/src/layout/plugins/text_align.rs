//! Line re-centering for `text-align: center` and `right`.
//!
//! Children are grouped into visual lines by their bottom edge, then each
//! line is shifted as a unit into the requested horizontal position within
//! the parent's content box.

use marten_dom::ElementId;

use crate::cascade::{Effective, Property};
use crate::layout::plugins::{shift_subtree, Plugin, PluginCtx};
use crate::state::StateTable;

const LINE_EPSILON: f32 = 0.5;

pub fn text_align() -> Plugin {
    Plugin {
        name: "text-align",
        priority: 2,
        selector: |styles: &Effective| {
            matches!(styles.prop(Property::TextAlign), Some("center" | "right"))
        },
        handler,
    }
}

fn handler(ctx: &PluginCtx, id: ElementId, state: &mut StateTable) {
    let Some(styles) = ctx.style(id) else {
        return;
    };
    let divisor = match styles.prop(Property::TextAlign) {
        Some("center") => 2.0,
        Some("right") => 1.0,
        _ => return,
    };
    let own = state.snapshot(id);
    let content_x = own.x + own.padding.left;
    let content_w = own.width - own.padding.left - own.padding.right;

    // (bottom edge, members) per visual line.
    let mut lines: Vec<(f32, Vec<ElementId>)> = Vec::new();
    for &child in ctx.tree.children(id) {
        if ctx.is_absolute(child) || state.get(child).is_none() {
            continue;
        }
        if ctx.tree.element(child).tag_name.starts_with("marten-scrollbar") {
            continue;
        }
        let s = state.snapshot(child);
        let bottom = s.y + s.height;
        match lines
            .iter_mut()
            .find(|(edge, _)| (*edge - bottom).abs() < LINE_EPSILON)
        {
            Some((_, members)) => members.push(child),
            None => lines.push((bottom, vec![child])),
        }
    }

    for (_, members) in &lines {
        let mut min_x = f32::MAX;
        let mut max_x = f32::MIN;
        for &member in members {
            let s = state.snapshot(member);
            min_x = min_x.min(s.x);
            max_x = max_x.max(s.x + s.width);
        }
        let line_width = max_x - min_x;
        let target_min_x = content_x + (content_w - line_width) / divisor;
        let dx = target_min_x - min_x;
        if dx.abs() < f32::EPSILON {
            continue;
        }
        for &member in members {
            shift_subtree(ctx.tree, state, member, dx, 0.0);
        }
    }
}
