//! Overflow cropping and scroll application.
//!
//! Runs last on any overflow container: applies the element's scroll offset
//! to its content, hides or crops children against the container band, and
//! sizes the synthesized scrollbar thumb from the content-to-viewport
//! ratio.

use marten_dom::{ElementId, ElementTree};

use crate::cascade::{Effective, Property};
use crate::layout::plugins::{shift_subtree, Plugin, PluginCtx};
use crate::state::{Crop, StateTable};

const TRACK_TAG: &str = "marten-scrollbar";
const MIN_THUMB: f32 = 20.0;

pub fn crop() -> Plugin {
    Plugin {
        name: "crop",
        priority: 3,
        selector: |styles: &Effective| {
            styles.has(Property::Overflow)
                || styles.has(Property::OverflowX)
                || styles.has(Property::OverflowY)
        },
        handler,
    }
}

fn handler(ctx: &PluginCtx, id: ElementId, state: &mut StateTable) {
    let own = state.snapshot(id);
    if own.height <= 0.0 {
        return;
    }
    let scroll_top = ctx.tree.element(id).scroll_top;

    // Content extent ignores the synthesized scroll chrome.
    let mut min_y = f32::MAX;
    let mut max_y = f32::MIN;
    content_bounds(ctx.tree, state, id, &mut min_y, &mut max_y);
    let content_span = if min_y <= max_y {
        (max_y - min_y) + own.padding.top + own.padding.bottom
    } else {
        0.0
    };
    let scroll_amount = content_span / own.height;

    let track = ctx
        .tree
        .children(id)
        .iter()
        .copied()
        .find(|&c| ctx.tree.element(c).tag_name == TRACK_TAG);
    let thumb = track.and_then(|t| ctx.tree.children(t).first().copied());

    let mut scroll_offset = 0.0;
    if scroll_amount <= 1.0 {
        for chrome in [track, thumb].into_iter().flatten() {
            if let Some(s) = state.get_mut(chrome) {
                s.hidden = true;
            }
        }
    } else if let Some(thumb) = thumb {
        let visible = (1.0 - (scroll_amount - 1.0)).clamp(0.0, 1.0);
        let height = (own.height * visible).max(MIN_THUMB);
        let y = (own.y + scroll_top).clamp(own.y, own.y + own.height - height);
        if let Some(s) = state.get_mut(thumb) {
            s.height = height;
            s.y = y;
        }
        scroll_offset = y - own.y;
    }

    // Scroll and clip the content against the container band.
    let band_top = own.y;
    let band_bottom = own.y + own.height;
    for &child in &ctx.tree.children(id).to_vec() {
        if state.get(child).is_none() {
            continue;
        }
        let element = ctx.tree.element(child);
        if element.tag_name == TRACK_TAG {
            continue;
        }
        let fixed = ctx.style(child).and_then(|s| s.prop(Property::Position)) == Some("fixed");
        if fixed {
            continue;
        }
        shift_subtree(ctx.tree, state, child, 0.0, -scroll_top);
        let s = state.snapshot(child);
        let top = s.y;
        let bottom = s.y + s.height;
        if bottom <= band_top || top >= band_bottom {
            if let Some(child_state) = state.get_mut(child) {
                child_state.hidden = true;
            }
        } else if top < band_top || bottom > band_bottom {
            let visible_top = top.max(band_top);
            let visible_bottom = bottom.min(band_bottom);
            if let Some(child_state) = state.get_mut(child) {
                child_state.crop = Some(Crop {
                    x: 0.0,
                    y: visible_top - top,
                    width: s.width,
                    height: visible_bottom - visible_top,
                });
            }
        }
    }

    let mut own = state.snapshot(id);
    own.scroll_height = content_span.max(own.height);
    own.scroll_offset = scroll_offset;
    state.insert(id, own);
}

/// Vertical extent of the real content, skipping generated `marten-`
/// chrome.
fn content_bounds(
    tree: &ElementTree,
    state: &StateTable,
    id: ElementId,
    min_y: &mut f32,
    max_y: &mut f32,
) {
    for &child in tree.children(id) {
        if tree.element(child).tag_name.starts_with("marten-scrollbar")
            || tree.element(child).tag_name.starts_with("marten-thumb")
        {
            continue;
        }
        if let Some(s) = state.get(child) {
            if s.height > 0.0 {
                *min_y = min_y.min(s.y);
                *max_y = max_y.max(s.y + s.height);
            }
        }
        content_bounds(tree, state, child, min_y, max_y);
    }
}
