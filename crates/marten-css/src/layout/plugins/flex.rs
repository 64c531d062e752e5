//! Flex container placement.
//!
//! [§ 9 Flex Layout Algorithm](https://www.w3.org/TR/css-flexbox-1/#layout-algorithm)
//!
//! Children are re-placed along an explicit main axis. Row containers fill
//! horizontally and wrap into rows when `flex-wrap` allows; column
//! containers stack vertically and wrap into columns only with an explicit
//! height. Absolutely positioned and `display: none` children never
//! participate. Reversed directions place items back-to-front and default
//! the main-axis distribution to `flex-end`.

use marten_dom::ElementId;

use crate::cascade::{Effective, Property};
use crate::layout::plugins::{shift_subtree, Plugin, PluginCtx};
use crate::state::{RenderState, StateTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Row,
    Column,
}

pub fn flex() -> Plugin {
    Plugin {
        name: "flex",
        priority: 1,
        selector: |styles: &Effective| styles.prop(Property::Display) == Some("flex"),
        handler,
    }
}

struct FlexParams {
    reversed: bool,
    wrapped: bool,
    justify: String,
    align_items: String,
    align_content: String,
    explicit_height: bool,
}

fn handler(ctx: &PluginCtx, id: ElementId, state: &mut StateTable) {
    let Some(styles) = ctx.style(id) else {
        return;
    };
    let direction = styles.prop(Property::FlexDirection).unwrap_or("row");
    let axis = if direction.starts_with("column") {
        Axis::Column
    } else {
        Axis::Row
    };
    let wrap = styles.prop(Property::FlexWrap);
    let params = FlexParams {
        reversed: direction.ends_with("-reverse"),
        wrapped: match axis {
            // Rows wrap greedily by default; nowrap opts back into a
            // single run that may overflow the container.
            Axis::Row => wrap != Some("nowrap"),
            // Columns only wrap when asked, and need a definite height
            // to break against.
            Axis::Column => matches!(wrap, Some("wrap" | "wrap-reverse")),
        },
        justify: styles
            .prop(Property::JustifyContent)
            .unwrap_or("normal")
            .to_string(),
        align_items: styles
            .prop(Property::AlignItems)
            .unwrap_or("normal")
            .to_string(),
        align_content: styles
            .prop(Property::AlignContent)
            .unwrap_or("normal")
            .to_string(),
        explicit_height: styles.has(Property::Height),
    };

    let items: Vec<ElementId> = ctx
        .tree
        .children(id)
        .iter()
        .copied()
        .filter(|&child| state.get(child).is_some())
        .filter(|&child| !ctx.is_absolute(child))
        .filter(|&child| {
            ctx.style(child).and_then(|s| s.prop(Property::Display)) != Some("none")
        })
        .collect();
    if items.is_empty() {
        return;
    }

    match axis {
        Axis::Row => layout_row(ctx, id, state, &items, &params),
        Axis::Column => layout_column(ctx, id, state, &items, &params),
    }
}

fn outer_width(s: &RenderState) -> f32 {
    s.margin.left + s.width + s.margin.right
}

fn outer_height(s: &RenderState) -> f32 {
    s.margin.top + s.height + s.margin.bottom
}

fn layout_row(
    ctx: &PluginCtx,
    id: ElementId,
    state: &mut StateTable,
    items: &[ElementId],
    params: &FlexParams,
) {
    let own = state.snapshot(id);
    let origin_x = own.x + own.padding.left;
    let origin_y = own.y + own.padding.top;
    let content_w = own.width - own.padding.left - own.padding.right;

    // Greedy line breaking by outer width.
    let mut rows: Vec<Vec<ElementId>> = Vec::new();
    if params.wrapped {
        let mut row = Vec::new();
        let mut used = 0.0f32;
        for &item in items {
            let w = outer_width(&state.snapshot(item));
            if !row.is_empty() && used + w > content_w {
                rows.push(std::mem::take(&mut row));
                used = 0.0;
            }
            used += w;
            row.push(item);
        }
        if !row.is_empty() {
            rows.push(row);
        }
    } else {
        rows.push(items.to_vec());
    }

    let mut y_cursor = origin_y;
    let mut metrics: Vec<(f32, f32, Vec<ElementId>)> = Vec::with_capacity(rows.len());
    for row in &rows {
        let order: Vec<ElementId> = if params.reversed {
            row.iter().rev().copied().collect()
        } else {
            row.clone()
        };
        let mut x_cursor = origin_x;
        let mut max_h = 0.0f32;
        for &item in &order {
            let s = state.snapshot(item);
            shift_subtree(
                ctx.tree,
                state,
                item,
                (x_cursor + s.margin.left) - s.x,
                (y_cursor + s.margin.top) - s.y,
            );
            x_cursor += outer_width(&s);
            max_h = max_h.max(outer_height(&s));
        }
        metrics.push((max_h, x_cursor - origin_x, order));
        y_cursor += max_h;
    }

    let justify = if params.reversed && params.justify == "normal" {
        "flex-end"
    } else {
        params.justify.as_str()
    };
    for (max_h, total_w, order) in &metrics {
        let leftover = content_w - total_w;
        if leftover > 0.0 {
            for (index, &item) in order.iter().enumerate() {
                let dx = main_offset(justify, leftover, order.len(), index);
                shift_subtree(ctx.tree, state, item, dx, 0.0);
            }
        }
        for &item in order {
            let s = state.snapshot(item);
            let outer = outer_height(&s);
            match params.align_items.as_str() {
                "center" => {
                    shift_subtree(ctx.tree, state, item, 0.0, (max_h - outer) / 2.0);
                }
                "flex-end" | "end" => {
                    shift_subtree(ctx.tree, state, item, 0.0, max_h - outer);
                }
                "stretch" => {
                    let auto_height = !ctx
                        .style(item)
                        .map(|s| s.has(Property::Height))
                        .unwrap_or(false);
                    if auto_height {
                        if let Some(item_state) = state.get_mut(item) {
                            item_state.height = max_h - s.margin.top - s.margin.bottom;
                        }
                    }
                }
                _ => {}
            }
        }
    }

    // Band distribution along the cross axis. `stretch` grows each band by
    // its share of the leftover and expands auto-height items to the grown
    // band; the positional keywords shift whole bands instead.
    if params.wrapped && params.explicit_height {
        let content_h = own.height - own.padding.top - own.padding.bottom;
        let used: f32 = metrics.iter().map(|m| m.0).sum();
        let leftover = content_h - used;
        if leftover > 0.0 {
            if params.align_content == "stretch" {
                let extra = leftover / metrics.len() as f32;
                for (band, (max_h, _, order)) in metrics.iter().enumerate() {
                    let dy = extra * band as f32;
                    for &item in order {
                        let s = state.snapshot(item);
                        shift_subtree(ctx.tree, state, item, 0.0, dy);
                        let auto_height = !ctx
                            .style(item)
                            .map(|st| st.has(Property::Height))
                            .unwrap_or(false);
                        if auto_height {
                            if let Some(item_state) = state.get_mut(item) {
                                item_state.height =
                                    (max_h + extra) - s.margin.top - s.margin.bottom;
                            }
                        }
                    }
                }
            } else {
                for (band, (_, _, order)) in metrics.iter().enumerate() {
                    let dy = main_offset(&params.align_content, leftover, metrics.len(), band);
                    for &item in order {
                        shift_subtree(ctx.tree, state, item, 0.0, dy);
                    }
                }
            }
        }
    }

    if !params.explicit_height {
        let mut own = state.snapshot(id);
        own.height = (y_cursor - own.y) + own.padding.bottom;
        own.scroll_height = own.scroll_height.max(own.height);
        state.insert(id, own);
    }
}

fn layout_column(
    ctx: &PluginCtx,
    id: ElementId,
    state: &mut StateTable,
    items: &[ElementId],
    params: &FlexParams,
) {
    let own = state.snapshot(id);
    let origin_x = own.x + own.padding.left;
    let origin_y = own.y + own.padding.top;
    let content_w = own.width - own.padding.left - own.padding.right;
    let content_h = own.height - own.padding.top - own.padding.bottom;

    // Column wrapping needs a definite height to break against.
    let mut columns: Vec<Vec<ElementId>> = Vec::new();
    if params.wrapped && params.explicit_height {
        let mut column = Vec::new();
        let mut used = 0.0f32;
        for &item in items {
            let h = outer_height(&state.snapshot(item));
            if !column.is_empty() && used + h > content_h {
                columns.push(std::mem::take(&mut column));
                used = 0.0;
            }
            used += h;
            column.push(item);
        }
        if !column.is_empty() {
            columns.push(column);
        }
    } else {
        columns.push(items.to_vec());
    }

    let mut x_cursor = origin_x;
    let mut metrics: Vec<(f32, f32, Vec<ElementId>)> = Vec::with_capacity(columns.len());
    for column in &columns {
        let order: Vec<ElementId> = if params.reversed {
            column.iter().rev().copied().collect()
        } else {
            column.clone()
        };
        let mut y_cursor = origin_y;
        let mut max_w = 0.0f32;
        for &item in &order {
            let s = state.snapshot(item);
            shift_subtree(
                ctx.tree,
                state,
                item,
                (x_cursor + s.margin.left) - s.x,
                (y_cursor + s.margin.top) - s.y,
            );
            y_cursor += outer_height(&s);
            max_w = max_w.max(outer_width(&s));
        }
        metrics.push((max_w, y_cursor - origin_y, order));
        x_cursor += max_w;
    }

    // Spread wrapped columns over the leftover inline space.
    if columns.len() > 1 {
        let total_widths: f32 = metrics.iter().map(|m| m.0).sum();
        let spread = ((content_w - total_widths) / columns.len() as f32).max(0.0);
        for (index, (_, _, order)) in metrics.iter().enumerate() {
            let dx = spread * index as f32;
            for &item in order {
                shift_subtree(ctx.tree, state, item, dx, 0.0);
            }
        }
    }

    let justify = if params.reversed && params.justify == "normal" {
        "flex-end"
    } else {
        params.justify.as_str()
    };
    for (max_w, total_h, order) in &metrics {
        if params.explicit_height {
            let leftover = content_h - total_h;
            if leftover > 0.0 {
                for (index, &item) in order.iter().enumerate() {
                    let dy = main_offset(justify, leftover, order.len(), index);
                    shift_subtree(ctx.tree, state, item, 0.0, dy);
                }
            }
        }
        for &item in order {
            let s = state.snapshot(item);
            let outer = outer_width(&s);
            match params.align_items.as_str() {
                "center" => {
                    shift_subtree(ctx.tree, state, item, (max_w - outer) / 2.0, 0.0);
                }
                "flex-end" | "end" => {
                    shift_subtree(ctx.tree, state, item, max_w - outer, 0.0);
                }
                "stretch" => {
                    let auto_width = !ctx
                        .style(item)
                        .map(|s| s.has(Property::Width))
                        .unwrap_or(false);
                    if auto_width {
                        if let Some(item_state) = state.get_mut(item) {
                            item_state.width = max_w - s.margin.left - s.margin.right;
                        }
                    }
                }
                _ => {}
            }
        }
    }

    if !params.explicit_height {
        let bottom = metrics
            .iter()
            .map(|(_, total_h, _)| origin_y + total_h)
            .fold(origin_y, f32::max);
        let mut own = state.snapshot(id);
        own.height = (bottom - own.y) + own.padding.bottom;
        own.scroll_height = own.scroll_height.max(own.height);
        state.insert(id, own);
    }
}

/// Per-item main-axis offset for a distribution keyword, given the free
/// space on the line and the item's placement index.
fn main_offset(justify: &str, leftover: f32, count: usize, index: usize) -> f32 {
    match justify {
        "flex-end" | "end" | "right" => leftover,
        "center" => leftover / 2.0,
        "space-between" if count > 1 => leftover / (count as f32 - 1.0) * index as f32,
        "space-evenly" => {
            let gap = leftover / (count as f32 + 1.0);
            gap * (index as f32 + 1.0)
        }
        "space-around" => {
            let gap = leftover / count as f32;
            gap * index as f32 + gap / 2.0
        }
        _ => 0.0,
    }
}
