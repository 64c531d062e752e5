//! `margin-block` mapping to physical margins.
//!
//! [§ 4.2 Flow-Relative Margins](https://www.w3.org/TR/css-logical-1/#margin-properties)
//!
//! The block axis maps to top/bottom in horizontal writing, to left/right in
//! `vertical-lr`, and to right/left in `vertical-rl`. The shorthand and its
//! longhands are blanked inline after mapping so the selector stops matching.

use marten_dom::{ElementId, ElementTree};

use crate::cascade::{Effective, Property};
use crate::transform::{TransformCtx, Transformer};

pub fn margin_block() -> Transformer {
    Transformer {
        name: "margin-block",
        selector: |ctx, tree, id| {
            let styles = ctx.quick_styles(tree, id);
            styles.get("margin-block").is_some()
                || styles.get("margin-block-start").is_some()
                || styles.get("margin-block-end").is_some()
        },
        handler: |ctx, tree, id| {
            let styles = ctx.quick_styles(tree, id);
            let (start, end) = block_values(&styles);
            let writing_mode = styles.prop(Property::WritingMode).unwrap_or("");
            let (start_side, end_side) = match writing_mode {
                "vertical-lr" => ("margin-left", "margin-right"),
                "vertical-rl" => ("margin-right", "margin-left"),
                _ => ("margin-top", "margin-bottom"),
            };

            let element = tree.element_mut(id);
            if let Some(start) = start {
                element.style.insert(start_side.to_string(), start);
            }
            if let Some(end) = end {
                element.style.insert(end_side.to_string(), end);
            }
            for consumed in ["margin-block", "margin-block-start", "margin-block-end"] {
                element.style.insert(consumed.to_string(), String::new());
            }
        },
    }
}

fn block_values(styles: &Effective) -> (Option<String>, Option<String>) {
    let mut start = None;
    let mut end = None;
    if let Some(shorthand) = styles.get("margin-block") {
        let parts: Vec<&str> = shorthand.split_whitespace().collect();
        match parts.as_slice() {
            [both] => {
                start = Some((*both).to_string());
                end = Some((*both).to_string());
            }
            [s, e] => {
                start = Some((*s).to_string());
                end = Some((*e).to_string());
            }
            _ => {}
        }
    }
    if let Some(s) = styles.get("margin-block-start") {
        start = Some(s.to_string());
    }
    if let Some(e) = styles.get("margin-block-end") {
        end = Some(e.to_string());
    }
    (start, end)
}
