//! List row synthesis for `ol` and `ul`.
//!
//! Each child is wrapped in a generated `li` row carrying a marker
//! sub-element and the original child. Ordered markers (`1.`, `2.`, ...) are
//! right-aligned to the widest marker by measuring each through the font
//! seam; unordered markers are a small round bullet.

use marten_common::units;
use marten_dom::{Element, ElementId, ElementTree};

use crate::backend::TextRun;
use crate::cascade::Property;
use crate::transform::{TransformCtx, Transformer};

/// Marker class of generated rows, doubling as the idempotence guard.
const ROW_CLASS: &str = "marten-list-item";

pub fn list() -> Transformer {
    Transformer {
        name: "list",
        selector: |_ctx, tree, id| {
            let tag = tree.element(id).tag_name.as_str();
            if tag != "ol" && tag != "ul" {
                return false;
            }
            let children = tree.children(id);
            !children.is_empty()
                && !children
                    .iter()
                    .any(|&c| tree.element(c).classes.iter().any(|cl| cl == ROW_CLASS))
        },
        handler: |ctx, tree, id| {
            let ordered = tree.element(id).tag_name == "ol";
            let children: Vec<ElementId> = tree.children(id).to_vec();

            // Measure every ordinal so the column can right-align.
            let mut marker_widths = Vec::new();
            let mut max_width = 0.0f32;
            if ordered {
                let styles = ctx.quick_styles(tree, id);
                let em = styles
                    .prop(Property::FontSize)
                    .and_then(|v| units::resolve(v, 16.0, ctx.viewport.width))
                    .unwrap_or(16.0);
                for index in 0..children.len() {
                    let run = TextRun::from_styles(&ordinal(index), &styles, em, ctx.viewport.width);
                    let width = ctx.fonts.measure(&run);
                    max_width = max_width.max(width);
                    marker_widths.push(width);
                }
            }

            let mut rows = Vec::with_capacity(children.len());
            for (index, child) in children.into_iter().enumerate() {
                let mut row_el = Element::new("li");
                row_el.add_class(ROW_CLASS);
                row_el.style.insert("display".into(), "flex".into());
                row_el.style.insert("align-items".into(), "center".into());
                let row = tree.alloc(row_el);

                let mut marker = Element::new("marten-marker");
                if ordered {
                    marker.text = ordinal(index);
                    marker.style.insert("display".into(), "block".into());
                    marker.style.insert("margin-right".into(), "6px".into());
                    marker.style.insert(
                        "margin-left".into(),
                        format!("{}px", max_width - marker_widths[index]),
                    );
                } else {
                    marker.style.insert("width".into(), "5px".into());
                    marker.style.insert("height".into(), "5px".into());
                    marker.style.insert("background".into(), "#000".into());
                    marker.style.insert("border-radius".into(), "100px".into());
                    marker.style.insert("margin-right".into(), "10px".into());
                }
                let marker = tree.alloc(marker);

                tree.append_child(row, marker);
                tree.append_child(row, child);
                rows.push(row);
            }
            tree.replace_children(id, rows);
        },
    }
}

fn ordinal(index: usize) -> String {
    format!("{}.", index + 1)
}
