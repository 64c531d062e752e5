//! `background` shorthand expansion.
//!
//! [§ 3.10 Backgrounds Shorthand](https://www.w3.org/TR/css-backgrounds-3/#background)

use marten_dom::{ElementId, ElementTree};

use crate::cascade::Property;
use crate::transform::{TransformCtx, Transformer};

pub fn background() -> Transformer {
    Transformer {
        name: "background",
        selector: |ctx, tree, id| {
            let styles = ctx.quick_styles(tree, id);
            // background-image is always written by the expansion, so its
            // presence means the shorthand was already consumed.
            styles.has(Property::Background) && !styles.has(Property::BackgroundImage)
        },
        handler: |ctx, tree, id| {
            let styles = ctx.quick_styles(tree, id);
            let Some(shorthand) = styles.prop(Property::Background) else {
                return;
            };
            let expanded = expand(shorthand);
            let element = tree.element_mut(id);
            for (name, value) in expanded {
                element.style.insert(name.to_string(), value);
            }
        },
    }
}

/// Decompose the shorthand into longhands, with the CSS initial value for
/// every part the shorthand leaves unresolved.
fn expand(shorthand: &str) -> Vec<(&'static str, String)> {
    let mut color = None;
    let mut image = "none".to_string();
    let mut repeat = "repeat".to_string();
    let mut position = "0% 0%".to_string();
    let mut size = "auto".to_string();
    let mut attachment = "scroll".to_string();
    let mut origin = "padding-box".to_string();
    let mut clip = "border-box".to_string();

    for part in split_parts(shorthand) {
        match part.as_str() {
            p if p.starts_with("url(") => image = part,
            "no-repeat" | "repeat" | "repeat-x" | "repeat-y" => repeat = part,
            "scroll" | "fixed" => attachment = part,
            "left" | "right" | "top" | "bottom" | "center" => position = part,
            "contain" | "cover" => size = part,
            "border-box" | "padding-box" | "content-box" => {
                // clip defaults to the same box as origin when only one box
                // keyword appears.
                origin = part.clone();
                clip = part;
            }
            p if p.contains('%') => position = part,
            p if p.contains("px") => size = part,
            _ => color = Some(part),
        }
    }

    let mut out = vec![
        ("background-image", image),
        ("background-repeat", repeat),
        ("background-position", position),
        ("background-size", size),
        ("background-attachment", attachment),
        ("background-origin", origin),
        ("background-clip", clip),
    ];
    if let Some(color) = color {
        out.push(("background-color", color));
    }
    out
}

/// Split on whitespace while keeping `rgb(...)`-style function calls intact.
fn split_parts(value: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0u32;
    for ch in value.chars() {
        match ch {
            '(' => {
                depth += 1;
                current.push(ch);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(ch);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}
