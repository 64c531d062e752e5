//! Scroll track synthesis for overflow containers.
//!
//! Any `overflow`/`overflow-x`/`overflow-y` host gains an absolutely
//! positioned `marten-scrollbar` track with a `marten-thumb` child, gets
//! `position: relative` forced when unpositioned, and reserves the track
//! width by growing `padding-right`. `scrollbar-width: thin` narrows the
//! track to 10px and `none` skips synthesis entirely. The crop plugin sizes
//! and places the thumb after layout.

use marten_dom::{Element, ElementId, ElementTree};

use crate::cascade::{Effective, Property};
use crate::transform::{TransformCtx, Transformer};

const TRACK_TAG: &str = "marten-scrollbar";
const THUMB_TAG: &str = "marten-thumb";

const DEFAULT_WIDTH: &str = "14px";
const THIN_WIDTH: &str = "10px";
const DEFAULT_TRACK_COLOR: &str = "#fafafa";
const DEFAULT_THUMB_COLOR: &str = "#c7c7c7";

pub fn scrollbar() -> Transformer {
    Transformer {
        name: "scrollbar",
        selector: |ctx, tree, id| {
            let styles = ctx.quick_styles(tree, id);
            let overflowing = styles.has(Property::Overflow)
                || styles.has(Property::OverflowX)
                || styles.has(Property::OverflowY);
            overflowing
                && styles.prop(Property::ScrollbarWidth) != Some("none")
                && !tree
                    .children(id)
                    .iter()
                    .any(|&c| tree.element(c).tag_name == TRACK_TAG)
        },
        handler: |ctx, tree, id| {
            let styles = ctx.quick_styles(tree, id);

            // Expand the overflow shorthand into per-axis longhands.
            let overflow = styles.prop(Property::Overflow).unwrap_or("");
            let parts: Vec<&str> = overflow.split_whitespace().collect();
            let x_value = styles
                .prop(Property::OverflowX)
                .or_else(|| parts.first().copied())
                .unwrap_or("")
                .to_string();
            let y_value = styles
                .prop(Property::OverflowY)
                .or_else(|| parts.get(1).or_else(|| parts.first()).copied())
                .unwrap_or("")
                .to_string();

            let width = match styles.prop(Property::ScrollbarWidth) {
                Some("thin") => THIN_WIDTH,
                _ => DEFAULT_WIDTH,
            };
            let (thumb_color, track_color) = colors(&styles);
            let positioned = styles.has(Property::Position);
            let padding_right = reserved_padding(&styles, width);
            let scroll_top = tree.element(id).scroll_top;

            {
                let host = tree.element_mut(id);
                host.style.insert("overflow-x".into(), x_value);
                host.style.insert("overflow-y".into(), y_value.clone());
                if !positioned {
                    host.style.insert("position".into(), "relative".into());
                }
            }

            if y_value != "scroll" && y_value != "auto" {
                return;
            }

            let mut track = Element::new(TRACK_TAG);
            track.style.insert("position".into(), "absolute".into());
            track.style.insert("top".into(), "0".into());
            track.style.insert("right".into(), "0".into());
            track.style.insert("width".into(), width.into());
            track.style.insert("height".into(), "100%".into());
            track.style.insert("z-index".into(), "9".into());
            track.style.insert("background".into(), track_color);
            let track = tree.alloc(track);

            let mut thumb = Element::new(THUMB_TAG);
            thumb.style.insert("position".into(), "absolute".into());
            thumb.style.insert("top".into(), format!("{scroll_top}px"));
            thumb.style.insert("left".into(), "0".into());
            thumb.style.insert("width".into(), width.into());
            thumb.style.insert("height".into(), "20px".into());
            thumb.style.insert("background".into(), thumb_color);
            thumb.style.insert("cursor".into(), "pointer".into());
            thumb.style.insert("z-index".into(), "10".into());
            let thumb = tree.alloc(thumb);

            tree.append_child(track, thumb);
            tree.append_child(id, track);
            tree.element_mut(id)
                .style
                .insert("padding-right".into(), padding_right);
        },
    }
}

/// `scrollbar-color` is `<thumb> <track>`.
fn colors(styles: &Effective) -> (String, String) {
    if let Some(value) = styles.prop(Property::ScrollbarColor) {
        let parts: Vec<&str> = value.split_whitespace().collect();
        if parts.len() >= 2 {
            return (parts[0].to_string(), parts[1].to_string());
        }
    }
    (
        DEFAULT_THUMB_COLOR.to_string(),
        DEFAULT_TRACK_COLOR.to_string(),
    )
}

fn reserved_padding(styles: &Effective, width: &str) -> String {
    let existing = styles
        .prop(Property::PaddingRight)
        .or_else(|| styles.prop(Property::Padding));
    match existing {
        Some(padding) => format!("calc({padding} + {width})"),
        None => width.to_string(),
    }
}
