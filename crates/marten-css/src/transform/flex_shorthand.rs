//! `flex` shorthand expansion.
//!
//! [§ 7.1 The flex Shorthand](https://www.w3.org/TR/css-flexbox-1/#flex-property)

use marten_dom::{ElementId, ElementTree};

use crate::cascade::Property;
use crate::transform::{TransformCtx, Transformer};

pub fn flex_shorthand() -> Transformer {
    Transformer {
        name: "flex-shorthand",
        selector: |ctx, tree, id| {
            let styles = ctx.quick_styles(tree, id);
            styles.has(Property::Flex) && !styles.has(Property::FlexGrow)
        },
        handler: |ctx, tree, id| {
            let styles = ctx.quick_styles(tree, id);
            let Some(shorthand) = styles.prop(Property::Flex) else {
                return;
            };
            let (grow, shrink, basis) = expand(shorthand);
            let element = tree.element_mut(id);
            element.style.insert("flex-grow".to_string(), grow);
            element.style.insert("flex-shrink".to_string(), shrink);
            element.style.insert("flex-basis".to_string(), basis);
        },
    }
}

fn expand(shorthand: &str) -> (String, String, String) {
    let parts: Vec<&str> = shorthand.split_whitespace().collect();
    let mut grow = "1".to_string();
    let mut shrink = "1".to_string();
    let mut basis = "0%".to_string();

    match parts.as_slice() {
        [single] => {
            if single.ends_with('%') || single.ends_with("px") || single.ends_with("em") {
                basis = (*single).to_string();
            } else if single.parse::<f32>().is_ok() {
                grow = (*single).to_string();
            }
        }
        [g, s] => {
            grow = (*g).to_string();
            shrink = (*s).to_string();
        }
        [g, s, b] => {
            grow = (*g).to_string();
            shrink = (*s).to_string();
            basis = (*b).to_string();
        }
        _ => {}
    }
    (grow, shrink, basis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_number_is_grow() {
        assert_eq!(
            expand("2"),
            ("2".to_string(), "1".to_string(), "0%".to_string())
        );
    }

    #[test]
    fn test_single_length_is_basis() {
        assert_eq!(
            expand("120px"),
            ("1".to_string(), "1".to_string(), "120px".to_string())
        );
    }

    #[test]
    fn test_three_values() {
        assert_eq!(
            expand("2 0 auto"),
            ("2".to_string(), "0".to_string(), "auto".to_string())
        );
    }
}
