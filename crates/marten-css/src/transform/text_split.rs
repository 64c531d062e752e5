//! Word splitting into `marten-text` fragments.
//!
//! Layout measures and wraps whole elements, so free text becomes one
//! generated `marten-text` element per whitespace-delimited word. Inline
//! hosts keep their first word and insert the rest as following siblings;
//! block hosts give up their text and gain one child per word. Generated
//! fragments carry text of their own, which is exactly what stops the
//! selector from matching again.

use marten_dom::{Element, ElementId, ElementTree};

use crate::cascade::Property;
use crate::transform::{TransformCtx, Transformer};

const FRAGMENT_TAG: &str = "marten-text";

pub fn text_split() -> Transformer {
    Transformer {
        name: "text-split",
        selector: |_ctx, tree, id| {
            let element = tree.element(id);
            element.tag_name != FRAGMENT_TAG
                && !element.text.trim().is_empty()
                && !tree.children_have_text(id)
                && !tree.has_ancestor_tag(id, "head")
        },
        handler: |ctx, tree, id| {
            let text = tree.element(id).text.trim().to_string();
            let words: Vec<&str> = text.split_whitespace().collect();
            if words.is_empty() {
                return;
            }

            let styles = ctx.quick_styles(tree, id);
            if styles.prop(Property::Display) == Some("inline") {
                let Some(parent) = tree.parent(id) else {
                    return;
                };
                tree.element_mut(id).text = words[0].to_string();
                // Insert trailing words back-to-front so repeated
                // insert-after lands them in document order.
                for word in words[1..].iter().rev() {
                    let fragment = fragment(tree, word);
                    tree.insert_after(parent, fragment, id);
                }
            } else {
                tree.element_mut(id).text.clear();
                for word in &words {
                    let fragment = fragment(tree, word);
                    tree.element_mut(fragment)
                        .style
                        .insert("font-size".into(), "1em".into());
                    tree.append_child(id, fragment);
                }
            }
        },
    }
}

fn fragment(tree: &mut ElementTree, word: &str) -> ElementId {
    let mut element = Element::new(FRAGMENT_TAG);
    element.text = word.to_string();
    element.style.insert("display".into(), "inline".into());
    tree.alloc(element)
}
