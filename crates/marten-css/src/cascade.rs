//! Effective style resolution.
//!
//! [§ 6 Cascading](https://www.w3.org/TR/css-cascade-5/#cascading)
//!
//! For each element the cascade layers, in order: inherited seed from the
//! parent's effective map, authored attributes that name known properties,
//! matched rule blocks sorted by (specificity, insertion order), and inline
//! declarations last. Rules whose subject targets a pseudo-class state are
//! collected into a side map instead of being applied; the embedding event
//! layer overlays them while the state holds.

use std::collections::HashMap;
use std::str::FromStr;

use marten_dom::{ElementId, ElementTree};
use strum_macros::{AsRefStr, EnumString};

use crate::rules::{RuleBlock, RuleTable};

/// The fixed properties the engine itself reads. Everything else flows
/// through the string map untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Property {
    AlignContent,
    AlignItems,
    Background,
    BackgroundColor,
    BackgroundImage,
    Border,
    BorderRadius,
    Bottom,
    Color,
    Cursor,
    Display,
    Flex,
    FlexBasis,
    FlexDirection,
    FlexGrow,
    FlexShrink,
    FlexWrap,
    Font,
    FontFamily,
    FontSize,
    FontStyle,
    FontWeight,
    Height,
    JustifyContent,
    Left,
    LetterSpacing,
    LineHeight,
    Margin,
    MarginBottom,
    MarginLeft,
    MarginRight,
    MarginTop,
    MinHeight,
    MinWidth,
    Overflow,
    OverflowX,
    OverflowY,
    Padding,
    PaddingBottom,
    PaddingLeft,
    PaddingRight,
    PaddingTop,
    Position,
    Right,
    ScrollbarColor,
    ScrollbarWidth,
    TextAlign,
    TextDecoration,
    TextIndent,
    TextJustify,
    TextShadow,
    TextTransform,
    Top,
    Visibility,
    WhiteSpace,
    Width,
    WordSpacing,
    WritingMode,
    ZIndex,
}

/// The properties that flow from parent to child when the child leaves them
/// unset. `display` inherits here deliberately: generated text fragments pick
/// up their host's display unless a transformer overrides it.
pub const INHERITED: [Property; 18] = [
    Property::Color,
    Property::Cursor,
    Property::Font,
    Property::FontFamily,
    Property::FontSize,
    Property::FontStyle,
    Property::FontWeight,
    Property::LetterSpacing,
    Property::LineHeight,
    Property::TextAlign,
    Property::TextIndent,
    Property::TextJustify,
    Property::TextShadow,
    Property::TextTransform,
    Property::Visibility,
    Property::WordSpacing,
    Property::Display,
    Property::ScrollbarColor,
];

/// The resolved property map of one element, plus pseudo-state rule
/// collections keyed by state token (`":hover"`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effective {
    props: HashMap<String, String>,
    pseudo: HashMap<String, HashMap<String, String>>,
}

impl Effective {
    /// Look up a property by name. Empty values count as absent, which is
    /// how transformers blank out consumed shorthands.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.props
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Look up one of the fixed engine properties.
    #[must_use]
    pub fn prop(&self, property: Property) -> Option<&str> {
        self.get(property.as_ref())
    }

    /// Whether a fixed property has a non-empty value.
    #[must_use]
    pub fn has(&self, property: Property) -> bool {
        self.prop(property).is_some()
    }

    /// Set a property value.
    pub fn set(&mut self, name: &str, value: &str) {
        self.props.insert(name.to_string(), value.to_string());
    }

    /// The full resolved map.
    #[must_use]
    pub fn props(&self) -> &HashMap<String, String> {
        &self.props
    }

    /// Declarations collected for a pseudo-class state, if any rule targeted
    /// it.
    #[must_use]
    pub fn pseudo(&self, state: &str) -> Option<&HashMap<String, String>> {
        self.pseudo.get(state)
    }
}

/// Per-element effective styles for a whole pass.
pub type StyleMap = HashMap<ElementId, Effective>;

/// Resolve the effective styles of one element given its parent's resolved
/// styles.
#[must_use]
pub fn resolve(
    tree: &ElementTree,
    id: ElementId,
    parent: Option<&Effective>,
    rules: &RuleTable,
) -> Effective {
    resolve_inner(tree, id, parent, rules, true)
}

/// Resolution without pseudo-state collection, for transformers that only
/// need the base values mid-pipeline. Walks the ancestor chain itself.
#[must_use]
pub fn resolve_quick(tree: &ElementTree, id: ElementId, rules: &RuleTable) -> Effective {
    let parent = tree
        .parent(id)
        .map(|parent_id| resolve_quick(tree, parent_id, rules));
    resolve_inner(tree, id, parent.as_ref(), rules, false)
}

/// Resolve the whole tree top-down into a [`StyleMap`].
#[must_use]
pub fn resolve_all(tree: &ElementTree, rules: &RuleTable) -> StyleMap {
    let mut map = StyleMap::new();
    resolve_subtree(tree, tree.root(), None, rules, &mut map);
    map
}

fn resolve_subtree(
    tree: &ElementTree,
    id: ElementId,
    parent: Option<&Effective>,
    rules: &RuleTable,
    map: &mut StyleMap,
) {
    let effective = resolve(tree, id, parent, rules);
    for &child in tree.children(id) {
        resolve_subtree(tree, child, Some(&effective), rules, map);
    }
    map.insert(id, effective);
}

fn resolve_inner(
    tree: &ElementTree,
    id: ElementId,
    parent: Option<&Effective>,
    rules: &RuleTable,
    collect_pseudo: bool,
) -> Effective {
    let mut effective = Effective::default();

    // 1. Inherited seed.
    if let Some(parent) = parent {
        for property in INHERITED {
            if let Some(value) = parent.prop(property) {
                effective.set(property.as_ref(), value);
            }
        }
    }

    // 2. Authored attributes that name known properties.
    let element = tree.element(id);
    for (name, value) in &element.attributes {
        if Property::from_str(name).is_ok() {
            effective.set(name, value);
        }
    }

    // 3 + 4. Matched rules, weakest first.
    let identity = tree.identity_tokens(id);
    let mut matched: Vec<&RuleBlock> = rules
        .candidates(&identity)
        .into_iter()
        .filter(|block| block.selector.matches_base(tree, id))
        .collect();
    matched.sort_by_key(|block| (block.specificity, block.order));
    for block in matched {
        match block.selector.pseudo_target() {
            Some(state) if collect_pseudo => {
                let bucket = effective.pseudo.entry(state.to_string()).or_default();
                for (name, value) in &block.declarations {
                    bucket.insert(name.clone(), value.clone());
                }
            }
            Some(_) => {}
            None => {
                for (name, value) in &block.declarations {
                    effective.set(name, value);
                }
            }
        }
    }

    // 5. Inline declarations win.
    for (name, value) in &element.style {
        effective.set(name, value);
    }

    // 6. Stacking inheritance: an unset z-index under a stacked parent sits
    // one level above it.
    if !effective.has(Property::ZIndex) {
        if let Some(parent_z) = parent
            .and_then(|p| p.prop(Property::ZIndex))
            .and_then(|v| v.parse::<i32>().ok())
        {
            effective.set(Property::ZIndex.as_ref(), &(parent_z + 1).to_string());
        }
    }

    effective
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with_child() -> (ElementTree, ElementId, ElementId) {
        let mut tree = ElementTree::new();
        let parent = tree.new_element("div");
        tree.append_child(tree.root(), parent);
        let child = tree.new_element("p");
        tree.append_child(parent, child);
        (tree, parent, child)
    }

    #[test]
    fn test_inherited_seed() {
        let (tree, parent, child) = tree_with_child();
        let mut rules = RuleTable::new();
        rules.add_rule("div", &[("color", "red"), ("margin-top", "10px")]);

        let parent_eff = resolve(&tree, parent, None, &rules);
        let child_eff = resolve(&tree, child, Some(&parent_eff), &rules);
        assert_eq!(child_eff.prop(Property::Color), Some("red"));
        // Box properties never inherit.
        assert_eq!(child_eff.prop(Property::MarginTop), None);
    }

    #[test]
    fn test_specificity_beats_order_and_order_breaks_ties() {
        let (tree, parent, _) = tree_with_child();
        let mut rules = RuleTable::new();
        rules.add_rule("div", &[("color", "red")]);
        rules.add_rule("div", &[("color", "blue")]);
        let eff = resolve(&tree, parent, None, &rules);
        assert_eq!(eff.prop(Property::Color), Some("blue"));

        let mut rules = RuleTable::new();
        rules.add_rule(".boxed", &[("color", "green")]);
        rules.add_rule("div", &[("color", "blue")]);
        let mut tree = tree;
        tree.element_mut(parent).classes.push("boxed".into());
        let eff = resolve(&tree, parent, None, &rules);
        assert_eq!(eff.prop(Property::Color), Some("green"));
    }

    #[test]
    fn test_z_index_stacking() {
        let (tree, parent, child) = tree_with_child();
        let mut rules = RuleTable::new();
        rules.add_rule("div", &[("z-index", "5")]);
        let parent_eff = resolve(&tree, parent, None, &rules);
        let child_eff = resolve(&tree, child, Some(&parent_eff), &rules);
        assert_eq!(child_eff.prop(Property::ZIndex), Some("6"));
    }
}
