//! Key-token-indexed rule storage.
//!
//! Rules are delivered pre-parsed as `(selector, declarations)` pairs. Each
//! block is indexed under its subject's key token so the cascade only
//! examines blocks whose key appears among an element's identity tokens.
//! Insertion order is recorded per block; it is the cascade tie-break for
//! equal specificity.

use std::collections::HashMap;

use crate::selector::{Selector, Specificity};

/// Property declarations of one rule block.
pub type Declarations = HashMap<String, String>;

/// One declaration block with its selector and cascade metadata.
#[derive(Debug, Clone)]
pub struct RuleBlock {
    /// The full parsed selector.
    pub selector: Selector,
    /// Declared property values.
    pub declarations: Declarations,
    /// Cached specificity of the selector.
    pub specificity: Specificity,
    /// Monotonic sheet insertion index across all sheets.
    pub order: usize,
}

/// All registered rule blocks, indexed by subject key token.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    blocks: Vec<RuleBlock>,
    by_key: HashMap<String, Vec<usize>>,
}

impl RuleTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one rule. Later additions outrank earlier ones at equal
    /// specificity.
    pub fn add_rule(&mut self, selector: &str, declarations: &[(&str, &str)]) {
        let selector = Selector::parse(selector);
        let specificity = selector.specificity();
        let key = selector.key_token().to_string();
        let index = self.blocks.len();
        self.blocks.push(RuleBlock {
            selector,
            declarations: declarations
                .iter()
                .map(|&(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            specificity,
            order: index,
        });
        self.by_key.entry(key).or_default().push(index);
    }

    /// Append one stylesheet's rules in source order.
    pub fn add_sheet(&mut self, sheet: &[(&str, &[(&str, &str)])]) {
        for &(selector, declarations) in sheet {
            self.add_rule(selector, declarations);
        }
    }

    /// Blocks whose key token is among the element's identity tokens.
    /// Universal-keyed blocks are always candidates. Matching and ordering
    /// are the cascade's concern.
    #[must_use]
    pub fn candidates(&self, identity: &[String]) -> Vec<&RuleBlock> {
        let mut out = Vec::new();
        for token in identity
            .iter()
            .map(String::as_str)
            .chain(std::iter::once("*"))
        {
            if let Some(indices) = self.by_key.get(token) {
                out.extend(indices.iter().map(|&i| &self.blocks[i]));
            }
        }
        out
    }

    /// Number of registered blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_by_key_token() {
        let mut table = RuleTable::new();
        table.add_rule("div", &[("color", "red")]);
        table.add_rule(".card", &[("padding", "4px")]);
        table.add_rule("#main", &[("width", "100px")]);
        table.add_rule("*", &[("cursor", "default")]);

        let identity = vec!["div".to_string(), ".card".to_string()];
        let found = table.candidates(&identity);
        assert_eq!(found.len(), 3);

        let other = vec!["span".to_string()];
        assert_eq!(table.candidates(&other).len(), 1);
    }

    #[test]
    fn test_order_is_monotonic_across_sheets() {
        let mut table = RuleTable::new();
        table.add_sheet(&[("p", &[("color", "red")])]);
        table.add_sheet(&[("p", &[("color", "blue")])]);
        let identity = vec!["p".to_string()];
        let found = table.candidates(&identity);
        assert!(found[0].order < found[1].order);
    }
}
