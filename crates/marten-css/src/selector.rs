//! Selector representation and matching.
//!
//! [§ 5 Selectors](https://www.w3.org/TR/selectors-4/)
//!
//! Selectors arrive pre-tokenized from the embedding parser; this module only
//! models the resolved form. A [`Compound`] is a set of simple tokens that
//! must all hold on one element; a [`Selector`] is a chain of compounds where
//! the last one is the subject and earlier ones must match ancestors walking
//! upward. Child combinators collapse to ancestor matching.

use marten_dom::{ElementId, ElementTree};

/// Cascade precedence of a selector: ids outrank classes and pseudo-classes,
/// which outrank tags. Derived ordering compares the fields in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Specificity {
    /// Count of `#id` tokens.
    pub ids: u16,
    /// Count of `.class` and `:pseudo` tokens.
    pub classes: u16,
    /// Count of tag tokens.
    pub tags: u16,
}

/// A set of simple tokens (`tag`, `#id`, `.class`, `:pseudo`) that all apply
/// to a single element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compound {
    /// The simple tokens, in source order.
    pub tokens: Vec<String>,
}

impl Compound {
    /// Split one compound into its simple tokens. `div.card:hover` becomes
    /// `["div", ".card", ":hover"]`.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let mut tokens = Vec::new();
        let mut current = String::new();
        for ch in source.chars() {
            if matches!(ch, '#' | '.' | ':') && !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            current.push(ch);
        }
        if !current.is_empty() {
            tokens.push(current);
        }
        Self { tokens }
    }

    /// Whether every token holds against an element's identity tokens.
    /// The universal token `*` holds on everything.
    #[must_use]
    pub fn matches(&self, identity: &[String]) -> bool {
        self.tokens
            .iter()
            .all(|t| t == "*" || identity.iter().any(|i| i == t))
    }

    /// Like [`Compound::matches`] but pseudo-class tokens are not required to
    /// hold. Used when collecting pseudo-state rules for elements that are
    /// not currently in that state.
    #[must_use]
    pub fn matches_ignoring_pseudo(&self, identity: &[String]) -> bool {
        self.tokens
            .iter()
            .filter(|t| !t.starts_with(':'))
            .all(|t| t == "*" || identity.iter().any(|i| i == t))
    }

    /// The pseudo-class token, if this compound carries one.
    #[must_use]
    pub fn pseudo(&self) -> Option<&str> {
        self.tokens
            .iter()
            .find(|t| t.starts_with(':'))
            .map(String::as_str)
    }

    /// The token this compound is indexed under in the rule table:
    /// `#id` first, then a plain class, then the tag. Pseudo-class tokens are
    /// never keys, so pseudo-state rules stay discoverable for elements not
    /// currently in that state.
    #[must_use]
    pub fn key_token(&self) -> &str {
        for token in &self.tokens {
            if token.starts_with('#') {
                return token;
            }
        }
        for token in &self.tokens {
            if token.starts_with('.') {
                return token;
            }
        }
        for token in &self.tokens {
            if !token.starts_with(':') {
                return token;
            }
        }
        self.tokens.first().map_or("*", String::as_str)
    }
}

/// A parsed selector: a chain of compounds, subject last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// The compound chain in source order.
    pub parts: Vec<Compound>,
}

impl Selector {
    /// Parse a selector string. Compounds are separated by whitespace;
    /// `>` separators collapse to the same ancestor semantics.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let mut parts: Vec<Compound> = source
            .split_whitespace()
            .filter(|p| *p != ">")
            .map(Compound::parse)
            .collect();
        if parts.is_empty() {
            parts.push(Compound {
                tokens: vec!["*".to_string()],
            });
        }
        Self { parts }
    }

    /// The compound the selector ultimately targets.
    #[must_use]
    pub fn subject(&self) -> &Compound {
        &self.parts[self.parts.len() - 1]
    }

    /// The pseudo-class state the subject targets, if any.
    #[must_use]
    pub fn pseudo_target(&self) -> Option<&str> {
        self.subject().pseudo()
    }

    /// The rule table key for this selector.
    #[must_use]
    pub fn key_token(&self) -> &str {
        self.subject().key_token()
    }

    /// Sum the specificity of every token in the chain.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        let mut spec = Specificity::default();
        for part in &self.parts {
            for token in &part.tokens {
                match token.chars().next() {
                    Some('#') => spec.ids += 1,
                    Some('.' | ':') => spec.classes += 1,
                    _ => {
                        if token != "*" {
                            spec.tags += 1;
                        }
                    }
                }
            }
        }
        spec
    }

    /// Whether the selector matches the element, including any pseudo-class
    /// tokens on the subject.
    #[must_use]
    pub fn matches(&self, tree: &ElementTree, id: ElementId) -> bool {
        self.matches_inner(tree, id, false)
    }

    /// Whether the selector matches the element when pseudo-class tokens on
    /// the subject are not required. This is the form the cascade uses to
    /// collect pseudo-state rules into the side map.
    #[must_use]
    pub fn matches_base(&self, tree: &ElementTree, id: ElementId) -> bool {
        self.matches_inner(tree, id, true)
    }

    fn matches_inner(&self, tree: &ElementTree, id: ElementId, lenient_pseudo: bool) -> bool {
        let identity = tree.identity_tokens(id);
        let subject = self.subject();
        let subject_ok = if lenient_pseudo {
            subject.matches_ignoring_pseudo(&identity)
        } else {
            subject.matches(&identity)
        };
        if !subject_ok {
            return false;
        }

        // Earlier compounds must each match a distinct ancestor, nearest
        // compound against the nearest unconsumed ancestor first.
        let mut current = tree.parent(id);
        for part in self.parts[..self.parts.len() - 1].iter().rev() {
            let mut matched = None;
            while let Some(ancestor) = current {
                if part.matches(&tree.identity_tokens(ancestor)) {
                    matched = Some(ancestor);
                    break;
                }
                current = tree.parent(ancestor);
            }
            match matched {
                Some(ancestor) => current = tree.parent(ancestor),
                None => return false,
            }
        }
        true
    }
}
