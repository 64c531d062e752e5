//! Element tree for the marten layout engine.
//!
//! # Design
//!
//! The tree uses arena allocation with [`ElementId`] indices for all
//! relationships: children are owned index lists, the parent is a plain
//! (non-owning) index, and there is no cyclic ownership. Slots are never
//! freed within a session, so an [`ElementId`] is a stable identity key:
//! render state tables index by it, and a removed element's id is never
//! reused.

use std::collections::HashMap;

use marten_common::Bitmap;

/// A type-safe index into the element tree.
///
/// Doubles as the element's identity key: generated once at allocation and
/// never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

impl ElementId {
    /// The root element is always at index 0.
    pub const ROOT: ElementId = ElementId(0);
}

/// Authored data for one element.
///
/// `attributes` holds authored property values from markup; `style` holds
/// inline declarations, which take the highest cascade precedence.
/// Transformer rewrites land in `style` so the cascade picks them up
/// naturally.
#[derive(Debug, Clone, Default)]
pub struct Element {
    /// Tag name, lowercase.
    pub tag_name: String,
    /// `id` attribute, if present.
    pub id: Option<String>,
    /// Ordered class list. Pseudo-class markers (`:focus`, `:hover`) are
    /// stored here with their leading colon, alongside plain classes.
    pub classes: Vec<String>,
    /// Authored property mapping from markup attributes.
    pub attributes: HashMap<String, String>,
    /// Inline declarations (highest cascade precedence).
    pub style: HashMap<String, String>,
    /// Free-text content.
    pub text: String,
    /// Vertical scroll offset, set by the embedding event layer.
    pub scroll_top: f32,
    /// Horizontal scroll offset, set by the embedding event layer.
    pub scroll_left: f32,
    /// Tab order position, if focusable by keyboard.
    pub tab_index: Option<i32>,
    /// Whether the element accepts text editing.
    pub editable: bool,
    /// Whether the element can take focus.
    pub focusable: bool,
    /// Whether the element currently has focus.
    pub focused: bool,
    /// Externally rendered pixel content (canvas-like elements).
    pub canvas: Option<Bitmap>,
}

impl Element {
    /// Create an element with the given tag name.
    #[must_use]
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    /// Add a class (or pseudo-class marker) if not already present.
    pub fn add_class(&mut self, class: &str) {
        if !self.classes.iter().any(|c| c == class) {
            self.classes.push(class.to_string());
        }
    }

    /// Remove a class (or pseudo-class marker).
    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }
}

/// One arena slot: the element plus its tree relationships.
#[derive(Debug, Clone)]
struct Slot {
    element: Element,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

/// Arena-based element tree with O(1) node access.
#[derive(Debug, Clone, Default)]
pub struct ElementTree {
    nodes: Vec<Slot>,
}

impl ElementTree {
    /// Create a tree with just the root element.
    #[must_use]
    pub fn new() -> Self {
        let mut tree = Self { nodes: Vec::new() };
        let root = tree.alloc(Element::new("root"));
        debug_assert_eq!(root, ElementId::ROOT);
        tree
    }

    /// Root element id.
    #[must_use]
    pub fn root(&self) -> ElementId {
        ElementId::ROOT
    }

    /// Number of allocated slots (including detached elements).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty (never true after `new`).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new, detached element and return its identity.
    pub fn alloc(&mut self, element: Element) -> ElementId {
        let id = ElementId(self.nodes.len());
        self.nodes.push(Slot {
            element,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Allocate a new, detached element with the given tag.
    pub fn new_element(&mut self, tag_name: &str) -> ElementId {
        self.alloc(Element::new(tag_name))
    }

    /// Borrow an element.
    ///
    /// # Panics
    /// Panics if `id` was not allocated by this tree.
    #[must_use]
    pub fn element(&self, id: ElementId) -> &Element {
        &self.nodes[id.0].element
    }

    /// Mutably borrow an element.
    ///
    /// # Panics
    /// Panics if `id` was not allocated by this tree.
    pub fn element_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.nodes[id.0].element
    }

    /// Parent of an element, if attached.
    #[must_use]
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes[id.0].parent
    }

    /// Children of an element, in document order.
    #[must_use]
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        &self.nodes[id.0].children
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        self.detach(child);
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Insert `child` into `parent` immediately before `target`.
    /// Falls back to append when `target` is not a child of `parent`.
    pub fn insert_before(&mut self, parent: ElementId, child: ElementId, target: ElementId) {
        self.detach(child);
        match self.child_index(parent, target) {
            Some(idx) => {
                self.nodes[parent.0].children.insert(idx, child);
                self.nodes[child.0].parent = Some(parent);
            }
            None => self.append_child(parent, child),
        }
    }

    /// Insert `child` into `parent` immediately after `target`.
    /// Falls back to append when `target` is not a child of `parent`.
    pub fn insert_after(&mut self, parent: ElementId, child: ElementId, target: ElementId) {
        self.detach(child);
        match self.child_index(parent, target) {
            Some(idx) => {
                self.nodes[parent.0].children.insert(idx + 1, child);
                self.nodes[child.0].parent = Some(parent);
            }
            None => self.append_child(parent, child),
        }
    }

    /// Detach an element from its parent. The slot (and id) stays valid;
    /// any render state for the subtree becomes stale.
    pub fn remove(&mut self, id: ElementId) {
        self.detach(id);
    }

    /// Replace all children of `parent` with `children`, in order.
    pub fn replace_children(&mut self, parent: ElementId, children: Vec<ElementId>) {
        for &old in &std::mem::take(&mut self.nodes[parent.0].children) {
            self.nodes[old.0].parent = None;
        }
        for child in children {
            self.append_child(parent, child);
        }
    }

    /// Previous sibling in document order.
    #[must_use]
    pub fn prev_sibling(&self, id: ElementId) -> Option<ElementId> {
        let parent = self.parent(id)?;
        let idx = self.child_index(parent, id)?;
        idx.checked_sub(1).map(|i| self.children(parent)[i])
    }

    /// Next sibling in document order.
    #[must_use]
    pub fn next_sibling(&self, id: ElementId) -> Option<ElementId> {
        let parent = self.parent(id)?;
        let idx = self.child_index(parent, id)?;
        self.children(parent).get(idx + 1).copied()
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: ElementId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Whether some ancestor carries the given tag name.
    #[must_use]
    pub fn has_ancestor_tag(&self, id: ElementId, tag: &str) -> bool {
        self.ancestors(id).any(|a| self.element(a).tag_name == tag)
    }

    /// The element's selector identity: tag, `#id` if present, and one token
    /// per class (pseudo-class markers keep their leading colon).
    #[must_use]
    pub fn identity_tokens(&self, id: ElementId) -> Vec<String> {
        let el = self.element(id);
        let mut tokens = Vec::with_capacity(2 + el.classes.len());
        tokens.push(el.tag_name.clone());
        if let Some(elem_id) = &el.id {
            tokens.push(format!("#{elem_id}"));
        }
        for class in &el.classes {
            if class.starts_with(':') {
                tokens.push(class.clone());
            } else {
                tokens.push(format!(".{class}"));
            }
        }
        tokens
    }

    /// Whether any child (recursively) carries non-whitespace text.
    ///
    /// The text-splitting transformer uses this as its idempotence guard:
    /// once a host's words have been split into generated children, the
    /// children carry text and the host no longer matches.
    #[must_use]
    pub fn children_have_text(&self, id: ElementId) -> bool {
        self.children(id).iter().any(|&child| {
            !self.element(child).text.trim().is_empty() || self.children_have_text(child)
        })
    }

    /// Give the element focus, adding the `:focus` pseudo-class marker.
    pub fn focus(&mut self, id: ElementId) {
        let el = self.element_mut(id);
        if el.focusable {
            el.focused = true;
            el.add_class(":focus");
        }
    }

    /// Remove focus and the `:focus` pseudo-class marker.
    pub fn blur(&mut self, id: ElementId) {
        let el = self.element_mut(id);
        if el.focusable {
            el.focused = false;
            el.remove_class(":focus");
        }
    }

    /// All elements reachable from the root, in document (pre-)order.
    #[must_use]
    pub fn live_ids(&self) -> Vec<ElementId> {
        let mut out = Vec::new();
        self.collect_live(ElementId::ROOT, &mut out);
        out
    }

    fn collect_live(&self, id: ElementId, out: &mut Vec<ElementId>) {
        out.push(id);
        for &child in self.children(id) {
            self.collect_live(child, out);
        }
    }

    fn child_index(&self, parent: ElementId, child: ElementId) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    fn detach(&mut self, id: ElementId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a ElementTree,
    current: Option<ElementId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}
