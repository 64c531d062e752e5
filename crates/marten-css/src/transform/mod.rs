//! Pre-layout tree rewriting.
//!
//! Transformers run once per pass, depth-first pre-order. Each pairs a
//! selector with a handler; after a handler runs, traversal re-descends into
//! the node's (possibly replaced) children. Siblings a handler inserts after
//! the current node are reached exactly once by the parent's ongoing child
//! walk. Every canonical transformer stops matching after its own rewrite,
//! so running the pipeline twice leaves the tree unchanged.

use marten_dom::{ElementId, ElementTree};

use crate::backend::FontBackend;
use crate::cascade::{self, Effective};
use crate::layout::Viewport;
use crate::rules::RuleTable;

mod background;
mod flex_shorthand;
mod list;
mod margin_block;
mod scrollbar;
mod text_split;

pub use background::background;
pub use flex_shorthand::flex_shorthand;
pub use list::list;
pub use margin_block::margin_block;
pub use scrollbar::scrollbar;
pub use text_split::text_split;

/// Shared context for transformer selectors and handlers.
pub struct TransformCtx<'a> {
    /// Registered rules, for mid-pipeline style resolution.
    pub rules: &'a RuleTable,
    pub viewport: Viewport,
    /// Font seam, for marker measurement.
    pub fonts: &'a mut dyn FontBackend,
}

impl TransformCtx<'_> {
    /// Base effective styles of an element at this point of the pipeline
    /// (no pseudo-state collection).
    #[must_use]
    pub fn quick_styles(&self, tree: &ElementTree, id: ElementId) -> Effective {
        cascade::resolve_quick(tree, id, self.rules)
    }
}

/// One structural rewrite.
pub struct Transformer {
    pub name: &'static str,
    pub selector: fn(&TransformCtx<'_>, &ElementTree, ElementId) -> bool,
    pub handler: fn(&mut TransformCtx<'_>, &mut ElementTree, ElementId),
}

/// The built-in transformers, in registration order. Shorthand expansions
/// run before the structural rewrites that read their longhands.
#[must_use]
pub fn canonical() -> Vec<Transformer> {
    vec![
        background(),
        flex_shorthand(),
        margin_block(),
        list(),
        scrollbar(),
        text_split(),
    ]
}

/// Run every transformer over the tree, depth-first pre-order.
pub fn run_pipeline(
    transformers: &[Transformer],
    ctx: &mut TransformCtx<'_>,
    tree: &mut ElementTree,
) {
    visit(transformers, ctx, tree, tree.root());
}

fn visit(
    transformers: &[Transformer],
    ctx: &mut TransformCtx<'_>,
    tree: &mut ElementTree,
    id: ElementId,
) {
    for transformer in transformers {
        if (transformer.selector)(ctx, tree, id) {
            (transformer.handler)(ctx, tree, id);
        }
    }
    // Re-read the child list each step: handlers above and recursive visits
    // below may have replaced or extended it.
    let mut index = 0;
    while index < tree.children(id).len() {
        let child = tree.children(id)[index];
        visit(transformers, ctx, tree, child);
        index += 1;
    }
}
