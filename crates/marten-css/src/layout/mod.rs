//! The box layout pass.
//!
//! [`LayoutEngine::layout`] is the whole per-frame pipeline: transformer
//! pipeline, cascade, recursive box pass with phase plugins, stale-state
//! drop, one shelf sweep. The recursive core resolves each element's box
//! top-down, recurses, then finishes bottom-up (auto height, scroll extent,
//! plugins), so a plugin always sees fully phased children.

use marten_common::{color, units, warning::warn_once, Bitmap};
use marten_dom::{ElementId, ElementTree};

use crate::backend::{BorderRasterizer, BorderSpec, FontBackend, TextRun};
use crate::cascade::{self, Effective, Property, StyleMap};
use crate::rules::RuleTable;
use crate::shelf::Shelf;
use crate::state::{Border, EdgeSizes, RenderState, StateTable};
use crate::transform::{self, TransformCtx, Transformer};

pub mod plugins;

use plugins::{Plugin, PluginCtx};

/// Structural tags that never produce a rendered box.
const NON_RENDERED_TAGS: [&str; 6] = ["head", "meta", "title", "link", "script", "style"];

/// Root font-size basis.
const ROOT_EM: f32 = 16.0;

/// The layout target dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// One engine instance: rules, transformer and plugin registries, the
/// resource shelf, and the two collaborator seams. Nothing here is
/// process-global; two engines never share registries.
pub struct LayoutEngine<F: FontBackend, R: BorderRasterizer> {
    rules: RuleTable,
    transformers: Vec<Transformer>,
    plugins: Vec<Plugin>,
    shelf: Shelf,
    viewport: Viewport,
    fonts: F,
    borders: R,
}

impl<F: FontBackend, R: BorderRasterizer> LayoutEngine<F, R> {
    /// Create an engine with the canonical transformer and plugin sets.
    pub fn new(viewport: Viewport, fonts: F, borders: R) -> Self {
        let mut plugins = plugins::canonical();
        plugins.sort_by_key(|p| p.priority);
        Self {
            rules: RuleTable::new(),
            transformers: transform::canonical(),
            plugins,
            shelf: Shelf::new(),
            viewport,
            fonts,
            borders,
        }
    }

    /// Append a transformer after the canonical set.
    #[must_use]
    pub fn with_transformer(mut self, transformer: Transformer) -> Self {
        self.transformers.push(transformer);
        self
    }

    /// Register an additional phase plugin, kept in ascending priority
    /// order (stable for equal priorities).
    #[must_use]
    pub fn with_plugin(mut self, plugin: Plugin) -> Self {
        self.plugins.push(plugin);
        self.plugins.sort_by_key(|p| p.priority);
        self
    }

    /// Append one stylesheet's rules.
    pub fn add_sheet(&mut self, sheet: &[(&str, &[(&str, &str)])]) {
        self.rules.add_sheet(sheet);
    }

    /// Append a single rule.
    pub fn add_rule(&mut self, selector: &str, declarations: &[(&str, &str)]) {
        self.rules.add_rule(selector, declarations);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The bitmap store the pass fills.
    #[must_use]
    pub fn shelf(&self) -> &Shelf {
        &self.shelf
    }

    /// Register the shelf's unload callback.
    pub fn set_unload_callback(&mut self, callback: Box<dyn FnMut(&str)>) {
        self.shelf.set_unload_callback(callback);
    }

    /// Run one full pass over the tree.
    pub fn layout(&mut self, tree: &mut ElementTree, state: &mut StateTable) {
        let mut ctx = TransformCtx {
            rules: &self.rules,
            viewport: self.viewport,
            fonts: &mut self.fonts,
        };
        transform::run_pipeline(&self.transformers, &mut ctx, tree);

        let styles = cascade::resolve_all(tree, &self.rules);

        let root = tree.root();
        {
            let root_state = state.ensure(root);
            *root_state = RenderState {
                width: self.viewport.width,
                height: self.viewport.height,
                em: ROOT_EM,
                ..RenderState::default()
            };
        }

        let mut pass = BoxPass {
            tree,
            styles: &styles,
            shelf: &mut self.shelf,
            fonts: &mut self.fonts,
            borders: &mut self.borders,
            plugins: &self.plugins,
            viewport: self.viewport,
        };
        for child in pass.tree.children(root).to_vec() {
            pass.compute(child, state);
        }

        // Borders are rasterized once every box is final: ancestor plugins
        // (stretch, band distribution) may resize an element after its own
        // compute finished.
        for id in pass.tree.live_ids() {
            pass.rasterize_border(id, state);
        }

        state.retain_live(tree);
        self.shelf.clean();
    }
}

/// Borrow bundle for one recursive box pass.
struct BoxPass<'a> {
    tree: &'a ElementTree,
    styles: &'a StyleMap,
    shelf: &'a mut Shelf,
    fonts: &'a mut dyn FontBackend,
    borders: &'a mut dyn BorderRasterizer,
    plugins: &'a [Plugin],
    viewport: Viewport,
}

impl BoxPass<'_> {
    fn compute(&mut self, id: ElementId, state: &mut StateTable) {
        let tree = self.tree;
        let styles_map = self.styles;
        let element = tree.element(id);

        if NON_RENDERED_TAGS.contains(&element.tag_name.as_str()) {
            state.insert(id, RenderState::default());
            return;
        }
        let Some(styles) = styles_map.get(&id) else {
            return;
        };
        let Some(parent_id) = tree.parent(id) else {
            return;
        };
        let parent = state.snapshot(parent_id);
        let parent_em = if parent.em > 0.0 { parent.em } else { ROOT_EM };

        let em = styles
            .prop(Property::FontSize)
            .and_then(|v| units::resolve(v, parent_em, parent.width))
            .unwrap_or(parent_em);

        let display = styles.prop(Property::Display).unwrap_or("block");
        if display == "none" {
            // The box zeroes and the subtree is skipped entirely; stale
            // descendant entries fall to retain_live or simply stay unset.
            state.insert(id, RenderState::default());
            return;
        }

        let margin = edge_sizes(styles, Property::Margin, "margin", em, parent.width);
        let padding = edge_sizes(styles, Property::Padding, "padding", em, parent.width);
        let border = resolve_border(styles, em, parent.width);

        let mut width = styles
            .prop(Property::Width)
            .and_then(|v| units::resolve(v, em, parent.width))
            .unwrap_or(0.0);
        let mut height = styles
            .prop(Property::Height)
            .and_then(|v| units::resolve(v, em, parent.height))
            .unwrap_or(0.0);
        // Any non-inline box with auto width fills the parent, flex
        // containers included.
        if display != "inline" && !styles.has(Property::Width) {
            width = parent.width - (margin.left + margin.right);
        }

        // Position resolution. Absolute boxes anchor to the nearest
        // positioned ancestor; flow boxes stack on the preceding
        // non-absolute sibling.
        let position = styles.prop(Property::Position).unwrap_or("static");
        let mut x = parent.x + parent.padding.left;
        let mut y = parent.y + parent.padding.top;
        let (mut top_set, mut left_set, mut right_set, mut bottom_set) =
            (false, false, false, false);

        if position == "absolute" || position == "fixed" {
            let base = if position == "fixed" {
                state.snapshot(tree.root())
            } else {
                self.positioned_ancestor(id, state)
            };
            if let Some(v) = styles
                .prop(Property::Top)
                .and_then(|v| units::resolve(v, em, parent.width))
            {
                y = base.y + v;
                top_set = true;
            }
            if let Some(v) = styles
                .prop(Property::Left)
                .and_then(|v| units::resolve(v, em, parent.width))
            {
                x = base.x + v;
                left_set = true;
            }
            // When both opposing edges resolve, the later edge wins: right
            // overrides left and bottom overrides top.
            if let Some(v) = styles
                .prop(Property::Right)
                .and_then(|v| units::resolve(v, em, parent.width))
            {
                x = base.x + (base.width - width) - v;
                right_set = true;
            }
            if let Some(v) = styles
                .prop(Property::Bottom)
                .and_then(|v| units::resolve(v, em, parent.width))
            {
                y = base.y + (base.height - height) - v;
                bottom_set = true;
            }
        } else if let Some(prev) = self.previous_flow_sibling(id) {
            let sibling = state.snapshot(prev);
            let sibling_inline = styles_map
                .get(&prev)
                .and_then(|s| s.prop(Property::Display))
                == Some("inline");
            if display == "inline" && sibling_inline {
                y = sibling.y;
            } else {
                // The sibling's bottom margin is part of its flow extent.
                y = sibling.y + sibling.height + sibling.margin.bottom;
            }
        }

        let in_flow = !(top_set || left_set || right_set || bottom_set);
        if left_set || in_flow {
            x += margin.left;
        }
        if top_set || in_flow {
            y += margin.top;
        }
        if right_set {
            x -= margin.right;
        }
        if bottom_set {
            y -= margin.bottom;
        }

        let mut textures = Vec::new();

        // Own text becomes a shelf-cached glyph run when no descendant
        // carries text (the splitting transformer guarantees leaves).
        let text = element.text.trim();
        if !text.is_empty() && !tree.children_have_text(id) {
            let run = TextRun::from_styles(text, styles, em, parent.width);
            let measured = self.fonts.measure(&run);
            let line_height = self.fonts.line_height(&run);
            let key = run.cache_key();
            if !self.shelf.check(&key) {
                match self.fonts.render(&run) {
                    Ok((bitmap, _advance)) => {
                        self.shelf.set(&key, bitmap);
                    }
                    Err(err) => {
                        warn_once("font", &err.to_string());
                        self.shelf.set(
                            &key,
                            Bitmap::blank(
                                measured.ceil().max(1.0) as u32,
                                line_height.ceil().max(1.0) as u32,
                            ),
                        );
                    }
                }
            }
            textures.push(key);
            if !styles.has(Property::Width) && display == "inline" {
                width = measured + padding.left + padding.right;
            }
            if !styles.has(Property::Height) {
                height = line_height;
            }
        }

        // Externally rendered pixel content.
        if let Some(canvas) = &element.canvas {
            let key = format!("canvas-{}", id.0);
            let (canvas_w, canvas_h) = canvas.dimensions_f32();
            self.shelf.set(&key, canvas.clone());
            textures.push(key);
            if !styles.has(Property::Width) && width == 0.0 {
                width = canvas_w;
            }
            if !styles.has(Property::Height) && height == 0.0 {
                height = canvas_h;
            }
        }

        state.insert(
            id,
            RenderState {
                x,
                y,
                z: styles
                    .prop(Property::ZIndex)
                    .and_then(|v| v.parse::<i32>().ok())
                    .unwrap_or(0),
                width,
                height,
                em,
                margin,
                padding,
                border,
                background: styles
                    .prop(Property::BackgroundColor)
                    .and_then(color::parse)
                    .or_else(|| styles.prop(Property::Background).and_then(color::parse)),
                textures,
                hidden: false,
                crop: None,
                scroll_height: 0.0,
                scroll_offset: 0.0,
                cursor: styles.prop(Property::Cursor).unwrap_or("").to_string(),
                tab_index: element.tab_index,
                editable: element.editable,
            },
        );

        // Children, with this box as flow origin.
        let content_top = y + padding.top;
        let mut flow_bottom = content_top;
        let mut scroll_bottom = content_top;
        for child in tree.children(id).to_vec() {
            self.compute(child, state);
            let child_state = state.snapshot(child);
            let child_bottom = child_state.y + child_state.height + child_state.margin.bottom;
            let child_absolute = matches!(
                styles_map
                    .get(&child)
                    .and_then(|s| s.prop(Property::Position)),
                Some("absolute" | "fixed")
            );
            if !child_absolute {
                flow_bottom = flow_bottom.max(child_bottom);
            }
            scroll_bottom = scroll_bottom.max(child_bottom);
        }

        let mut own = state.snapshot(id);
        if !styles.has(Property::Height) && !tree.children(id).is_empty() {
            own.height = ((flow_bottom - own.y) + padding.bottom).max(0.0);
        }
        own.scroll_height = ((scroll_bottom - own.y) + padding.bottom).max(0.0);
        state.insert(id, own);

        // Phase plugins, ascending priority, after the whole subtree.
        for plugin in self.plugins {
            if (plugin.selector)(styles) {
                let ctx = PluginCtx {
                    tree,
                    styles: styles_map,
                    viewport: self.viewport,
                };
                (plugin.handler)(&ctx, id, state);
            }
        }
    }

    /// Nearest ancestor that establishes a positioning context, else the
    /// root.
    fn positioned_ancestor(&self, id: ElementId, state: &StateTable) -> RenderState {
        for ancestor in self.tree.ancestors(id) {
            let positioned = matches!(
                self.styles
                    .get(&ancestor)
                    .and_then(|s| s.prop(Property::Position)),
                Some("relative" | "absolute" | "fixed")
            );
            if positioned {
                return state.snapshot(ancestor);
            }
        }
        state.snapshot(self.tree.root())
    }

    /// Nearest preceding sibling that participates in flow.
    fn previous_flow_sibling(&self, id: ElementId) -> Option<ElementId> {
        let mut current = self.tree.prev_sibling(id);
        while let Some(sibling) = current {
            let absolute = matches!(
                self.styles
                    .get(&sibling)
                    .and_then(|s| s.prop(Property::Position)),
                Some("absolute" | "fixed")
            );
            let none = self
                .styles
                .get(&sibling)
                .and_then(|s| s.prop(Property::Display))
                == Some("none");
            if !absolute && !none {
                return Some(sibling);
            }
            current = self.tree.prev_sibling(sibling);
        }
        None
    }

    /// Draw the border frame at the element's final size and register it
    /// under an identity-derived key. Runs as a dedicated pass once the
    /// whole tree is phased. A failing rasterizer degrades to a blank
    /// bitmap.
    fn rasterize_border(&mut self, id: ElementId, state: &mut StateTable) {
        let own = state.snapshot(id);
        if !own.border.is_visible() {
            return;
        }
        let spec = BorderSpec {
            width: own.width.max(1.0),
            height: own.height.max(1.0),
            border: own.border.clone(),
        };
        let bitmap = match self.borders.draw(&spec) {
            Ok(bitmap) => bitmap,
            Err(err) => {
                warn_once("border", &err.to_string());
                Bitmap::blank(spec.width.ceil() as u32, spec.height.ceil() as u32)
            }
        };
        let key = format!("border-{}", id.0);
        self.shelf.set(&key, bitmap);
        let mut own = own;
        own.textures.push(key);
        state.insert(id, own);
    }
}

/// Resolve a margin/padding group: shorthand first (1, 2, 3, or 4 values),
/// then per-side longhands on top.
fn edge_sizes(
    styles: &Effective,
    shorthand: Property,
    prefix: &str,
    em: f32,
    base: f32,
) -> EdgeSizes {
    let mut edges = EdgeSizes::default();
    if let Some(value) = styles.prop(shorthand) {
        let parts: Vec<f32> = value
            .split_whitespace()
            .map(|v| units::resolve_or(v, em, base, 0.0))
            .collect();
        match parts.as_slice() {
            [all] => {
                edges = EdgeSizes {
                    top: *all,
                    right: *all,
                    bottom: *all,
                    left: *all,
                };
            }
            [vertical, horizontal] => {
                edges = EdgeSizes {
                    top: *vertical,
                    right: *horizontal,
                    bottom: *vertical,
                    left: *horizontal,
                };
            }
            [top, horizontal, bottom] => {
                edges = EdgeSizes {
                    top: *top,
                    right: *horizontal,
                    bottom: *bottom,
                    left: *horizontal,
                };
            }
            [top, right, bottom, left] => {
                edges = EdgeSizes {
                    top: *top,
                    right: *right,
                    bottom: *bottom,
                    left: *left,
                };
            }
            _ => {}
        }
    }
    for (side, slot) in [
        ("top", &mut edges.top),
        ("right", &mut edges.right),
        ("bottom", &mut edges.bottom),
        ("left", &mut edges.left),
    ] {
        if let Some(v) = styles
            .get(&format!("{prefix}-{side}"))
            .and_then(|v| units::resolve(v, em, base))
        {
            *slot = v;
        }
    }
    edges
}

/// Resolve the `border` shorthand (`<width> <style> <color>`) plus
/// `border-radius` into uniform per-side state.
fn resolve_border(styles: &Effective, em: f32, base: f32) -> Border {
    let mut border = Border::default();
    if let Some(shorthand) = styles.prop(Property::Border) {
        let parts: Vec<&str> = shorthand.split_whitespace().collect();
        let width = parts
            .first()
            .and_then(|v| units::resolve(v, em, base))
            .unwrap_or(0.0);
        let style = parts.get(1).copied().unwrap_or("solid").to_string();
        let stroke = parts
            .get(2)
            .and_then(|v| color::parse(v))
            .unwrap_or(marten_common::Rgba::BLACK);
        for side in [
            &mut border.top,
            &mut border.right,
            &mut border.bottom,
            &mut border.left,
        ] {
            side.width = width;
            side.style.clone_from(&style);
            side.color = stroke;
        }
    }
    border.radius = styles
        .prop(Property::BorderRadius)
        .and_then(|v| units::resolve(v, em, base))
        .unwrap_or(0.0);
    border
}
