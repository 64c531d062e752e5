//! Headless layout runner.
//!
//! Lays out a built-in demo document at the requested viewport and dumps
//! either the element tree or the computed render state as JSON, for
//! eyeballing engine behavior without a graphical embedder.

use anyhow::Result;
use clap::Parser;
use marten_css::{ApproximateFont, LayoutEngine, SolidRasterizer, StateTable, Viewport};
use marten_dom::{Element, ElementId, ElementTree};
use serde_json::json;

#[derive(Parser)]
#[command(name = "marten", about = "Lay out the demo document and dump the render state")]
struct Args {
    /// Viewport width in pixels.
    #[arg(long, default_value_t = 800.0)]
    width: f32,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 600.0)]
    height: f32,

    /// Print the post-transform element tree instead of the state dump.
    #[arg(long)]
    tree: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut tree = demo_document();

    let mut engine = LayoutEngine::new(
        Viewport {
            width: args.width,
            height: args.height,
        },
        ApproximateFont,
        SolidRasterizer,
    );
    engine.add_sheet(&[
        (
            ".toolbar",
            &[
                ("display", "flex"),
                ("justify-content", "space-between"),
                ("align-items", "center"),
                ("height", "40px"),
                ("padding", "4px"),
                ("background-color", "#eeeeee"),
            ],
        ),
        (
            ".toolbar button",
            &[
                ("display", "block"),
                ("width", "80px"),
                ("height", "24px"),
                ("background-color", "#dddddd"),
                ("border", "1px solid #999999"),
                ("border-radius", "3px"),
            ],
        ),
        (
            ".toolbar button:hover",
            &[("background-color", "#cccccc"), ("cursor", "pointer")],
        ),
        ("p", &[("font-size", "14px"), ("color", "#222222")]),
        (
            ".scroller",
            &[("height", "120px"), ("overflow-y", "scroll")],
        ),
    ]);

    let mut state = StateTable::new();
    engine.layout(&mut tree, &mut state);

    if args.tree {
        print_tree(&tree, tree.root(), 0);
        return Ok(());
    }

    let mut entries: Vec<(usize, serde_json::Value)> = state
        .iter()
        .map(|(id, render)| {
            (
                id.0,
                json!({
                    "id": id.0,
                    "tag": tree.element(id).tag_name,
                    "state": render,
                }),
            )
        })
        .collect();
    entries.sort_by_key(|(id, _)| *id);
    let dump: Vec<serde_json::Value> = entries.into_iter().map(|(_, value)| value).collect();
    println!("{}", serde_json::to_string_pretty(&dump)?);
    Ok(())
}

/// A small document exercising flex, text, lists, and overflow.
fn demo_document() -> ElementTree {
    let mut tree = ElementTree::new();
    let root = tree.root();

    let toolbar = tree.new_element("div");
    tree.element_mut(toolbar).add_class("toolbar");
    tree.append_child(root, toolbar);
    for label in ["Open", "Save", "Close"] {
        let mut button = Element::new("button");
        button.text = label.to_string();
        button.focusable = true;
        let button = tree.alloc(button);
        tree.append_child(toolbar, button);
    }

    let mut intro = Element::new("p");
    intro.text = "A minimal cascade and box layout demonstration".to_string();
    let intro = tree.alloc(intro);
    tree.append_child(root, intro);

    let list = tree.new_element("ol");
    tree.append_child(root, list);
    for entry in ["cascade", "transformers", "plugins"] {
        let mut item = Element::new("div");
        item.text = entry.to_string();
        let item = tree.alloc(item);
        tree.append_child(list, item);
    }

    let scroller = tree.new_element("div");
    tree.element_mut(scroller).add_class("scroller");
    tree.element_mut(scroller).scroll_top = 30.0;
    tree.append_child(root, scroller);
    for index in 0..6 {
        let mut line = Element::new("p");
        line.text = format!("scrollable line {index}");
        let line = tree.alloc(line);
        tree.append_child(scroller, line);
    }

    tree
}

fn print_tree(tree: &ElementTree, id: ElementId, depth: usize) {
    let element = tree.element(id);
    let mut label = element.tag_name.clone();
    for class in &element.classes {
        label.push('.');
        label.push_str(class);
    }
    if !element.text.is_empty() {
        label.push_str(&format!(" {:?}", element.text));
    }
    println!("{}{} #{}", "  ".repeat(depth), label, id.0);
    for &child in tree.children(id) {
        print_tree(tree, child, depth + 1);
    }
}
