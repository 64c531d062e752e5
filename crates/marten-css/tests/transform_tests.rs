//! Transformer pipeline behavior, including the idempotence guarantee.

use marten_css::backend::ApproximateFont;
use marten_css::rules::RuleTable;
use marten_css::transform::{self, TransformCtx};
use marten_css::Viewport;
use marten_dom::{Element, ElementId, ElementTree};

fn run(tree: &mut ElementTree, rules: &RuleTable) {
    let mut fonts = ApproximateFont;
    let mut ctx = TransformCtx {
        rules,
        viewport: Viewport {
            width: 800.0,
            height: 600.0,
        },
        fonts: &mut fonts,
    };
    transform::run_pipeline(&transform::canonical(), &mut ctx, tree);
}

fn style<'a>(tree: &'a ElementTree, id: ElementId, name: &str) -> Option<&'a str> {
    tree.element(id).style.get(name).map(String::as_str)
}

#[test]
fn test_background_shorthand_expands_with_initial_values() {
    let mut tree = ElementTree::new();
    let div = tree.new_element("div");
    tree.element_mut(div)
        .style
        .insert("background".into(), "url(bg.png) no-repeat red".into());
    tree.append_child(tree.root(), div);

    run(&mut tree, &RuleTable::new());
    assert_eq!(style(&tree, div, "background-image"), Some("url(bg.png)"));
    assert_eq!(style(&tree, div, "background-repeat"), Some("no-repeat"));
    assert_eq!(style(&tree, div, "background-color"), Some("red"));
    assert_eq!(style(&tree, div, "background-position"), Some("0% 0%"));
    assert_eq!(style(&tree, div, "background-clip"), Some("border-box"));
}

#[test]
fn test_flex_shorthand_expands_to_longhands() {
    let mut tree = ElementTree::new();
    let item = tree.new_element("div");
    tree.element_mut(item).style.insert("flex".into(), "2".into());
    tree.append_child(tree.root(), item);

    run(&mut tree, &RuleTable::new());
    assert_eq!(style(&tree, item, "flex-grow"), Some("2"));
    assert_eq!(style(&tree, item, "flex-shrink"), Some("1"));
    assert_eq!(style(&tree, item, "flex-basis"), Some("0%"));
}

#[test]
fn test_margin_block_maps_by_writing_mode() {
    let mut tree = ElementTree::new();
    let horizontal = tree.new_element("div");
    tree.element_mut(horizontal)
        .style
        .insert("margin-block".into(), "10px 20px".into());
    tree.append_child(tree.root(), horizontal);

    let vertical = tree.new_element("div");
    tree.element_mut(vertical)
        .style
        .insert("margin-block".into(), "10px".into());
    tree.element_mut(vertical)
        .style
        .insert("writing-mode".into(), "vertical-rl".into());
    tree.append_child(tree.root(), vertical);

    run(&mut tree, &RuleTable::new());
    assert_eq!(style(&tree, horizontal, "margin-top"), Some("10px"));
    assert_eq!(style(&tree, horizontal, "margin-bottom"), Some("20px"));
    assert_eq!(style(&tree, vertical, "margin-right"), Some("10px"));
    assert_eq!(style(&tree, vertical, "margin-left"), Some("10px"));
    // The logical shorthand is consumed.
    assert_eq!(style(&tree, horizontal, "margin-block"), Some(""));
}

#[test]
fn test_text_splits_into_word_fragments_in_order() {
    let mut tree = ElementTree::new();
    let para = tree.new_element("p");
    tree.element_mut(para).text = "one two three".into();
    tree.append_child(tree.root(), para);

    run(&mut tree, &RuleTable::new());
    assert!(tree.element(para).text.is_empty());
    let children = tree.children(para).to_vec();
    assert_eq!(children.len(), 3);
    let words: Vec<&str> = children
        .iter()
        .map(|&c| tree.element(c).text.as_str())
        .collect();
    assert_eq!(words, ["one", "two", "three"]);
    for &child in &children {
        assert_eq!(tree.element(child).tag_name, "marten-text");
        assert_eq!(style(&tree, child, "display"), Some("inline"));
    }
}

#[test]
fn test_inline_host_keeps_first_word_and_gains_siblings() {
    let mut tree = ElementTree::new();
    let para = tree.new_element("p");
    tree.append_child(tree.root(), para);
    let span = tree.new_element("span");
    tree.element_mut(span)
        .style
        .insert("display".into(), "inline".into());
    tree.element_mut(span).text = "alpha beta gamma".into();
    tree.append_child(para, span);

    run(&mut tree, &RuleTable::new());
    assert_eq!(tree.element(span).text, "alpha");
    let siblings = tree.children(para).to_vec();
    assert_eq!(siblings.len(), 3);
    assert_eq!(siblings[0], span);
    assert_eq!(tree.element(siblings[1]).text, "beta");
    assert_eq!(tree.element(siblings[2]).text, "gamma");
}

#[test]
fn test_pipeline_is_idempotent() {
    let mut tree = ElementTree::new();
    let list = tree.new_element("ul");
    tree.append_child(tree.root(), list);
    for word in ["first", "second"] {
        let mut item = Element::new("div");
        item.text = word.into();
        let item = tree.alloc(item);
        tree.append_child(list, item);
    }
    let scroller = tree.new_element("div");
    tree.element_mut(scroller)
        .style
        .insert("overflow-y".into(), "scroll".into());
    tree.append_child(tree.root(), scroller);

    let rules = RuleTable::new();
    run(&mut tree, &rules);
    let after_first = tree.live_ids().len();
    run(&mut tree, &rules);
    assert_eq!(tree.live_ids().len(), after_first);
}

#[test]
fn test_scrollbar_synthesis_and_padding_reservation() {
    let mut tree = ElementTree::new();
    let scroller = tree.new_element("div");
    tree.element_mut(scroller)
        .style
        .insert("overflow-y".into(), "scroll".into());
    tree.element_mut(scroller)
        .style
        .insert("padding".into(), "5px".into());
    tree.append_child(tree.root(), scroller);

    run(&mut tree, &RuleTable::new());
    let track = tree
        .children(scroller)
        .iter()
        .copied()
        .find(|&c| tree.element(c).tag_name == "marten-scrollbar")
        .expect("track synthesized");
    let thumb = tree.children(track)[0];
    assert_eq!(tree.element(thumb).tag_name, "marten-thumb");
    assert_eq!(style(&tree, track, "width"), Some("14px"));
    assert_eq!(style(&tree, scroller, "position"), Some("relative"));
    assert_eq!(
        style(&tree, scroller, "padding-right"),
        Some("calc(5px + 14px)")
    );
}

#[test]
fn test_scrollbar_width_none_skips_synthesis() {
    let mut tree = ElementTree::new();
    let scroller = tree.new_element("div");
    tree.element_mut(scroller)
        .style
        .insert("overflow".into(), "scroll".into());
    tree.element_mut(scroller)
        .style
        .insert("scrollbar-width".into(), "none".into());
    tree.append_child(tree.root(), scroller);

    run(&mut tree, &RuleTable::new());
    assert!(tree.children(scroller).is_empty());
}

#[test]
fn test_ordered_list_markers_right_align() {
    let mut tree = ElementTree::new();
    let list = tree.new_element("ol");
    tree.append_child(tree.root(), list);
    for _ in 0..10 {
        let mut item = Element::new("div");
        item.text = "entry".into();
        let item = tree.alloc(item);
        tree.append_child(list, item);
    }

    run(&mut tree, &RuleTable::new());
    let rows = tree.children(list).to_vec();
    assert_eq!(rows.len(), 10);
    for &row in &rows {
        assert_eq!(tree.element(row).tag_name, "li");
        assert_eq!(style(&tree, row, "display"), Some("flex"));
    }
    let first_marker = tree.children(rows[0])[0];
    let last_marker = tree.children(rows[9])[0];
    // The word splitter has already moved the ordinal into a fragment.
    let first_text = tree.children(first_marker)[0];
    let last_text = tree.children(last_marker)[0];
    assert_eq!(tree.element(first_text).text, "1.");
    assert_eq!(tree.element(last_text).text, "10.");
    // "1." is one advance narrower than "10." at 16px with the 0.6 ratio.
    let left = style(&tree, first_marker, "margin-left").expect("margin-left");
    let value: f32 = left.trim_end_matches("px").parse().expect("px value");
    assert!((value - 9.6).abs() < 0.01, "got {value}");
    assert_eq!(style(&tree, last_marker, "margin-left"), Some("0px"));
}

#[test]
fn test_unordered_list_markers_are_bullets() {
    let mut tree = ElementTree::new();
    let list = tree.new_element("ul");
    tree.append_child(tree.root(), list);
    let item = tree.new_element("div");
    tree.append_child(list, item);

    run(&mut tree, &RuleTable::new());
    let row = tree.children(list)[0];
    let marker = tree.children(row)[0];
    assert_eq!(tree.element(marker).tag_name, "marten-marker");
    assert_eq!(style(&tree, marker, "width"), Some("5px"));
    assert_eq!(style(&tree, marker, "border-radius"), Some("100px"));
    assert_eq!(tree.children(row)[1], item);
}
