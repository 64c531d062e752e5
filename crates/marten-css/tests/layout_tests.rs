//! Full-pass box layout behavior.

use marten_css::backend::{ApproximateFont, SolidRasterizer};
use marten_css::{LayoutEngine, StateTable, Viewport};
use marten_dom::{ElementId, ElementTree};

fn engine() -> LayoutEngine<ApproximateFont, SolidRasterizer> {
    LayoutEngine::new(
        Viewport {
            width: 800.0,
            height: 600.0,
        },
        ApproximateFont,
        SolidRasterizer,
    )
}

fn styled(tree: &mut ElementTree, tag: &str, styles: &[(&str, &str)]) -> ElementId {
    let id = tree.new_element(tag);
    for (name, value) in styles {
        tree.element_mut(id)
            .style
            .insert((*name).to_string(), (*value).to_string());
    }
    id
}

fn approx(actual: f32, expected: f32) -> bool {
    (actual - expected).abs() < 0.01
}

#[test]
fn test_blocks_stack_and_fill_parent_width() {
    let mut tree = ElementTree::new();
    let first = styled(&mut tree, "div", &[("height", "50px")]);
    let second = styled(&mut tree, "div", &[("height", "30px")]);
    tree.append_child(tree.root(), first);
    tree.append_child(tree.root(), second);

    let mut state = StateTable::new();
    engine().layout(&mut tree, &mut state);

    let first_state = state.snapshot(first);
    let second_state = state.snapshot(second);
    assert_eq!(first_state.y, 0.0);
    assert_eq!(first_state.width, 800.0);
    assert_eq!(second_state.y, 50.0);
    assert_eq!(second_state.height, 30.0);
}

#[test]
fn test_sibling_bottom_margin_advances_the_flow() {
    let mut tree = ElementTree::new();
    let first = styled(
        &mut tree,
        "div",
        &[("height", "50px"), ("margin-bottom", "10px")],
    );
    let second = styled(&mut tree, "div", &[("height", "30px")]);
    tree.append_child(tree.root(), first);
    tree.append_child(tree.root(), second);

    let mut state = StateTable::new();
    engine().layout(&mut tree, &mut state);
    assert_eq!(state.snapshot(second).y, 60.0);
}

#[test]
fn test_absolute_right_offsets_from_positioned_ancestor() {
    let mut tree = ElementTree::new();
    let container = styled(
        &mut tree,
        "div",
        &[
            ("position", "relative"),
            ("width", "200px"),
            ("height", "100px"),
        ],
    );
    let child = styled(
        &mut tree,
        "div",
        &[
            ("position", "absolute"),
            ("width", "50px"),
            ("height", "20px"),
            ("right", "10px"),
        ],
    );
    tree.append_child(tree.root(), container);
    tree.append_child(container, child);

    let mut state = StateTable::new();
    engine().layout(&mut tree, &mut state);
    let child_state = state.snapshot(child);
    assert_eq!(child_state.x, 140.0);
    assert_eq!(child_state.y, 0.0);
}

#[test]
fn test_opposing_edges_let_the_later_edge_win() {
    let mut tree = ElementTree::new();
    let container = styled(
        &mut tree,
        "div",
        &[
            ("position", "relative"),
            ("width", "200px"),
            ("height", "100px"),
        ],
    );
    let child = styled(
        &mut tree,
        "div",
        &[
            ("position", "absolute"),
            ("width", "50px"),
            ("left", "10px"),
            ("right", "10px"),
        ],
    );
    tree.append_child(tree.root(), container);
    tree.append_child(container, child);

    let mut state = StateTable::new();
    engine().layout(&mut tree, &mut state);
    assert_eq!(state.snapshot(child).x, 140.0);
}

#[test]
fn test_display_none_skips_the_whole_subtree() {
    let mut tree = ElementTree::new();
    let hidden = styled(&mut tree, "div", &[("display", "none"), ("height", "40px")]);
    let inner = styled(&mut tree, "div", &[("height", "10px")]);
    let after = styled(&mut tree, "div", &[("height", "25px")]);
    tree.append_child(tree.root(), hidden);
    tree.append_child(hidden, inner);
    tree.append_child(tree.root(), after);

    let mut state = StateTable::new();
    engine().layout(&mut tree, &mut state);
    let hidden_state = state.snapshot(hidden);
    assert_eq!(hidden_state.height, 0.0);
    assert!(state.get(inner).is_none());
    // Flow continues as if the hidden box took no space.
    assert_eq!(state.snapshot(after).y, 0.0);
}

#[test]
fn test_auto_height_wraps_children_plus_bottom_padding() {
    let mut tree = ElementTree::new();
    let container = styled(&mut tree, "div", &[("padding", "5px")]);
    let first = styled(&mut tree, "div", &[("height", "40px")]);
    let second = styled(&mut tree, "div", &[("height", "40px")]);
    tree.append_child(tree.root(), container);
    tree.append_child(container, first);
    tree.append_child(container, second);

    let mut state = StateTable::new();
    engine().layout(&mut tree, &mut state);
    assert_eq!(state.snapshot(first).y, 5.0);
    assert_eq!(state.snapshot(second).y, 45.0);
    assert_eq!(state.snapshot(container).height, 90.0);
}

#[test]
fn test_font_size_em_compounds_down_the_tree() {
    let mut tree = ElementTree::new();
    let parent = styled(&mut tree, "div", &[("font-size", "20px")]);
    let child = styled(&mut tree, "div", &[("font-size", "2em")]);
    let grandchild = styled(&mut tree, "div", &[("font-size", "1em")]);
    tree.append_child(tree.root(), parent);
    tree.append_child(parent, child);
    tree.append_child(child, grandchild);

    let mut state = StateTable::new();
    engine().layout(&mut tree, &mut state);
    assert_eq!(state.snapshot(parent).em, 20.0);
    assert_eq!(state.snapshot(child).em, 40.0);
    assert_eq!(state.snapshot(grandchild).em, 40.0);
}

#[test]
fn test_structural_tags_produce_no_box() {
    let mut tree = ElementTree::new();
    let head = styled(&mut tree, "head", &[]);
    let meta = styled(&mut tree, "meta", &[]);
    tree.append_child(tree.root(), head);
    tree.append_child(head, meta);

    let mut state = StateTable::new();
    engine().layout(&mut tree, &mut state);
    let head_state = state.snapshot(head);
    assert_eq!(head_state.width, 0.0);
    assert_eq!(head_state.height, 0.0);
    assert!(state.get(meta).is_none());
}

#[test]
fn test_removed_elements_drop_out_of_the_state_table() {
    let mut tree = ElementTree::new();
    let keep = styled(&mut tree, "div", &[("height", "10px")]);
    let drop = styled(&mut tree, "div", &[("height", "10px")]);
    tree.append_child(tree.root(), keep);
    tree.append_child(tree.root(), drop);

    let mut engine = engine();
    let mut state = StateTable::new();
    engine.layout(&mut tree, &mut state);
    assert!(state.get(drop).is_some());

    tree.remove(drop);
    engine.layout(&mut tree, &mut state);
    assert!(state.get(drop).is_none());
    assert!(state.get(keep).is_some());
}

#[test]
fn test_text_lays_out_as_inline_fragments() {
    let mut tree = ElementTree::new();
    let para = styled(&mut tree, "p", &[]);
    tree.element_mut(para).text = "hello world".into();
    tree.append_child(tree.root(), para);

    let mut engine = engine();
    let mut state = StateTable::new();
    engine.layout(&mut tree, &mut state);

    let fragments = tree.children(para).to_vec();
    assert_eq!(fragments.len(), 2);
    let first = state.snapshot(fragments[0]);
    let second = state.snapshot(fragments[1]);
    // 5 glyphs at 16px with the 0.6 advance ratio.
    assert!(approx(first.width, 48.0), "got {}", first.width);
    assert!(approx(second.x, 48.0), "got {}", second.x);
    assert_eq!(first.y, second.y);
    assert!(approx(first.height, 19.2));
    assert!(approx(state.snapshot(para).height, 19.2));

    // Each fragment rendered into the shelf under its content key.
    let key = &first.textures[0];
    assert!(engine.shelf().get(key).is_some());
}

#[test]
fn test_render_state_serializes_for_the_dump() {
    let mut tree = ElementTree::new();
    let div = styled(
        &mut tree,
        "div",
        &[("height", "50px"), ("background-color", "#ff0000")],
    );
    tree.append_child(tree.root(), div);

    let mut state = StateTable::new();
    engine().layout(&mut tree, &mut state);

    let value = serde_json::to_value(state.get(div).expect("entry")).expect("serializes");
    assert_eq!(value["width"], 800.0);
    assert_eq!(value["height"], 50.0);
    assert_eq!(value["background"]["r"], 255);
    assert!(value.get("textures").is_some());
}

#[test]
fn test_overflow_container_scrolls_crops_and_sizes_the_thumb() {
    let mut tree = ElementTree::new();
    let scroller = styled(
        &mut tree,
        "div",
        &[("height", "100px"), ("overflow-y", "scroll")],
    );
    tree.element_mut(scroller).scroll_top = 120.0;
    tree.append_child(tree.root(), scroller);
    let mut children = Vec::new();
    for _ in 0..3 {
        let child = styled(&mut tree, "div", &[("width", "100px"), ("height", "100px")]);
        tree.append_child(scroller, child);
        children.push(child);
    }

    let mut state = StateTable::new();
    engine().layout(&mut tree, &mut state);

    let scroller_state = state.snapshot(scroller);
    assert_eq!(scroller_state.scroll_height, 300.0);
    // Thumb bottoms out: 120 of 200 scrollable pixels clamps to 80.
    assert_eq!(scroller_state.scroll_offset, 80.0);

    // First child fully above the band, second straddles the top edge,
    // third straddles the bottom edge.
    assert!(state.snapshot(children[0]).hidden);
    let second = state.snapshot(children[1]);
    let crop = second.crop.expect("top straddle crops");
    assert_eq!(crop.y, 20.0);
    assert_eq!(crop.height, 80.0);
    let third = state.snapshot(children[2]);
    let crop = third.crop.expect("bottom straddle crops");
    assert_eq!(crop.y, 0.0);
    assert_eq!(crop.height, 20.0);

    let track = tree
        .children(scroller)
        .iter()
        .copied()
        .find(|&c| tree.element(c).tag_name == "marten-scrollbar")
        .expect("track");
    let thumb = tree.children(track)[0];
    let thumb_state = state.snapshot(thumb);
    assert!(!thumb_state.hidden);
    assert_eq!(thumb_state.height, 20.0);
    assert_eq!(thumb_state.y, 80.0);
}
