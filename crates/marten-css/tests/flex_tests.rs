//! Flex container placement through the full pass.

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

fn styled(tree: &mut ElementTree, styles: &[(&str, &str)]) -> ElementId {
    let id = tree.new_element("div");
    for (name, value) in styles {
        tree.element_mut(id)
            .style
            .insert((*name).to_string(), (*value).to_string());
    }
    id
}

fn container(tree: &mut ElementTree, styles: &[(&str, &str)]) -> ElementId {
    let id = styled(tree, styles);
    tree.element_mut(id)
        .style
        .insert("display".into(), "flex".into());
    let root = tree.root();
    tree.append_child(root, id);
    id
}

fn item(tree: &mut ElementTree, parent: ElementId, styles: &[(&str, &str)]) -> ElementId {
    let id = styled(tree, styles);
    tree.element_mut(id)
        .style
        .insert("display".into(), "block".into());
    tree.append_child(parent, id);
    id
}

#[test]
fn test_row_places_items_side_by_side() {
    let mut tree = ElementTree::new();
    let flex = container(&mut tree, &[("width", "300px")]);
    let a = item(&mut tree, flex, &[("width", "120px"), ("height", "40px")]);
    let b = item(&mut tree, flex, &[("width", "120px"), ("height", "40px")]);

    let mut state = StateTable::new();
    engine().layout(&mut tree, &mut state);
    assert_eq!(state.snapshot(a).x, 0.0);
    assert_eq!(state.snapshot(b).x, 120.0);
    assert_eq!(state.snapshot(a).y, state.snapshot(b).y);
    // Auto container height hugs the row.
    assert_eq!(state.snapshot(flex).height, 40.0);
}

#[test]
fn test_rows_wrap_by_default_when_overflowing() {
    let mut tree = ElementTree::new();
    let flex = container(&mut tree, &[("width", "300px")]);
    let mut items = Vec::new();
    for _ in 0..3 {
        items.push(item(
            &mut tree,
            flex,
            &[("width", "120px"), ("height", "40px")],
        ));
    }

    let mut state = StateTable::new();
    engine().layout(&mut tree, &mut state);
    assert_eq!(state.snapshot(items[0]).y, 0.0);
    assert_eq!(state.snapshot(items[1]).x, 120.0);
    // 3 x 120 cannot fit in 300: the third item starts the second row.
    let third = state.snapshot(items[2]);
    assert_eq!(third.x, 0.0);
    assert_eq!(third.y, 40.0);
    assert_eq!(state.snapshot(flex).height, 80.0);
}

#[test]
fn test_nowrap_keeps_a_single_overflowing_row() {
    let mut tree = ElementTree::new();
    let flex = container(&mut tree, &[("width", "300px"), ("flex-wrap", "nowrap")]);
    let mut items = Vec::new();
    for _ in 0..3 {
        items.push(item(
            &mut tree,
            flex,
            &[("width", "120px"), ("height", "40px")],
        ));
    }

    let mut state = StateTable::new();
    engine().layout(&mut tree, &mut state);
    let third = state.snapshot(items[2]);
    assert_eq!(third.x, 240.0);
    assert_eq!(third.y, 0.0);
    assert_eq!(state.snapshot(flex).height, 40.0);
}

#[test]
fn test_justify_content_center_and_space_between() {
    let mut tree = ElementTree::new();
    let centered = container(
        &mut tree,
        &[
            ("width", "300px"),
            ("height", "50px"),
            ("justify-content", "center"),
        ],
    );
    let a = item(&mut tree, centered, &[("width", "50px"), ("height", "20px")]);
    let b = item(&mut tree, centered, &[("width", "50px"), ("height", "20px")]);

    let spaced = container(
        &mut tree,
        &[
            ("width", "300px"),
            ("height", "50px"),
            ("justify-content", "space-between"),
        ],
    );
    let c = item(&mut tree, spaced, &[("width", "50px"), ("height", "20px")]);
    let d = item(&mut tree, spaced, &[("width", "50px"), ("height", "20px")]);

    let mut state = StateTable::new();
    engine().layout(&mut tree, &mut state);
    assert_eq!(state.snapshot(a).x, 100.0);
    assert_eq!(state.snapshot(b).x, 150.0);
    assert_eq!(state.snapshot(c).x, 0.0);
    assert_eq!(state.snapshot(d).x, 250.0);
}

#[test]
fn test_row_reverse_defaults_to_flex_end() {
    let mut tree = ElementTree::new();
    let flex = container(
        &mut tree,
        &[("width", "300px"), ("flex-direction", "row-reverse")],
    );
    let a = item(&mut tree, flex, &[("width", "50px"), ("height", "20px")]);
    let b = item(&mut tree, flex, &[("width", "100px"), ("height", "20px")]);

    let mut state = StateTable::new();
    engine().layout(&mut tree, &mut state);
    // b leads the reversed run at the right edge, a sits rightmost.
    assert_eq!(state.snapshot(b).x, 150.0);
    assert_eq!(state.snapshot(a).x, 250.0);
}

#[test]
fn test_align_items_center_and_stretch() {
    let mut tree = ElementTree::new();
    let centered = container(
        &mut tree,
        &[("width", "300px"), ("align-items", "center")],
    );
    let small = item(&mut tree, centered, &[("width", "50px"), ("height", "20px")]);
    let tall = item(&mut tree, centered, &[("width", "50px"), ("height", "40px")]);

    let stretched = container(
        &mut tree,
        &[("width", "300px"), ("align-items", "stretch")],
    );
    let fixed = item(&mut tree, stretched, &[("width", "50px"), ("height", "60px")]);
    let auto = item(&mut tree, stretched, &[("width", "50px")]);

    let mut state = StateTable::new();
    engine().layout(&mut tree, &mut state);
    assert_eq!(state.snapshot(small).y, 10.0);
    assert_eq!(state.snapshot(tall).y, 0.0);
    assert_eq!(state.snapshot(fixed).height, 60.0);
    assert_eq!(state.snapshot(auto).height, 60.0);
}

#[test]
fn test_column_stacks_vertically() {
    let mut tree = ElementTree::new();
    let flex = container(
        &mut tree,
        &[("width", "300px"), ("flex-direction", "column")],
    );
    let mut items = Vec::new();
    for _ in 0..3 {
        items.push(item(
            &mut tree,
            flex,
            &[("width", "100px"), ("height", "30px")],
        ));
    }

    let mut state = StateTable::new();
    engine().layout(&mut tree, &mut state);
    assert_eq!(state.snapshot(items[0]).y, 0.0);
    assert_eq!(state.snapshot(items[1]).y, 30.0);
    assert_eq!(state.snapshot(items[2]).y, 60.0);
    assert_eq!(state.snapshot(flex).height, 90.0);
}

#[test]
fn test_column_wrap_spreads_columns() {
    let mut tree = ElementTree::new();
    let flex = container(
        &mut tree,
        &[
            ("width", "300px"),
            ("height", "100px"),
            ("flex-direction", "column"),
            ("flex-wrap", "wrap"),
        ],
    );
    let mut items = Vec::new();
    for _ in 0..3 {
        items.push(item(
            &mut tree,
            flex,
            &[("width", "50px"), ("height", "60px")],
        ));
    }

    let mut state = StateTable::new();
    engine().layout(&mut tree, &mut state);
    // One 60px item per 100px column; leftover width spreads between
    // columns.
    assert_eq!(state.snapshot(items[0]).x, 0.0);
    assert_eq!(state.snapshot(items[1]).x, 100.0);
    assert_eq!(state.snapshot(items[2]).x, 200.0);
    for &it in &items {
        assert_eq!(state.snapshot(it).y, 0.0);
    }
}

#[test]
fn test_align_content_distributes_wrapped_rows() {
    let mut tree = ElementTree::new();
    let flex = container(
        &mut tree,
        &[
            ("width", "300px"),
            ("height", "200px"),
            ("flex-wrap", "wrap"),
            ("align-content", "space-between"),
        ],
    );
    let mut items = Vec::new();
    for _ in 0..3 {
        items.push(item(
            &mut tree,
            flex,
            &[("width", "150px"), ("height", "50px")],
        ));
    }

    let mut state = StateTable::new();
    engine().layout(&mut tree, &mut state);
    assert_eq!(state.snapshot(items[0]).y, 0.0);
    assert_eq!(state.snapshot(items[1]).y, 0.0);
    // The second row pushes to the bottom of the 200px container.
    assert_eq!(state.snapshot(items[2]).y, 150.0);
}

#[test]
fn test_align_content_stretch_grows_bands() {
    let mut tree = ElementTree::new();
    let flex = container(
        &mut tree,
        &[
            ("width", "300px"),
            ("height", "200px"),
            ("align-content", "stretch"),
        ],
    );
    let a = item(&mut tree, flex, &[("width", "150px"), ("height", "50px")]);
    let b = item(&mut tree, flex, &[("width", "150px"), ("height", "50px")]);
    let c = item(&mut tree, flex, &[("width", "150px")]);

    let mut state = StateTable::new();
    engine().layout(&mut tree, &mut state);
    // Two bands of 50 and 0; 150 leftover grows each by 75.
    assert_eq!(state.snapshot(a).y, 0.0);
    assert_eq!(state.snapshot(a).height, 50.0);
    assert_eq!(state.snapshot(b).y, 0.0);
    let third = state.snapshot(c);
    assert_eq!(third.y, 125.0);
    // The auto-height item fills its stretched band.
    assert_eq!(third.height, 75.0);
}

#[test]
fn test_border_bitmap_matches_the_stretched_box() {
    let mut tree = ElementTree::new();
    let flex = container(
        &mut tree,
        &[("width", "300px"), ("align-items", "stretch")],
    );
    let _tall = item(&mut tree, flex, &[("width", "50px"), ("height", "60px")]);
    let framed = item(
        &mut tree,
        flex,
        &[("width", "50px"), ("border", "1px solid red")],
    );

    let mut engine = engine();
    let mut state = StateTable::new();
    engine.layout(&mut tree, &mut state);
    // Stretch grows the framed item after its own compute step.
    assert_eq!(state.snapshot(framed).height, 60.0);
    let bitmap = engine
        .shelf()
        .get(&format!("border-{}", framed.0))
        .expect("border bitmap");
    assert_eq!(bitmap.width(), 50);
    assert_eq!(bitmap.height(), 60);
}

#[test]
fn test_absolute_children_do_not_participate() {
    let mut tree = ElementTree::new();
    let flex = container(&mut tree, &[("width", "300px")]);
    let floating = item(
        &mut tree,
        flex,
        &[
            ("position", "absolute"),
            ("left", "5px"),
            ("width", "10px"),
            ("height", "10px"),
        ],
    );
    let a = item(&mut tree, flex, &[("width", "50px"), ("height", "20px")]);
    let b = item(&mut tree, flex, &[("width", "50px"), ("height", "20px")]);

    let mut state = StateTable::new();
    engine().layout(&mut tree, &mut state);
    assert_eq!(state.snapshot(a).x, 0.0);
    assert_eq!(state.snapshot(b).x, 50.0);
    assert_eq!(state.snapshot(floating).x, 5.0);
}
