use reforest_core::{parse, parse_marked, serialize, serialize_marked, ListStyle, OutlineNode};

fn texts(nodes: &[OutlineNode]) -> Vec<&str> {
    nodes.iter().map(OutlineNode::text).collect()
}

#[test]
fn flat_lines_become_roots() {
    let outline = parse("a\nb\nc");

    assert_eq!(texts(outline.roots()), ["a", "b", "c"]);
    assert!(outline.roots().iter().all(|node| !node.has_children()));
    assert!(outline.roots().iter().all(|node| node.indent_level() == 0));
}

#[test]
fn tabbed_lines_nest_under_previous_line() {
    let outline = parse("a\n\tb\n\tc");

    assert_eq!(outline.roots().len(), 1);
    let a = &outline.roots()[0];
    assert_eq!(texts(a.children()), ["b", "c"]);
    assert!(a.children().iter().all(|node| node.indent_level() == 1));
}

#[test]
fn deep_nesting_returns_to_top_level() {
    let outline = parse("a\n\tb\n\t\tc\nd");

    assert_eq!(texts(outline.roots()), ["a", "d"]);
    let b = &outline.roots()[0].children()[0];
    assert_eq!(b.text(), "b");
    assert_eq!(b.children()[0].text(), "c");
    assert_eq!(b.children()[0].indent_level(), 2);
}

#[test]
fn skipped_indent_attaches_one_level_down() {
    let outline = parse("a\n\t\tb");

    let a = &outline.roots()[0];
    assert_eq!(a.children().len(), 1);
    assert_eq!(a.children()[0].indent_level(), 1);
    assert_eq!(serialize(outline.roots()), "a\n\tb");
}

#[test]
fn empty_lines_are_dropped() {
    let outline = parse("a\n\nb");

    assert_eq!(texts(outline.roots()), ["a", "b"]);
    assert_eq!(parse("").len(), 0);
    assert_eq!(parse("\n\t\n").len(), 0);
}

#[test]
fn structural_parse_keeps_markers_as_text() {
    let outline = parse("• a\n\t1. b");

    assert_eq!(outline.roots()[0].text(), "• a");
    assert_eq!(outline.roots()[0].list_style(), ListStyle::None);
    assert_eq!(serialize(outline.roots()), "• a\n\t1. b");
}

#[test]
fn serialize_round_trips_normalized_text() {
    let text = "plans\n\tread\n\t\tbooks\n\twrite\nreflect";
    let outline = parse(text);

    assert_eq!(serialize(outline.roots()), text);
    assert!(parse(&serialize(outline.roots())).same_shape(&outline));
}

#[test]
fn marked_parse_decodes_styles_and_checks() {
    let outline = parse_marked("• a\n☐ b\n☑ c\n7. d\n1.5 cups");
    let styles: Vec<_> = outline
        .roots()
        .iter()
        .map(|node| (node.text(), node.list_style(), node.is_checked()))
        .collect();

    assert_eq!(
        styles,
        [
            ("a", ListStyle::Bulleted, false),
            ("b", ListStyle::Checkbox, false),
            ("c", ListStyle::Checkbox, true),
            ("d", ListStyle::Numbered, false),
            ("1.5 cups", ListStyle::None, false),
        ]
    );
}

#[test]
fn bare_checked_marker_is_never_checked() {
    let outline = parse_marked("☑");

    let node = &outline.roots()[0];
    assert_eq!(node.text(), "");
    assert_eq!(node.list_style(), ListStyle::Checkbox);
    assert!(!node.is_checked());
}

#[test]
fn marked_serialization_renumbers_per_sibling_list() {
    let outline = parse_marked("5. a\n\t9. x\n\t• y\n\t3. z\nnote\n2. b");

    assert_eq!(
        serialize_marked(outline.roots()),
        "1. a\n\t1. x\n\t• y\n\t2. z\nnote\n2. b"
    );
}

#[test]
fn marked_round_trip_is_stable() {
    let text = "• goals\n\t☑ run\n\t☐ read\n1. first\n2. second";
    let outline = parse_marked(text);

    assert_eq!(serialize_marked(outline.roots()), text);
    assert!(parse_marked(&serialize_marked(outline.roots())).same_shape(&outline));
}

#[test]
fn fresh_parse_mints_new_ids() {
    let first = parse("a\nb");
    let second = parse("a\nb");

    assert_ne!(first.roots()[0].id(), second.roots()[0].id());
    assert_ne!(first.roots()[0].id(), first.roots()[1].id());
}

fn depth_and_text(nodes: &[OutlineNode], rows: &mut Vec<(usize, String)>) {
    for node in nodes {
        rows.push((node.indent_level(), node.text().to_string()));
        depth_and_text(node.children(), rows);
    }
}

fn hand_built_tree() -> Vec<OutlineNode> {
    vec![
        OutlineNode::new("• not a bullet").with_child(
            OutlineNode::new("steps")
                .with_style(ListStyle::Numbered)
                .with_child(OutlineNode::new("1. looks numbered"))
                .with_child(
                    OutlineNode::new("done")
                        .with_style(ListStyle::Checkbox)
                        .checked(true),
                )
                .with_child(OutlineNode::new("☐ open box").with_style(ListStyle::Bulleted)),
        ),
        OutlineNode::new("☑ fake check").with_child(
            OutlineNode::new("\\windows\\path").with_child(
                OutlineNode::new("second")
                    .with_style(ListStyle::Numbered)
                    .with_child(OutlineNode::new("todo").with_style(ListStyle::Checkbox)),
            ),
        ),
        OutlineNode::new("7. seven").with_style(ListStyle::Numbered),
    ]
}

#[test]
fn hand_built_tree_survives_marked_round_trip() {
    let roots = hand_built_tree();

    let text = serialize_marked(&roots);
    let reparsed = parse_marked(&text);

    assert_eq!(reparsed.roots().len(), roots.len());
    for (actual, expected) in reparsed.roots().iter().zip(&roots) {
        assert!(actual.same_shape(expected), "marked text:\n{text}");
    }
    assert_eq!(serialize_marked(reparsed.roots()), text);
}

#[test]
fn hand_built_tree_survives_structural_round_trip() {
    let roots = hand_built_tree();
    let mut expected = Vec::new();
    depth_and_text(&roots, &mut expected);

    let reparsed = parse(&serialize(&roots));
    let mut actual = Vec::new();
    depth_and_text(reparsed.roots(), &mut actual);

    assert_eq!(actual, expected);
    assert!(reparsed
        .iter()
        .all(|node| node.list_style() == ListStyle::None));
}
