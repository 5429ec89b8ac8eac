use reforest_core::{parse, serialize, ListStyle, NodeId, Outline, OutlineError, OutlineNode};

fn id_of(outline: &Outline, text: &str) -> NodeId {
    outline
        .iter()
        .find(|node| node.text() == text)
        .map(OutlineNode::id)
        .unwrap()
}

fn assert_depths_match(outline: &Outline) {
    for node in outline.iter() {
        assert_eq!(
            Some(node.indent_level()),
            outline.depth_of(node.id()),
            "depth mismatch for `{}`",
            node.text()
        );
    }
}

#[test]
fn toggle_list_style_twice_restores_none() {
    let mut outline = parse("a");
    let a = id_of(&outline, "a");

    assert_eq!(outline.toggle_list_style(a, ListStyle::Bulleted).unwrap(), ListStyle::Bulleted);
    assert_eq!(outline.toggle_list_style(a, ListStyle::Bulleted).unwrap(), ListStyle::None);
    assert_eq!(outline.find_node(a).unwrap().list_style(), ListStyle::None);
}

#[test]
fn switching_away_from_checkbox_clears_checked() {
    let mut outline = parse("a");
    let a = id_of(&outline, "a");

    outline.toggle_list_style(a, ListStyle::Checkbox).unwrap();
    assert!(outline.toggle_checked(a).unwrap());
    assert!(outline.find_node(a).unwrap().is_checked());

    outline.toggle_list_style(a, ListStyle::Numbered).unwrap();
    let node = outline.find_node(a).unwrap();
    assert_eq!(node.list_style(), ListStyle::Numbered);
    assert!(!node.is_checked());
}

#[test]
fn toggle_checked_ignores_non_checkbox_nodes() {
    let mut outline = parse("a");
    let a = id_of(&outline, "a");

    assert!(!outline.toggle_checked(a).unwrap());
    assert!(!outline.find_node(a).unwrap().is_checked());
}

#[test]
fn outdent_at_top_level_is_a_no_op() {
    let mut outline = parse("a\nb");
    let a = id_of(&outline, "a");

    assert!(!outline.outdent(a).unwrap());
    assert_eq!(outline.find_node(a).unwrap().indent_level(), 0);
    assert_eq!(serialize(outline.roots()), "a\nb");
}

#[test]
fn indent_without_previous_sibling_is_a_no_op() {
    let mut outline = parse("a\n\tb");
    let b = id_of(&outline, "b");

    assert!(!outline.indent(b).unwrap());
    assert_eq!(serialize(outline.roots()), "a\n\tb");
}

#[test]
fn indent_moves_subtree_under_previous_sibling() {
    let mut outline = parse("a\n\tx\nb\n\tc\n\t\td");
    let b = id_of(&outline, "b");

    assert!(outline.indent(b).unwrap());

    assert_eq!(serialize(outline.roots()), "a\n\tx\n\tb\n\t\tc\n\t\t\td");
    assert_eq!(outline.parent_of(b).unwrap().text(), "a");
    assert_depths_match(&outline);
}

#[test]
fn outdent_moves_node_after_parent_and_keeps_later_siblings() {
    let mut outline = parse("a\n\tb\n\t\tc\n\td\ne");
    let b = id_of(&outline, "b");

    assert!(outline.outdent(b).unwrap());

    assert_eq!(serialize(outline.roots()), "a\n\td\nb\n\tc\ne");
    assert!(outline.parent_of(b).is_none());
    assert_depths_match(&outline);
}

#[test]
fn remove_node_takes_descendants_along() {
    let mut outline = parse("a\n\tb\n\t\tc\nd");
    let b = id_of(&outline, "b");
    let c = id_of(&outline, "c");

    let removed = outline.remove_node(b).unwrap();

    assert_eq!(removed.descendant_count(), 1);
    assert!(outline.find_node(c).is_none());
    assert_eq!(serialize(outline.roots()), "a\nd");
}

#[test]
fn edits_on_unknown_ids_report_node_not_found() {
    let mut outline = parse("a");
    let missing = NodeId::new();

    assert_eq!(outline.indent(missing), Err(OutlineError::NodeNotFound(missing)));
    assert_eq!(
        outline.remove_node(missing).unwrap_err(),
        OutlineError::NodeNotFound(missing)
    );
    assert!(outline.find_node(missing).is_none());
}

#[test]
fn inserted_nodes_take_their_position_depth() {
    let mut outline = parse("a\n\tb");
    let a = id_of(&outline, "a");
    let b = id_of(&outline, "b");

    let c = outline.append_child(a, OutlineNode::new("c")).unwrap();
    let b2 = outline
        .insert_sibling_after(b, OutlineNode::new("b2").with_child(OutlineNode::new("deep")))
        .unwrap();
    outline.append_root(OutlineNode::new("z"));

    assert_eq!(serialize(outline.roots()), "a\n\tb\n\tb2\n\t\tdeep\n\tc\nz");
    assert_eq!(outline.depth_of(c), Some(1));
    assert_eq!(outline.depth_of(b2), Some(1));
    assert_depths_match(&outline);
}

#[test]
fn clearing_text_unchecks_checkbox() {
    let mut outline = parse("a");
    let a = id_of(&outline, "a");
    outline.toggle_list_style(a, ListStyle::Checkbox).unwrap();
    outline.toggle_checked(a).unwrap();

    outline.set_text(a, "").unwrap();

    assert!(!outline.find_node(a).unwrap().is_checked());
}

#[test]
fn repeated_outdent_stops_at_top_level() {
    let mut outline = parse("a\n\tb\n\t\tc\n\t\t\td");
    let d = id_of(&outline, "d");

    let mut moves = 0;
    while outline.outdent(d).unwrap() {
        moves += 1;
        assert_depths_match(&outline);
    }
    assert_eq!(moves, 3);

    for _ in 0..3 {
        assert!(!outline.outdent(d).unwrap());
    }
    assert_eq!(outline.depth_of(d), Some(0));
    assert_eq!(outline.find_node(d).unwrap().indent_level(), 0);
    assert_eq!(serialize(outline.roots()), "a\n\tb\n\t\tc\nd");
}
