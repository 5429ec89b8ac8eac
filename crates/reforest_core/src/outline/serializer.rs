//! Outline to tab-indented text.

use super::markers::{marker_prefix, needs_plain_escape, ordinal_of, PLAIN_ESCAPE};
use crate::model::outline::{ListStyle, OutlineNode};

/// Separator between serialized lines. No trailing separator is written.
pub const LINE_SEPARATOR: &str = "\n";

/// Serializes nodes as tab-indented lines without list markers.
pub fn serialize(roots: &[OutlineNode]) -> String {
    render(roots, false)
}

/// Serializes nodes with list markers; numbered siblings are renumbered.
///
/// Plain lines that would otherwise decode differently get a leading `\`,
/// so `parse_marked` restores the same tree.
pub fn serialize_marked(roots: &[OutlineNode]) -> String {
    render(roots, true)
}

fn render(roots: &[OutlineNode], marked: bool) -> String {
    let mut lines = Vec::new();
    write_lines(roots, marked, &mut lines);
    lines.join(LINE_SEPARATOR)
}

fn write_lines(nodes: &[OutlineNode], marked: bool, lines: &mut Vec<String>) {
    for (index, node) in nodes.iter().enumerate() {
        let mut line = "\t".repeat(node.indent_level());
        if marked {
            if node.list_style() == ListStyle::None && needs_plain_escape(node.text()) {
                line.push(PLAIN_ESCAPE);
            }
            line.push_str(&marker_prefix(
                node.list_style(),
                node.is_checked(),
                ordinal_of(nodes, index),
            ));
        }
        line.push_str(node.text());
        lines.push(line);
        write_lines(node.children(), marked, lines);
    }
}

#[cfg(test)]
mod tests {
    use super::{serialize, serialize_marked};
    use crate::model::outline::{ListStyle, OutlineNode};
    use crate::outline::parse_marked;

    #[test]
    fn structural_form_has_tabs_and_no_trailing_newline() {
        let root = OutlineNode::new("a").with_child(OutlineNode::new("b"));
        assert_eq!(serialize(&[root]), "a\n\tb");
        assert_eq!(serialize(&[]), "");
    }

    #[test]
    fn numbering_counts_only_numbered_siblings() {
        let nodes = vec![
            OutlineNode::new("one").with_style(ListStyle::Numbered),
            OutlineNode::new("note"),
            OutlineNode::new("two")
                .with_style(ListStyle::Numbered)
                .with_child(OutlineNode::new("inner").with_style(ListStyle::Numbered)),
        ];
        assert_eq!(
            serialize_marked(&nodes),
            "1. one\nnote\n2. two\n\t1. inner"
        );
    }

    #[test]
    fn plain_lines_that_look_like_markers_are_escaped() {
        let nodes = vec![
            OutlineNode::new("1. not a list"),
            OutlineNode::new("• also plain"),
            OutlineNode::new("fine"),
        ];

        let text = serialize_marked(&nodes);
        assert_eq!(text, "\\1. not a list\n\\• also plain\nfine");
        assert_eq!(serialize(&nodes), "1. not a list\n• also plain\nfine");

        let reparsed = parse_marked(&text);
        assert!(reparsed
            .roots()
            .iter()
            .zip(&nodes)
            .all(|(left, right)| left.same_shape(right)));
    }
}
