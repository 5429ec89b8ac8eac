//! Flattens an outline into display rows for a list view.

use super::markers::{marker_prefix, ordinal_of};
use crate::model::outline::{NodeId, OutlineNode};
use std::collections::HashSet;

/// One visible row of an outline list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineRow {
    pub id: NodeId,
    pub depth: usize,
    /// Marker text including its trailing space, or empty.
    pub marker: String,
    pub text: String,
    /// Whether a fold arrow should be shown.
    pub has_children: bool,
    /// Whether the children are listed below this row.
    pub expanded: bool,
}

/// Produces visible rows in pre-order; children of `collapsed` nodes are
/// left out.
pub fn render_rows(roots: &[OutlineNode], collapsed: &HashSet<NodeId>) -> Vec<OutlineRow> {
    let mut rows = Vec::new();
    push_rows(roots, 0, collapsed, &mut rows);
    rows
}

fn push_rows(
    nodes: &[OutlineNode],
    depth: usize,
    collapsed: &HashSet<NodeId>,
    rows: &mut Vec<OutlineRow>,
) {
    for (index, node) in nodes.iter().enumerate() {
        let expanded = node.has_children() && !collapsed.contains(&node.id());
        rows.push(OutlineRow {
            id: node.id(),
            depth,
            marker: marker_prefix(node.list_style(), node.is_checked(), ordinal_of(nodes, index)),
            text: node.text().to_string(),
            has_children: node.has_children(),
            expanded,
        });
        if expanded {
            push_rows(node.children(), depth + 1, collapsed, rows);
        }
    }
}

/// Plain-text preview: two spaces per depth, a fold glyph for parents.
pub fn render_text(roots: &[OutlineNode]) -> String {
    render_rows(roots, &HashSet::new())
        .iter()
        .map(|row| {
            let fold = if row.has_children { "▾ " } else { "  " };
            format!("{}{fold}{}{}", "  ".repeat(row.depth), row.marker, row.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
