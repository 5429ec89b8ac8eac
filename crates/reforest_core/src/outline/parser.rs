//! Stack-based parser from tab-indented text to an outline.

use super::forest::Outline;
use super::markers::decorate;
use crate::model::outline::{NodeId, OutlineNode};
use std::collections::{HashMap, VecDeque};

/// Parses tab-indented text into an outline, one node per non-empty line.
///
/// Markers such as `• ` are kept verbatim in the text; see [`parse_marked`].
/// Lines that are empty or whitespace-only produce no node. A line indented
/// deeper than its predecessor allows is nested one level under the deepest
/// open node; nothing is rejected.
pub fn parse(text: &str) -> Outline {
    let mut builder = StackBuilder::default();
    for line in text.split('\n') {
        let raw_indent = line.chars().take_while(|c| *c == '\t').count();
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        builder.push(raw_indent, OutlineNode::new(trimmed));
    }
    builder.finish()
}

/// Parses text and then decodes list markers into style and checked state.
pub fn parse_marked(text: &str) -> Outline {
    let mut outline = parse(text);
    decorate(&mut outline);
    outline
}

/// Re-nests nodes using their stored `indent_level` as the raw indent.
///
/// Used to migrate flat records in which depth was only an annotation.
/// Ids, styles and existing children are kept; every subtree is re-leveled.
pub fn nest_by_indent(nodes: Vec<OutlineNode>) -> Outline {
    let mut builder = StackBuilder::default();
    for node in nodes {
        builder.push(node.indent_level(), node);
    }
    builder.finish()
}

/// Parses marked text, reusing ids from `previous` for unchanged lines.
///
/// A new line adopts the id of the first previous node, in line order, that
/// has identical decoded text and has not been claimed yet. Every other line
/// gets a fresh id.
pub fn reparse_preserving_ids(previous: &Outline, text: &str) -> Outline {
    let mut available: HashMap<&str, VecDeque<NodeId>> = HashMap::new();
    for node in previous.iter() {
        available.entry(node.text()).or_default().push_back(node.id());
    }

    let mut outline = parse_marked(text);
    outline.visit_mut(|node| {
        let reused = available
            .get_mut(node.text())
            .and_then(|ids| ids.pop_front());
        if let Some(id) = reused {
            node.adopt_id(id);
        }
    });
    outline
}

/// Working stack of open nodes, keyed by their raw indent.
///
/// A node is attached to its parent when it is popped, which keeps sibling
/// order because later siblings are only pushed after earlier ones pop.
#[derive(Default)]
struct StackBuilder {
    roots: Vec<OutlineNode>,
    stack: Vec<(usize, OutlineNode)>,
}

impl StackBuilder {
    fn push(&mut self, raw_indent: usize, mut node: OutlineNode) {
        while self
            .stack
            .last()
            .is_some_and(|(open_indent, _)| *open_indent >= raw_indent)
        {
            self.close_top();
        }
        node.set_depth(self.stack.len());
        self.stack.push((raw_indent, node));
    }

    fn close_top(&mut self) {
        if let Some((_, node)) = self.stack.pop() {
            match self.stack.last_mut() {
                Some((_, parent)) => parent.children_mut().push(node),
                None => self.roots.push(node),
            }
        }
    }

    fn finish(mut self) -> Outline {
        while !self.stack.is_empty() {
            self.close_top();
        }
        Outline::from_roots(self.roots)
    }
}
