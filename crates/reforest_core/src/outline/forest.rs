//! Owned outline forest and its id-addressed edit operations.
//!
//! # Invariants
//! - Lookups visit every node depth-first, never only the top level.
//! - Every structural edit re-levels the moved subtree, so `indent_level`
//!   stays equal to depth without a separate fix-up pass.

use super::parser::nest_by_indent;
use super::{OutlineError, OutlineResult};
use crate::model::outline::{ListStyle, NodeId, OutlineNode};
use serde::{Deserialize, Serialize};

/// Ordered list of top-level outline nodes.
///
/// Encodes as a plain array of nodes. Decoding re-nests flat records by
/// their stored `indentLevel` and re-levels every subtree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<OutlineNode>", into = "Vec<OutlineNode>")]
pub struct Outline {
    roots: Vec<OutlineNode>,
}

impl From<Vec<OutlineNode>> for Outline {
    fn from(value: Vec<OutlineNode>) -> Self {
        let mut outline = nest_by_indent(value);
        outline.visit_mut(OutlineNode::normalize_checked);
        outline
    }
}

impl From<Outline> for Vec<OutlineNode> {
    fn from(value: Outline) -> Self {
        value.roots
    }
}

impl Outline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps already-built roots, forcing each to depth 0.
    pub(crate) fn from_roots(mut roots: Vec<OutlineNode>) -> Self {
        for root in &mut roots {
            root.set_depth(0);
        }
        Self { roots }
    }

    pub fn roots(&self) -> &[OutlineNode] {
        &self.roots
    }

    pub fn into_roots(self) -> Vec<OutlineNode> {
        self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes at every depth.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Depth-first pre-order traversal, i.e. serialized line order.
    pub fn iter(&self) -> Preorder<'_> {
        Preorder {
            stack: vec![self.roots.iter()],
        }
    }

    /// Finds a node anywhere in the outline.
    pub fn find_node(&self, id: NodeId) -> Option<&OutlineNode> {
        self.iter().find(|node| node.id() == id)
    }

    /// Mutable lookup. Node accessors keep the per-node invariants.
    pub fn find_node_mut(&mut self, id: NodeId) -> Option<&mut OutlineNode> {
        let path = locate(&self.roots, id)?;
        Some(self.node_at_mut(&path))
    }

    /// Returns the parent of `id`, or `None` for top-level or unknown nodes.
    pub fn parent_of(&self, id: NodeId) -> Option<&OutlineNode> {
        let path = locate(&self.roots, id)?;
        let (_, parent_path) = path.split_last()?;
        if parent_path.is_empty() {
            return None;
        }
        Some(node_at(&self.roots, parent_path))
    }

    pub fn depth_of(&self, id: NodeId) -> Option<usize> {
        locate(&self.roots, id).map(|path| path.len() - 1)
    }

    /// Appends a node at the end of the top level.
    pub fn append_root(&mut self, mut node: OutlineNode) -> NodeId {
        node.set_depth(0);
        let id = node.id();
        self.roots.push(node);
        id
    }

    /// Appends `node` as the last child of `parent_id`.
    pub fn append_child(&mut self, parent_id: NodeId, node: OutlineNode) -> OutlineResult<NodeId> {
        let id = node.id();
        self.require_mut(parent_id)?.push_child(node);
        Ok(id)
    }

    /// Inserts `node` directly after `sibling_id`, at the sibling's depth.
    pub fn insert_sibling_after(
        &mut self,
        sibling_id: NodeId,
        mut node: OutlineNode,
    ) -> OutlineResult<NodeId> {
        let path = self.require_path(sibling_id)?;
        let (index, parent_path) = split_path(&path);
        node.set_depth(parent_path.len());
        let id = node.id();
        self.siblings_mut(parent_path).insert(index + 1, node);
        Ok(id)
    }

    /// Detaches a node together with all of its descendants.
    pub fn remove_node(&mut self, id: NodeId) -> OutlineResult<OutlineNode> {
        let path = self.require_path(id)?;
        let (index, parent_path) = split_path(&path);
        Ok(self.siblings_mut(parent_path).remove(index))
    }

    /// Moves the node under its preceding sibling, as that sibling's last
    /// child.
    ///
    /// Returns `Ok(false)` when the node is the first of its siblings, since
    /// there is no parent to nest it under.
    pub fn indent(&mut self, id: NodeId) -> OutlineResult<bool> {
        let path = self.require_path(id)?;
        let (index, parent_path) = split_path(&path);
        if index == 0 {
            return Ok(false);
        }

        let siblings = self.siblings_mut(parent_path);
        let node = siblings.remove(index);
        siblings[index - 1].push_child(node);
        Ok(true)
    }

    /// Moves the node out of its parent, directly after the parent.
    ///
    /// Later siblings stay with the old parent. Top-level nodes are left
    /// unchanged (`Ok(false)`); depth never goes below zero.
    pub fn outdent(&mut self, id: NodeId) -> OutlineResult<bool> {
        let path = self.require_path(id)?;
        let (index, parent_path) = split_path(&path);
        let Some((&parent_index, grand_path)) = parent_path.split_last() else {
            return Ok(false);
        };

        let mut node = self.siblings_mut(parent_path).remove(index);
        node.set_depth(grand_path.len());
        self.siblings_mut(grand_path).insert(parent_index + 1, node);
        Ok(true)
    }

    /// Toggles the list style of one node. See [`OutlineNode::toggle_list_style`].
    pub fn toggle_list_style(&mut self, id: NodeId, style: ListStyle) -> OutlineResult<ListStyle> {
        Ok(self.require_mut(id)?.toggle_list_style(style))
    }

    /// Flips the checked state of a checkbox node; no-op otherwise.
    pub fn toggle_checked(&mut self, id: NodeId) -> OutlineResult<bool> {
        Ok(self.require_mut(id)?.toggle_checked())
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> OutlineResult<()> {
        self.require_mut(id)?.set_text(text);
        Ok(())
    }

    /// Applies `f` to every node in pre-order.
    pub fn visit_mut(&mut self, mut f: impl FnMut(&mut OutlineNode)) {
        fn walk(nodes: &mut [OutlineNode], f: &mut impl FnMut(&mut OutlineNode)) {
            for node in nodes {
                f(&mut *node);
                walk(node.children_mut(), f);
            }
        }
        walk(&mut self.roots, &mut f);
    }

    /// Compares two outlines node by node, ignoring ids.
    pub fn same_shape(&self, other: &Outline) -> bool {
        self.roots.len() == other.roots.len()
            && self
                .roots
                .iter()
                .zip(&other.roots)
                .all(|(left, right)| left.same_shape(right))
    }

    fn require_path(&self, id: NodeId) -> OutlineResult<Vec<usize>> {
        locate(&self.roots, id).ok_or(OutlineError::NodeNotFound(id))
    }

    fn require_mut(&mut self, id: NodeId) -> OutlineResult<&mut OutlineNode> {
        let path = self.require_path(id)?;
        Ok(self.node_at_mut(&path))
    }

    fn siblings_mut(&mut self, parent_path: &[usize]) -> &mut Vec<OutlineNode> {
        let mut siblings = &mut self.roots;
        for &index in parent_path {
            siblings = siblings[index].children_mut();
        }
        siblings
    }

    fn node_at_mut(&mut self, path: &[usize]) -> &mut OutlineNode {
        let (index, parent_path) = split_path(path);
        &mut self.siblings_mut(parent_path)[index]
    }
}

impl<'a> IntoIterator for &'a Outline {
    type Item = &'a OutlineNode;
    type IntoIter = Preorder<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Pre-order iterator over an outline.
pub struct Preorder<'a> {
    stack: Vec<std::slice::Iter<'a, OutlineNode>>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a OutlineNode;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                Some(node) => {
                    self.stack.push(node.children().iter());
                    return Some(node);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Index path from the top level down to `id`, searching depth-first.
fn locate(nodes: &[OutlineNode], id: NodeId) -> Option<Vec<usize>> {
    for (index, node) in nodes.iter().enumerate() {
        if node.id() == id {
            return Some(vec![index]);
        }
        if let Some(mut rest) = locate(node.children(), id) {
            rest.insert(0, index);
            return Some(rest);
        }
    }
    None
}

fn node_at<'a>(roots: &'a [OutlineNode], path: &[usize]) -> &'a OutlineNode {
    let (index, parent_path) = split_path(path);
    let mut siblings = roots;
    for &step in parent_path {
        siblings = siblings[step].children();
    }
    &siblings[index]
}

/// Splits a non-empty path into the final index and the parent's path.
fn split_path(path: &[usize]) -> (usize, &[usize]) {
    match path.split_last() {
        Some((&index, parent_path)) => (index, parent_path),
        None => (0, &[]),
    }
}
