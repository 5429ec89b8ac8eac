//! Editing session over one outline.
//!
//! # Responsibility
//! - Own a single outline and route every mutation through its id-addressed
//!   edit operations.
//! - Bridge the text editor surface: marked text in, marked text out.
//!
//! # Invariants
//! - `replace_text` keeps ids of lines whose text did not change.
//! - The session never exposes a mutable borrow of its outline.

use crate::model::outline::{ListStyle, NodeId, OutlineNode};
use crate::outline::{parse_marked, reparse_preserving_ids, serialize_marked};
use crate::outline::{Outline, OutlineResult};
use log::debug;

/// Stateful owner of one outline being edited.
#[derive(Debug, Clone, Default)]
pub struct OutlineSession {
    outline: Outline,
}

impl OutlineSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session from marked editor text.
    pub fn from_text(text: &str) -> Self {
        Self::from_outline(parse_marked(text))
    }

    pub fn from_outline(outline: Outline) -> Self {
        Self { outline }
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    pub fn into_outline(self) -> Outline {
        self.outline
    }

    /// Marked text as the editor shows it.
    pub fn text(&self) -> String {
        serialize_marked(self.outline.roots())
    }

    /// Replaces the outline with `text`, keeping ids of unchanged lines.
    pub fn replace_text(&mut self, text: &str) {
        let next = reparse_preserving_ids(&self.outline, text);
        debug!(
            "event=session_replace_text module=service status=ok before={} after={}",
            self.outline.len(),
            next.len()
        );
        self.outline = next;
    }

    pub fn find_node(&self, id: NodeId) -> Option<&OutlineNode> {
        self.outline.find_node(id)
    }

    pub fn append_root(&mut self, node: OutlineNode) -> NodeId {
        self.outline.append_root(node)
    }

    pub fn append_child(&mut self, parent_id: NodeId, node: OutlineNode) -> OutlineResult<NodeId> {
        self.outline.append_child(parent_id, node)
    }

    pub fn insert_sibling_after(
        &mut self,
        sibling_id: NodeId,
        node: OutlineNode,
    ) -> OutlineResult<NodeId> {
        self.outline.insert_sibling_after(sibling_id, node)
    }

    /// Removes the node together with its whole subtree.
    pub fn remove_node(&mut self, id: NodeId) -> OutlineResult<OutlineNode> {
        let removed = self.outline.remove_node(id)?;
        debug!(
            "event=session_remove module=service status=ok node_id={} descendants={}",
            id,
            removed.descendant_count()
        );
        Ok(removed)
    }

    /// Moves the node under its previous sibling; `false` when it has none.
    pub fn indent(&mut self, id: NodeId) -> OutlineResult<bool> {
        let moved = self.outline.indent(id)?;
        debug!("event=session_indent module=service status=ok node_id={id} moved={moved}");
        Ok(moved)
    }

    /// Moves the node out next to its parent; `false` at the top level.
    pub fn outdent(&mut self, id: NodeId) -> OutlineResult<bool> {
        let moved = self.outline.outdent(id)?;
        debug!("event=session_outdent module=service status=ok node_id={id} moved={moved}");
        Ok(moved)
    }

    pub fn toggle_list_style(&mut self, id: NodeId, style: ListStyle) -> OutlineResult<ListStyle> {
        self.outline.toggle_list_style(id, style)
    }

    pub fn toggle_checked(&mut self, id: NodeId) -> OutlineResult<bool> {
        self.outline.toggle_checked(id)
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> OutlineResult<()> {
        self.outline.set_text(id, text)
    }
}
