//! Outline node model.
//!
//! # Responsibility
//! - Define the node record shared by the parser, serializer and editors.
//! - Enforce per-node invariants through accessors instead of public fields.
//!
//! # Invariants
//! - `id` is stable and never reused for another node.
//! - `indent_level` equals the node's depth; children sit one level deeper.
//! - `is_checked` is only ever `true` for a non-empty checkbox node.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of one outline node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Mints a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an identifier that already exists externally.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display annotation of one outline line.
///
/// Wire values match the app's stored records (`none`, `checkbox`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListStyle {
    /// Plain line without a marker.
    #[default]
    None,
    /// `☐` / `☑` line with checked state.
    Checkbox,
    /// `1.` style line, renumbered on output.
    Numbered,
    /// `•` line.
    Bulleted,
}

/// One line of an outlined answer, with its nested children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineNode {
    id: NodeId,
    text: String,
    indent_level: usize,
    #[serde(default)]
    list_style: ListStyle,
    #[serde(default)]
    is_checked: bool,
    /// Serialized as `subLines` to match stored records.
    #[serde(default, rename = "subLines", alias = "children")]
    children: Vec<OutlineNode>,
}

impl OutlineNode {
    /// Creates a top-level plain node with a fresh id.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_id(NodeId::new(), text)
    }

    /// Creates a top-level plain node with a caller-provided id.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(id: NodeId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            indent_level: 0,
            list_style: ListStyle::None,
            is_checked: false,
            children: Vec::new(),
        }
    }

    /// Builder form of [`OutlineNode::set_list_style`].
    pub fn with_style(mut self, style: ListStyle) -> Self {
        self.set_list_style(style);
        self
    }

    /// Builder form of [`OutlineNode::set_checked`].
    pub fn checked(mut self, checked: bool) -> Self {
        self.set_checked(checked);
        self
    }

    /// Builder form of [`OutlineNode::push_child`].
    pub fn with_child(mut self, child: OutlineNode) -> Self {
        self.push_child(child);
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    pub fn list_style(&self) -> ListStyle {
        self.list_style
    }

    pub fn is_checked(&self) -> bool {
        self.is_checked
    }

    pub fn children(&self) -> &[OutlineNode] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Number of nodes below this one, at any depth.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }

    /// Appends `child` as the last child; the child's subtree is re-leveled.
    pub fn push_child(&mut self, mut child: OutlineNode) {
        child.set_depth(self.indent_level + 1);
        self.children.push(child);
    }

    /// Replaces the text. Empty text clears the checked state.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        if self.text.is_empty() {
            self.is_checked = false;
        }
    }

    /// Sets the list style unconditionally. Leaving checkbox clears `is_checked`.
    pub fn set_list_style(&mut self, style: ListStyle) {
        if style != ListStyle::Checkbox {
            self.is_checked = false;
        }
        self.list_style = style;
    }

    /// Sets `style` if it differs from the current one, otherwise resets to
    /// `ListStyle::None`. Returns the resulting style.
    pub fn toggle_list_style(&mut self, style: ListStyle) -> ListStyle {
        let next = if self.list_style == style {
            ListStyle::None
        } else {
            style
        };
        self.set_list_style(next);
        next
    }

    /// Sets the checked state when it is meaningful.
    ///
    /// Returns `false` (and leaves the node untouched) when the node is not a
    /// checkbox or its text is empty and `checked` is `true`.
    pub fn set_checked(&mut self, checked: bool) -> bool {
        if checked && (self.list_style != ListStyle::Checkbox || self.text.is_empty()) {
            return false;
        }
        self.is_checked = checked;
        true
    }

    /// Flips the checked state of a checkbox node.
    ///
    /// Returns whether the node changed; non-checkbox nodes are a no-op.
    pub fn toggle_checked(&mut self) -> bool {
        if self.list_style != ListStyle::Checkbox {
            return false;
        }
        let next = !self.is_checked;
        self.set_checked(next)
    }

    /// Compares text, depth, style, checked state and children recursively,
    /// ignoring ids.
    pub fn same_shape(&self, other: &OutlineNode) -> bool {
        self.text == other.text
            && self.indent_level == other.indent_level
            && self.list_style == other.list_style
            && self.is_checked == other.is_checked
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(left, right)| left.same_shape(right))
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<OutlineNode> {
        &mut self.children
    }

    /// Re-levels this node to `depth` and its descendants below it.
    pub(crate) fn set_depth(&mut self, depth: usize) {
        self.indent_level = depth;
        for child in &mut self.children {
            child.set_depth(depth + 1);
        }
    }

    /// Re-binds identity during an identity-preserving reparse, before the
    /// node is handed to any caller.
    pub(crate) fn adopt_id(&mut self, id: NodeId) {
        self.id = id;
    }

    /// Drops a checked flag that violates the node invariants.
    pub(crate) fn normalize_checked(&mut self) {
        if self.list_style != ListStyle::Checkbox || self.text.is_empty() {
            self.is_checked = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ListStyle, OutlineNode};

    #[test]
    fn push_child_relevels_whole_subtree() {
        let grandchild = OutlineNode::new("c");
        let child = OutlineNode::new("b").with_child(grandchild);
        let root = OutlineNode::new("a").with_child(child);

        assert_eq!(root.indent_level(), 0);
        assert_eq!(root.children()[0].indent_level(), 1);
        assert_eq!(root.children()[0].children()[0].indent_level(), 2);
        assert_eq!(root.descendant_count(), 2);
    }

    #[test]
    fn checked_requires_checkbox_style_and_text() {
        let mut plain = OutlineNode::new("plain");
        assert!(!plain.set_checked(true));
        assert!(!plain.is_checked());

        let mut empty = OutlineNode::new("").with_style(ListStyle::Checkbox);
        assert!(!empty.toggle_checked());
        assert!(!empty.is_checked());

        let mut task = OutlineNode::new("task").with_style(ListStyle::Checkbox);
        assert!(task.toggle_checked());
        assert!(task.is_checked());
    }

    #[test]
    fn clearing_text_clears_checked() {
        let mut task = OutlineNode::new("task")
            .with_style(ListStyle::Checkbox)
            .checked(true);
        assert!(task.is_checked());

        task.set_text("");
        assert!(!task.is_checked());
        assert_eq!(task.list_style(), ListStyle::Checkbox);
    }

    #[test]
    fn serialization_uses_app_wire_fields() {
        let node = OutlineNode::new("root")
            .with_style(ListStyle::Numbered)
            .with_child(OutlineNode::new("leaf"));

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["text"], "root");
        assert_eq!(json["indentLevel"], 0);
        assert_eq!(json["listStyle"], "numbered");
        assert_eq!(json["isChecked"], false);
        assert_eq!(json["subLines"][0]["indentLevel"], 1);
        assert_eq!(json["subLines"][0]["subLines"], serde_json::json!([]));
    }
}
