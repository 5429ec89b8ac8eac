//! Outline engine: tab-indented text ⇄ tree of outline nodes.
//!
//! # Responsibility
//! - Parse freeform text into nested nodes and serialize it back.
//! - Provide id-addressed tree edits and line-level editor helpers.
//!
//! # Invariants
//! - Parsing never fails; irregular indentation degrades gracefully.
//! - Every node's `indent_level` equals its depth. Indent and outdent move
//!   nodes in the tree instead of annotating them.
//! - Serialized lines are joined by `\n` with no trailing newline.

use crate::model::outline::NodeId;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod forest;
pub mod line_editor;
pub mod markers;
mod parser;
pub mod render;
mod serializer;

pub use forest::{Outline, Preorder};
pub use parser::{nest_by_indent, parse, parse_marked, reparse_preserving_ids};
pub use serializer::{serialize, serialize_marked, LINE_SEPARATOR};

pub type OutlineResult<T> = Result<T, OutlineError>;

/// Errors from id-addressed outline edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineError {
    /// No node with this id exists anywhere in the outline.
    NodeNotFound(NodeId),
}

impl Display for OutlineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NodeNotFound(id) => write!(f, "outline node not found: {id}"),
        }
    }
}

impl Error for OutlineError {}
