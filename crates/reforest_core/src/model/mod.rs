//! Domain model for journal answers and their outline structure.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep wire names compatible with records already persisted by the app.
//!
//! # Invariants
//! - Every outline node is identified by a stable `NodeId`.
//! - An outline node's `indent_level` always equals its depth in the tree.

pub mod journal;
pub mod outline;
