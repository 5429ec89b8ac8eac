//! Core domain logic for Reforest.
//! Outline parsing, editing and journal persistence live here; the FFI and
//! CLI crates are thin adapters over this crate.

pub mod db;
pub mod logging;
pub mod model;
pub mod outline;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::journal::{Category, CategoryId, Content, ContentId, Profile};
pub use model::outline::{ListStyle, NodeId, OutlineNode};
pub use outline::{
    parse, parse_marked, reparse_preserving_ids, serialize, serialize_marked, Outline,
    OutlineError, OutlineResult,
};
pub use repo::kv_store::{
    KeyValueStore, KvWrite, MemoryKeyValueStore, SqliteKeyValueStore, StorageKey, StoreError,
    StoreResult,
};
pub use service::journal_service::{JournalError, JournalResult, JournalService};
pub use service::outline_session::OutlineSession;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
