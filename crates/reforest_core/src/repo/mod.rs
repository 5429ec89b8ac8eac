//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value persistence contract the journal service uses.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Values cross the boundary as opaque bytes; JSON encoding happens in the
//!   typed helpers only.

pub mod kv_store;
