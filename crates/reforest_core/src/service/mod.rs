//! Core use-case services.
//!
//! # Responsibility
//! - Own editable state (one outline, one journal) behind explicit objects.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod journal_service;
pub mod outline_session;
