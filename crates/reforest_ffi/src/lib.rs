//! Flutter bridge adapter over `reforest_core`.
//!
//! Every exported function lives in [`api`] and is a sync, panic-free call.

pub mod api;
