//! # crick_client - Backend Sync for the Live Scoring Core
//!
//! Coordinates the optimistic-update protocol between the in-memory
//! [`crick_core::ScoreState`] and the authoritative scoring backend: apply
//! locally for zero-latency feedback, send exactly one command, then let the
//! server's snapshot overwrite the local copy. The server wins every
//! conflict.

pub mod backend;
pub mod error;
pub mod sync;
pub mod undo;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{HttpBackend, HttpBackendConfig, ScoringBackend};
pub use error::SyncError;
pub use sync::SyncCoordinator;
pub use undo::UndoCoordinator;
