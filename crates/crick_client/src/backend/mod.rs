//! The scoring backend seam.
//!
//! `ScoringBackend` is the async boundary the coordinators talk through;
//! every mutating call returns the full updated match snapshot, which the
//! caller treats as an unconditional overwrite of local state.

pub mod http;

use async_trait::async_trait;

use crick_core::{
    CompleteMatchRequest, LiveStateUpdate, MatchSnapshot, RecordBallRequest,
    StartSecondInningsRequest,
};

use crate::error::SyncError;

#[async_trait]
pub trait ScoringBackend: Send + Sync {
    /// Records one delivery at the given pre-increment position.
    async fn record_ball(
        &self,
        match_id: &str,
        request: &RecordBallRequest,
    ) -> Result<MatchSnapshot, SyncError>;

    /// Reverses the most recent delivery on the server's ledger.
    async fn undo_last_ball(&self, match_id: &str) -> Result<MatchSnapshot, SyncError>;

    async fn start_second_innings(
        &self,
        match_id: &str,
        request: &StartSecondInningsRequest,
    ) -> Result<MatchSnapshot, SyncError>;

    /// Finalizes the match and locks it against further mutation.
    async fn complete_match(
        &self,
        match_id: &str,
        request: &CompleteMatchRequest,
    ) -> Result<MatchSnapshot, SyncError>;

    /// Manual correction path; bypasses the delivery processor entirely.
    async fn update_live_state(
        &self,
        match_id: &str,
        update: &LiveStateUpdate,
    ) -> Result<MatchSnapshot, SyncError>;

    async fn fetch_match(&self, match_id: &str) -> Result<MatchSnapshot, SyncError>;
}

pub use http::{HttpBackend, HttpBackendConfig};
