//! Undo coordination.
//!
//! Undo pops the newest local delivery, shows a best-effort rollback so the
//! UI does not stall, and issues a single `undoLastBall` command; the
//! server's resulting state then replaces the local guess entirely. A
//! minimum inter-call delay stops a rapid double-tap from undoing two balls.

use std::time::{Duration, Instant};

use crate::error::SyncError;
use crate::sync::SyncCoordinator;

/// Minimum delay between undo invocations.
const DEFAULT_GUARD_INTERVAL: Duration = Duration::from_millis(800);

pub struct UndoCoordinator {
    last_undo_at: Option<Instant>,
    min_interval: Duration,
}

impl Default for UndoCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoCoordinator {
    pub fn new() -> Self {
        Self { last_undo_at: None, min_interval: DEFAULT_GUARD_INTERVAL }
    }

    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    /// Reverses the most recent delivery, locally and on the backend.
    pub async fn undo(&mut self, sync: &mut SyncCoordinator) -> Result<(), SyncError> {
        if let Some(at) = self.last_undo_at {
            if at.elapsed() < self.min_interval {
                return Err(SyncError::UndoGuard);
            }
        }
        // Stamped before the round-trip so a double-tap during the request
        // is also swallowed.
        self.last_undo_at = Some(Instant::now());
        sync.undo_last_ball().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBackend;
    use crick_core::{BallType, DeliveryDraft, ScoringError, SyncStatus, TeamScore};
    use std::sync::Arc;

    fn draft(runs: u32) -> DeliveryDraft {
        DeliveryDraft { ball_type: BallType::Normal, runs, is_wicket: false }
    }

    #[tokio::test]
    async fn test_undo_round_trip_restores_server_state() {
        let backend = Arc::new(MockBackend::new());
        let state = MockBackend::live_state_fixture();
        let mut sync = SyncCoordinator::new(backend.clone(), state)
            .with_cooldown(Duration::ZERO);
        let mut undo = UndoCoordinator::new().with_min_interval(Duration::ZERO);

        // Record a four; server confirms 4/0 after one ball.
        backend.set_score(
            TeamScore { runs: 4, wickets: 0, overs: 0, balls: 1 },
            TeamScore::default(),
        );
        sync.record_delivery(draft(4)).await.unwrap();
        assert_eq!(sync.state().match_info.home_score.runs, 4);

        // Undo; server's resulting state is the pre-delivery one.
        backend.set_score(TeamScore::default(), TeamScore::default());
        undo.undo(&mut sync).await.unwrap();

        assert_eq!(backend.calls(), vec!["record_ball", "undo_last_ball"]);
        assert_eq!(sync.state().match_info.home_score, TeamScore::default());
        assert_eq!(sync.state().history.len(), 0);
        assert_eq!(sync.state().sync, SyncStatus::Idle);
    }

    #[tokio::test]
    async fn test_double_tap_is_guarded() {
        let backend = Arc::new(MockBackend::new());
        let state = MockBackend::live_state_fixture();
        let mut sync = SyncCoordinator::new(backend.clone(), state)
            .with_cooldown(Duration::ZERO);
        let mut undo = UndoCoordinator::new().with_min_interval(Duration::from_secs(60));

        sync.record_delivery(draft(1)).await.unwrap();
        sync.record_delivery(draft(2)).await.unwrap();

        undo.undo(&mut sync).await.unwrap();
        let err = undo.undo(&mut sync).await.unwrap_err();
        assert!(matches!(err, SyncError::UndoGuard));

        // Only one ball was undone.
        assert_eq!(sync.state().history.len(), 1);
        assert_eq!(
            backend.calls(),
            vec!["record_ball", "record_ball", "undo_last_ball"]
        );
    }

    #[tokio::test]
    async fn test_undo_with_nothing_recorded() {
        let backend = Arc::new(MockBackend::new());
        let state = MockBackend::live_state_fixture();
        let mut sync = SyncCoordinator::new(backend.clone(), state);
        let mut undo = UndoCoordinator::new();

        let err = undo.undo(&mut sync).await.unwrap_err();
        assert!(matches!(
            err,
            SyncError::Scoring(ScoringError::NothingToUndo)
        ));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_undo_flags_state() {
        let backend = Arc::new(MockBackend::new());
        let state = MockBackend::live_state_fixture();
        let mut sync = SyncCoordinator::new(backend.clone(), state)
            .with_cooldown(Duration::ZERO);
        let mut undo = UndoCoordinator::new().with_min_interval(Duration::ZERO);

        sync.record_delivery(draft(1)).await.unwrap();
        backend.fail_next("connection reset");
        let err = undo.undo(&mut sync).await.unwrap_err();
        assert!(err.is_transport());
        assert!(matches!(sync.state().sync, SyncStatus::Error { .. }));
    }
}
