//! Delivery sync coordination.
//!
//! One coordinator per scored match. The per-delivery protocol:
//!
//! 1. validate locally (precondition failures never reach the network),
//! 2. apply the optimistic update so the UI reflects the change immediately,
//! 3. issue exactly one command carrying the pre-increment position,
//! 4. replace local state wholesale with the server's returned snapshot,
//! 5. on failure, flag the state `error` and keep the optimistic copy;
//!    no automatic rollback, no automatic retry.
//!
//! At most one command is in flight at a time, and a short cool-down after
//! each recorded delivery swallows accidental double-taps.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crick_core::{
    apply_score_update, reconcile_with_server, reduce, BackendCommand, CompleteMatchRequest,
    DeliveryDraft, LiveStateUpdate, MatchSnapshot, ScoreState, ScoreUpdate, ScoringAction,
    ScoringError, WicketDetails,
};

use crate::backend::ScoringBackend;
use crate::error::SyncError;

/// Cool-down applied after each recorded delivery.
const DEFAULT_COOLDOWN: Duration = Duration::from_millis(500);

pub struct SyncCoordinator {
    backend: Arc<dyn ScoringBackend>,
    state: ScoreState,
    in_flight: bool,
    last_recorded_at: Option<Instant>,
    cooldown: Duration,
}

impl SyncCoordinator {
    pub fn new(backend: Arc<dyn ScoringBackend>, state: ScoreState) -> Self {
        Self {
            backend,
            state,
            in_flight: false,
            last_recorded_at: None,
            cooldown: DEFAULT_COOLDOWN,
        }
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn state(&self) -> &ScoreState {
        &self.state
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    // -------------------------------------------------------------------------
    // Scoring entry points
    // -------------------------------------------------------------------------

    /// Records what the scorer tapped. Extras and wickets stage a dialog and
    /// return without a network call; the matching `confirm_*` finalizes.
    pub async fn record_delivery(&mut self, draft: DeliveryDraft) -> Result<(), SyncError> {
        self.guard_rapid_taps()?;
        self.dispatch(ScoringAction::RecordDelivery(draft)).await
    }

    pub async fn confirm_extras(&mut self, additional_runs: u32) -> Result<(), SyncError> {
        self.guard_rapid_taps()?;
        self.dispatch(ScoringAction::ConfirmExtras { additional_runs }).await
    }

    pub async fn confirm_wicket(&mut self, details: WicketDetails) -> Result<(), SyncError> {
        self.guard_rapid_taps()?;
        self.dispatch(ScoringAction::ConfirmWicket(details)).await
    }

    /// Closes whatever dialog is open, discarding any half-entered delivery.
    pub fn dismiss_dialog(&mut self) -> Result<(), SyncError> {
        let transition = reduce(&self.state, ScoringAction::DismissDialog)?;
        self.state = transition.state;
        Ok(())
    }

    pub async fn start_second_innings(
        &mut self,
        striker_id: String,
        non_striker_id: String,
        bowler_id: String,
    ) -> Result<(), SyncError> {
        self.dispatch(ScoringAction::StartSecondInnings { striker_id, non_striker_id, bowler_id })
            .await
    }

    pub async fn complete_match(&mut self, request: CompleteMatchRequest) -> Result<(), SyncError> {
        self.dispatch(ScoringAction::CompleteMatch(request)).await
    }

    /// Reverses the most recent delivery. Call through [`crate::UndoCoordinator`],
    /// which owns the double-tap guard.
    pub(crate) async fn undo_last_ball(&mut self) -> Result<(), SyncError> {
        self.dispatch(ScoringAction::Undo).await
    }

    // -------------------------------------------------------------------------
    // Out-of-band state sources
    // -------------------------------------------------------------------------

    /// Manual correction path; bypasses the delivery processor and lets the
    /// server snapshot rebuild the local state.
    pub async fn correct_live_state(&mut self, update: LiveStateUpdate) -> Result<(), SyncError> {
        if self.in_flight {
            return Err(SyncError::CommandInFlight);
        }
        if self.state.match_info.is_locked {
            return Err(ScoringError::MatchLocked.into());
        }
        let match_id = self.state.match_info.match_id.clone();
        self.in_flight = true;
        let result = self.backend.update_live_state(&match_id, &update).await;
        self.in_flight = false;
        match result {
            Ok(snapshot) => self.accept_snapshot(snapshot).await,
            Err(err) => {
                self.flag_failure(&err);
                Err(err)
            }
        }
    }

    /// Push-channel merge: an authoritative score broadcast for this match
    /// overwrites the local scores like a sync response would.
    pub fn apply_push_update(&mut self, update: &ScoreUpdate) {
        if update.match_id != self.state.match_info.match_id {
            tracing::debug!(match_id = %update.match_id, "dropping push update for other match");
            return;
        }
        self.state = apply_score_update(&self.state, update);
    }

    /// Full reload from the backend; the recovery path when a response was
    /// partial or the user asks to resync.
    pub async fn reload(&mut self) -> Result<(), SyncError> {
        let match_id = self.state.match_info.match_id.clone();
        let snapshot = self.backend.fetch_match(&match_id).await?;
        self.state = reconcile_with_server(&self.state, &snapshot);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Protocol core
    // -------------------------------------------------------------------------

    async fn dispatch(&mut self, action: ScoringAction) -> Result<(), SyncError> {
        if self.in_flight {
            return Err(SyncError::CommandInFlight);
        }

        let transition = reduce(&self.state, action)?;
        // Optimistic update lands before the network call.
        self.state = transition.state;
        let Some(command) = transition.command else {
            return Ok(());
        };

        if matches!(command, BackendCommand::RecordBall(_)) {
            self.last_recorded_at = Some(Instant::now());
        }

        self.in_flight = true;
        let result = self.execute(&command).await;
        self.in_flight = false;

        match result {
            Ok(snapshot) => self.accept_snapshot(snapshot).await,
            Err(err) => {
                self.flag_failure(&err);
                Err(err)
            }
        }
    }

    async fn execute(&self, command: &BackendCommand) -> Result<MatchSnapshot, SyncError> {
        let match_id = &self.state.match_info.match_id;
        match command {
            BackendCommand::RecordBall(request) => {
                self.backend.record_ball(match_id, request).await
            }
            BackendCommand::UndoLastBall => self.backend.undo_last_ball(match_id).await,
            BackendCommand::StartSecondInnings(request) => {
                self.backend.start_second_innings(match_id, request).await
            }
            BackendCommand::CompleteMatch(request) => {
                self.backend.complete_match(match_id, request).await
            }
        }
    }

    /// Server truth replaces the local copy. A snapshot without the score
    /// payload is not trusted; it triggers a full reload instead.
    async fn accept_snapshot(&mut self, snapshot: MatchSnapshot) -> Result<(), SyncError> {
        if snapshot.score.is_none() {
            tracing::warn!("sync response missing score payload, reloading match");
            return self.reload().await;
        }
        self.state = reconcile_with_server(&self.state, &snapshot);
        Ok(())
    }

    fn flag_failure(&mut self, err: &SyncError) {
        tracing::warn!(error = %err, "scoring command failed, keeping optimistic state");
        if let Ok(transition) =
            reduce(&self.state, ScoringAction::SyncFailed { message: err.to_string() })
        {
            self.state = transition.state;
        }
    }

    fn guard_rapid_taps(&self) -> Result<(), SyncError> {
        if let Some(at) = self.last_recorded_at {
            if at.elapsed() < self.cooldown {
                return Err(SyncError::CoolingDown);
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for SyncCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncCoordinator")
            .field("match_id", &self.state.match_info.match_id)
            .field("in_flight", &self.in_flight)
            .field("sync", &self.state.sync)
            .finish()
    }
}
