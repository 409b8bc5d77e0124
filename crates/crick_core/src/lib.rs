//! # crick_core - Live Cricket Scoring State Machine
//!
//! This library converts a stream of delivery events (runs, extras, wickets)
//! into an authoritative, internally consistent match state: score, over/ball
//! position, striker/non-striker/bowler assignment and the free-hit flag.
//!
//! ## Features
//! - Pure delivery-classification and strike-rotation rules
//! - One explicit reducer over a closed set of scoring actions
//! - Optimistic-apply / reconcile-with-server transforms for the sync layer
//! - Innings-complete, match-complete and bowler-change detection

pub mod api;
pub mod engine;
pub mod error;
pub mod models;
pub mod rules;
pub mod state;

// Re-export the wire payloads
pub use api::{
    CompleteMatchRequest, DeliveryPayload, LiveStateUpdate, MatchSnapshot, RecordBallRequest,
    ScoreSection, ScoreUpdate, StartSecondInningsRequest,
};

// Re-export the engine entry points
pub use engine::{
    intent_for, CompletionDetector, CompletionSignal, DeliveryInput, DeliveryProcessor,
    ProcessedDelivery, UiIntent, WicketDetails,
};

pub use error::{Result, ScoringError};

// Re-export the data model
pub use models::{
    BallHistory, BallType, BattingStat, BowlingStat, Delivery, DismissalType, LiveState, Match,
    MatchFormat, MatchPhase, MatchStatus, TeamScore, TeamSide,
};

// Re-export the state machine
pub use state::{
    apply_score_update, optimistic_apply, reconcile_with_server, reduce, BackendCommand,
    DeliveryDraft, MatchResultSummary, ScoreState, ScoringAction, SyncStatus, Transition, UiState,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    /// Drives a short opening spell end to end through the public API.
    #[test]
    fn test_opening_over_flow() {
        let mut match_info = Match::new("m1", MatchFormat::T20);
        match_info.status = MatchStatus::Live;
        let mut state =
            ScoreState::new(match_info, LiveState::new(1, TeamSide::Home, "s1", "s2", "b1"));

        // Six legal balls: 1, 0, 4, 2, 0, 1.
        for runs in [1, 0, 4, 2, 0, 1] {
            let transition = reduce(
                &state,
                ScoringAction::RecordDelivery(DeliveryDraft {
                    ball_type: BallType::Normal,
                    runs,
                    is_wicket: false,
                }),
            )
            .unwrap();
            state = transition.state;
        }

        let live = state.live_state().unwrap();
        assert_eq!((live.over, live.ball), (1, 0));
        assert_eq!(state.match_info.home_score.runs, 8);
        assert_eq!(state.match_info.home_score.overs_display(), "1.0");
        assert_eq!(state.history.len(), 6);
        // The opening single put s2 on strike for the rest of the over; the
        // closing single swapped back to s1, then the over-end override
        // flipped the ends once more.
        assert_eq!(live.striker_id, "s2");
    }
}
