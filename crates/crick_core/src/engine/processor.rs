//! Applies one finalized delivery to the live match state.
//!
//! The processor is a pure transform: given the current `Match` + `LiveState`
//! and a delivery description, it returns the advanced copies plus the
//! immutable `Delivery` record to append to history and send to the backend.
//! Every failure here is a local precondition failure that never reaches the
//! network.

use chrono::Utc;
use uuid::Uuid;

use crate::error::{Result, ScoringError};
use crate::models::{BallType, Delivery, DismissalType, LiveState, Match, MatchStatus};
use crate::rules;

// =============================================================================
// Input
// =============================================================================

/// A fully specified delivery, ready to apply.
///
/// `scorer_runs` is the value the scorer entered: runs off the bat for a
/// normal ball, additional runs for an extra. The penalty run for wides and
/// no-balls is added by the rules, not by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryInput {
    pub ball_type: BallType,
    pub scorer_runs: u32,
    pub wicket: Option<WicketDetails>,
}

impl DeliveryInput {
    pub fn runs(ball_type: BallType, scorer_runs: u32) -> Self {
        Self { ball_type, scorer_runs, wicket: None }
    }
}

/// Fields collected by the wicket dialog before the delivery is finalized.
#[derive(Debug, Clone, PartialEq)]
pub struct WicketDetails {
    pub dismissal: DismissalType,
    /// Defaults to the striker when the dialog leaves it unset.
    pub dismissed_batter_id: Option<String>,
    pub fielder_id: Option<String>,
    pub incoming_batter_id: String,
}

/// The follow-up the UI must run before a tapped delivery can be finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiIntent {
    /// Finalize and sync immediately.
    None,
    /// Open the extras dialog for the additional runs.
    CollectExtrasDetails,
    /// Open the wicket dialog for dismissal type, fielder and incoming batter.
    CollectWicketDetails,
}

/// The follow-up required for a tapped delivery, before any state changes.
pub fn intent_for(ball_type: BallType, is_wicket: bool) -> UiIntent {
    if is_wicket {
        UiIntent::CollectWicketDetails
    } else if ball_type.is_extra() {
        UiIntent::CollectExtrasDetails
    } else {
        UiIntent::None
    }
}

// =============================================================================
// Output
// =============================================================================

/// Result of a successful apply.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedDelivery {
    pub match_info: Match,
    pub live: LiveState,
    pub delivery: Delivery,
    pub over_completed: bool,
}

// =============================================================================
// Processor
// =============================================================================

pub struct DeliveryProcessor;

impl DeliveryProcessor {
    /// Applies one delivery: run credit, ball advance, strike rotation,
    /// wicket placement, free-hit lifecycle.
    ///
    /// `live` must carry the pre-delivery position; the caller keeps it
    /// around for the wire command, which reports pre-increment values.
    pub fn apply(
        match_info: &Match,
        live: &LiveState,
        input: &DeliveryInput,
    ) -> Result<ProcessedDelivery> {
        Self::validate(match_info, live, input)?;

        let total_runs = rules::delivery_total_runs(input.ball_type, input.scorer_runs)?;
        let legal = rules::is_legal_delivery(input.ball_type);

        let mut next_match = match_info.clone();
        let mut next_live = live.clone();

        // Run credit goes to the batting team for every ball type.
        let score = next_match.score_mut(live.batting_team);
        score.runs += rules::team_runs_for_delivery(total_runs, input.ball_type);
        if input.wicket.is_some() {
            score.wickets += 1;
        }

        // Only legal deliveries advance the six-ball counter.
        let mut over_completed = false;
        if legal {
            let advance = rules::advance_over(live.over, live.ball);
            over_completed = advance.over_completed;
            next_live.over = advance.over;
            next_live.ball = advance.ball;
            score.overs = advance.over;
            score.balls = advance.ball;
        }

        // Strike assignment. A wicket replaces the parity swap with the
        // incoming-batter placement rule; the end-of-over swap composes on
        // top of either.
        match &input.wicket {
            Some(details) => {
                if rules::should_rotate_strike(total_runs) {
                    // Odd runs: the survivor crossed, incoming batter takes
                    // the non-striker's end.
                    next_live.striker_id = live.non_striker_id.clone();
                    next_live.non_striker_id = details.incoming_batter_id.clone();
                } else {
                    // Even runs: incoming batter takes the striker's end.
                    next_live.striker_id = details.incoming_batter_id.clone();
                }
            }
            None => {
                if rules::should_rotate_strike(total_runs) {
                    next_live.swap_strike();
                }
            }
        }
        if over_completed {
            next_live.swap_strike();
        }

        // The record carries the flag as it stood when the ball was bowled;
        // the live state carries it for the next delivery.
        let was_free_hit = live.free_hit;
        next_live.free_hit = rules::next_free_hit(live.free_hit, input.ball_type);

        let off_the_bat = input.ball_type == BallType::Normal;
        let delivery = Delivery {
            id: Uuid::new_v4(),
            innings: live.innings,
            over: live.over,
            ball: live.ball,
            runs: total_runs,
            ball_type: input.ball_type,
            is_wicket: input.wicket.is_some(),
            is_boundary: off_the_bat && total_runs == 4,
            is_six: off_the_bat && total_runs == 6,
            is_free_hit: was_free_hit,
            dismissal_type: input.wicket.as_ref().map(|w| w.dismissal),
            dismissed_batter_id: input.wicket.as_ref().map(|w| {
                w.dismissed_batter_id.clone().unwrap_or_else(|| live.striker_id.clone())
            }),
            fielder_id: input.wicket.as_ref().and_then(|w| w.fielder_id.clone()),
            incoming_batter_id: input.wicket.as_ref().map(|w| w.incoming_batter_id.clone()),
            timestamp: Utc::now(),
        };

        log::debug!(
            "applied delivery {}.{} {:?} runs={} wicket={} -> {}",
            delivery.over,
            delivery.ball,
            delivery.ball_type,
            delivery.runs,
            delivery.is_wicket,
            next_match.score(live.batting_team).summary()
        );

        Ok(ProcessedDelivery { match_info: next_match, live: next_live, delivery, over_completed })
    }

    fn validate(match_info: &Match, live: &LiveState, input: &DeliveryInput) -> Result<()> {
        if match_info.is_locked {
            return Err(ScoringError::MatchLocked);
        }
        if match_info.status != MatchStatus::Live {
            return Err(ScoringError::MatchNotLive { status: match_info.status });
        }
        if !live.is_setup_complete() {
            return Err(ScoringError::IncompleteSetup {
                missing: live.missing_setup_fields().join(", "),
            });
        }
        if let Some(details) = &input.wicket {
            // A wicket always counts as a legal ball.
            if !input.ball_type.is_legal() {
                return Err(ScoringError::InvalidDelivery(
                    "a wicket cannot be recorded on a wide or no-ball".into(),
                ));
            }
            if details.incoming_batter_id.is_empty() {
                return Err(ScoringError::InvalidDelivery(
                    "a wicket needs an incoming batter".into(),
                ));
            }
        }
        Ok(())
    }
}
