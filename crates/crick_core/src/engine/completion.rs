//! Completion and bowler-change detection.
//!
//! Runs after every successful state update. The detector itself is pure and
//! idempotent; the reducer suppresses re-firing a signal whose dialog is
//! already open.

use crate::models::{BowlingStat, LiveState, Match, MatchFormat, TeamScore};

/// Signals surfaced to the scorer after a state update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionSignal {
    /// The batting side is all out or the overs cap is reached.
    InningsComplete { innings: u8 },
    /// Same predicate applied to the second innings' batting team.
    MatchComplete,
    /// Advisory only: the current bowler has used the per-format allowance.
    /// Scoring is not blocked.
    BowlerChangeRequired { bowler_id: String },
}

pub struct CompletionDetector;

impl CompletionDetector {
    /// Inspects the state after an update. At most one signal is raised;
    /// innings/match completion outranks the bowler advisory.
    pub fn detect(
        match_info: &Match,
        live: &LiveState,
        bowling_stats: &[BowlingStat],
    ) -> Option<CompletionSignal> {
        let score = match_info.score(live.batting_team);
        if Self::innings_complete(score, match_info.format) {
            if live.innings >= 2 {
                return Some(CompletionSignal::MatchComplete);
            }
            return Some(CompletionSignal::InningsComplete { innings: live.innings });
        }

        if let Some(cap) = match_info.format.bowler_overs_cap() {
            let reached = bowling_stats
                .iter()
                .find(|stat| stat.player_id == live.bowler_id)
                .map(|stat| stat.reached_overs_cap(cap))
                .unwrap_or(false);
            if reached {
                return Some(CompletionSignal::BowlerChangeRequired {
                    bowler_id: live.bowler_id.clone(),
                });
            }
        }

        None
    }

    /// All out, or a capped format's overs are used up. Uncapped formats
    /// never complete on overs.
    fn innings_complete(score: &TeamScore, format: MatchFormat) -> bool {
        if score.wickets >= 10 {
            return true;
        }
        match format.overs_cap() {
            Some(cap) => score.overs == cap && score.balls == 0,
            None => false,
        }
    }
}
