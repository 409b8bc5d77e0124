//! Live innings state and the match lifecycle phases.

use serde::{Deserialize, Serialize};

use super::match_state::TeamSide;

/// In-progress innings state: who is at the crease, who is bowling, and
/// where in the over the game stands.
///
/// Owned exclusively by the match phase; mutated only by the delivery
/// processor and the reconcile path, and discarded when an innings starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveState {
    /// 1 or 2.
    pub innings: u8,
    pub batting_team: TeamSide,
    pub striker_id: String,
    pub non_striker_id: String,
    pub bowler_id: String,
    /// Completed overs in this innings.
    pub over: u32,
    /// Legal balls in the current over, `0..6`.
    pub ball: u8,
    /// Armed by a no-ball, cleared by the next legal delivery.
    pub free_hit: bool,
}

impl LiveState {
    pub fn new(
        innings: u8,
        batting_team: TeamSide,
        striker_id: impl Into<String>,
        non_striker_id: impl Into<String>,
        bowler_id: impl Into<String>,
    ) -> Self {
        Self {
            innings,
            batting_team,
            striker_id: striker_id.into(),
            non_striker_id: non_striker_id.into(),
            bowler_id: bowler_id.into(),
            over: 0,
            ball: 0,
            free_hit: false,
        }
    }

    /// Swaps which batter faces the next delivery.
    pub fn swap_strike(&mut self) {
        std::mem::swap(&mut self.striker_id, &mut self.non_striker_id);
    }

    /// All three player slots filled with distinct, non-empty ids.
    pub fn is_setup_complete(&self) -> bool {
        !self.striker_id.is_empty()
            && !self.non_striker_id.is_empty()
            && !self.bowler_id.is_empty()
            && self.striker_id != self.non_striker_id
    }

    /// Names the player slots that still block scoring, for the setup
    /// redirect message.
    pub fn missing_setup_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.striker_id.is_empty() {
            missing.push("striker");
        }
        if self.non_striker_id.is_empty() {
            missing.push("non-striker");
        }
        if self.bowler_id.is_empty() {
            missing.push("bowler");
        }
        if missing.is_empty() && self.striker_id == self.non_striker_id {
            missing.push("distinct striker and non-striker");
        }
        missing
    }
}

/// Match lifecycle phase.
///
/// A tagged union instead of optional fields on the match object: scoring
/// without a bowler, or during the innings break, is unrepresentable rather
/// than merely rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum MatchPhase {
    /// The match is live but the crease/bowler assignment is not complete.
    SetupIncomplete,
    /// An innings is being scored.
    InningsInProgress { live: LiveState },
    /// First innings done; waiting for opening batters and a bowler.
    InningsBreak { first_innings_batting: TeamSide },
    /// Both innings done (or the match was closed); awaiting or past the
    /// final server confirmation. `last_batting` is the chasing side when
    /// known, for the result-summary suggestion.
    MatchComplete { last_batting: Option<TeamSide> },
}

impl MatchPhase {
    pub fn live_state(&self) -> Option<&LiveState> {
        match self {
            MatchPhase::InningsInProgress { live } => Some(live),
            _ => None,
        }
    }

    pub fn is_scoreable(&self) -> bool {
        matches!(self, MatchPhase::InningsInProgress { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live() -> LiveState {
        LiveState::new(1, TeamSide::Home, "s1", "s2", "b1")
    }

    #[test]
    fn test_swap_strike() {
        let mut state = live();
        state.swap_strike();
        assert_eq!(state.striker_id, "s2");
        assert_eq!(state.non_striker_id, "s1");
        state.swap_strike();
        assert_eq!(state.striker_id, "s1");
    }

    #[test]
    fn test_setup_completeness() {
        assert!(live().is_setup_complete());

        let mut state = live();
        state.bowler_id.clear();
        assert!(!state.is_setup_complete());
        assert_eq!(state.missing_setup_fields(), vec!["bowler"]);

        let mut state = live();
        state.non_striker_id = "s1".into();
        assert!(!state.is_setup_complete());
        assert_eq!(
            state.missing_setup_fields(),
            vec!["distinct striker and non-striker"]
        );
    }

    #[test]
    fn test_phase_scoreability() {
        assert!(!MatchPhase::SetupIncomplete.is_scoreable());
        assert!(!MatchPhase::InningsBreak { first_innings_batting: TeamSide::Home }.is_scoreable());
        assert!(!MatchPhase::MatchComplete { last_batting: None }.is_scoreable());
        assert!(MatchPhase::InningsInProgress { live: live() }.is_scoreable());
    }
}
