//! Laws of delivery classification and strike rotation.
//!
//! Pure functions only; no state lives here. The delivery processor, the
//! completion detector, and the undo rollback all consume these so the laws
//! are encoded exactly once.

use crate::error::{Result, ScoringError};
use crate::models::BallType;

/// Legal balls per over.
pub const BALLS_PER_OVER: u32 = 6;

/// Most runs a scorer can attach to a single hit.
pub const MAX_RUNS_PER_BALL: u32 = 6;

/// Most additional runs a scorer can attach to an extra.
pub const MAX_ADDITIONAL_RUNS: u32 = 4;

/// Whether the delivery counts toward the six-ball over.
pub fn is_legal_delivery(ball_type: BallType) -> bool {
    ball_type.is_legal()
}

/// Runs credited to the batting team for the delivery.
///
/// Every ball type adds its full `runs` value; for wides and no-balls the
/// penalty run is already folded in by [`delivery_total_runs`].
pub fn team_runs_for_delivery(runs: u32, _ball_type: BallType) -> u32 {
    runs
}

/// Strike rotates on odd runs, for every delivery type, wides, byes and
/// no-balls included.
pub fn should_rotate_strike(runs: u32) -> bool {
    runs % 2 == 1
}

/// Result of advancing the ball counter after a legal delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverAdvance {
    pub over: u32,
    pub ball: u8,
    /// The sixth legal ball just rolled the counter into a fresh over.
    /// Strike swaps unconditionally at this transition, composed with (not
    /// replacing) the parity swap already applied for the ball.
    pub over_completed: bool,
}

/// Advances `(over, ball)` for a legal delivery. Six legal balls always
/// collapse into `(over + 1, 0)`; the counter is never observed at 6.
pub fn advance_over(current_over: u32, current_ball: u8) -> OverAdvance {
    let next_ball = current_ball as u32 + 1;
    if next_ball == BALLS_PER_OVER {
        OverAdvance { over: current_over + 1, ball: 0, over_completed: true }
    } else {
        OverAdvance { over: current_over, ball: next_ball as u8, over_completed: false }
    }
}

/// Total runs credited for a delivery, given the scorer's chosen value.
///
/// Wides and no-balls carry an automatic penalty run on top of 0–4
/// additional runs; byes and leg-byes credit the chosen value directly; a
/// normal ball credits 0–6 off the bat.
pub fn delivery_total_runs(ball_type: BallType, scorer_runs: u32) -> Result<u32> {
    match ball_type {
        BallType::Normal => {
            if scorer_runs > MAX_RUNS_PER_BALL {
                return Err(ScoringError::InvalidDelivery(format!(
                    "runs must be 0..={}, got {}",
                    MAX_RUNS_PER_BALL, scorer_runs
                )));
            }
            Ok(scorer_runs)
        }
        BallType::Wide | BallType::NoBall => {
            if scorer_runs > MAX_ADDITIONAL_RUNS {
                return Err(ScoringError::InvalidDelivery(format!(
                    "additional runs must be 0..={}, got {}",
                    MAX_ADDITIONAL_RUNS, scorer_runs
                )));
            }
            Ok(1 + scorer_runs)
        }
        BallType::Bye | BallType::LegBye => {
            if scorer_runs == 0 || scorer_runs > MAX_ADDITIONAL_RUNS {
                return Err(ScoringError::InvalidDelivery(format!(
                    "byes must be 1..={}, got {}",
                    MAX_ADDITIONAL_RUNS, scorer_runs
                )));
            }
            Ok(scorer_runs)
        }
    }
}

/// Free-hit flag after this delivery resolves.
///
/// A no-ball arms the flag for the following delivery; the next legal
/// delivery clears it whatever its outcome. An intervening wide leaves the
/// flag armed, since the free hit has not been bowled yet.
pub fn next_free_hit(current: bool, ball_type: BallType) -> bool {
    match ball_type {
        BallType::NoBall => true,
        _ if ball_type.is_legal() => false,
        _ => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_legal_delivery_classification() {
        assert!(is_legal_delivery(BallType::Normal));
        assert!(is_legal_delivery(BallType::Bye));
        assert!(is_legal_delivery(BallType::LegBye));
        assert!(!is_legal_delivery(BallType::Wide));
        assert!(!is_legal_delivery(BallType::NoBall));
    }

    #[test]
    fn test_strike_rotation_parity() {
        assert!(!should_rotate_strike(0));
        assert!(should_rotate_strike(1));
        assert!(!should_rotate_strike(2));
        assert!(should_rotate_strike(3));
        assert!(!should_rotate_strike(4));
        assert!(should_rotate_strike(5));
    }

    #[test]
    fn test_over_advances_within_over() {
        let advance = advance_over(3, 2);
        assert_eq!((advance.over, advance.ball), (3, 3));
        assert!(!advance.over_completed);
    }

    #[test]
    fn test_sixth_ball_rolls_over() {
        let advance = advance_over(3, 5);
        assert_eq!((advance.over, advance.ball), (4, 0));
        assert!(advance.over_completed);
    }

    #[test]
    fn test_extras_base_runs() {
        // Wide/no-ball: 1 + additional.
        assert_eq!(delivery_total_runs(BallType::Wide, 0).unwrap(), 1);
        assert_eq!(delivery_total_runs(BallType::Wide, 3).unwrap(), 4);
        assert_eq!(delivery_total_runs(BallType::NoBall, 4).unwrap(), 5);
        // Bye/leg-bye: the chosen value directly.
        assert_eq!(delivery_total_runs(BallType::Bye, 2).unwrap(), 2);
        assert_eq!(delivery_total_runs(BallType::LegBye, 1).unwrap(), 1);
        // Normal: off the bat.
        assert_eq!(delivery_total_runs(BallType::Normal, 6).unwrap(), 6);
    }

    #[test]
    fn test_extras_range_validation() {
        assert!(delivery_total_runs(BallType::Wide, 5).is_err());
        assert!(delivery_total_runs(BallType::Bye, 0).is_err());
        assert!(delivery_total_runs(BallType::Bye, 5).is_err());
        assert!(delivery_total_runs(BallType::Normal, 7).is_err());
    }

    #[test]
    fn test_free_hit_lifecycle() {
        // Armed by a no-ball.
        assert!(next_free_hit(false, BallType::NoBall));
        // Cleared by any legal delivery.
        assert!(!next_free_hit(true, BallType::Normal));
        assert!(!next_free_hit(true, BallType::Bye));
        assert!(!next_free_hit(true, BallType::LegBye));
        // A wide in between leaves it armed.
        assert!(next_free_hit(true, BallType::Wide));
        // Back-to-back no-balls keep it armed.
        assert!(next_free_hit(true, BallType::NoBall));
    }

    proptest! {
        #[test]
        fn prop_six_legal_balls_complete_exactly_one_over(start_over in 0u32..200) {
            let mut over = start_over;
            let mut ball = 0u8;
            let mut completions = 0;
            for _ in 0..BALLS_PER_OVER {
                let advance = advance_over(over, ball);
                over = advance.over;
                ball = advance.ball;
                if advance.over_completed {
                    completions += 1;
                }
            }
            prop_assert_eq!(completions, 1);
            prop_assert_eq!((over, ball), (start_over + 1, 0));
        }

        #[test]
        fn prop_ball_counter_never_reaches_six(over in 0u32..200, ball in 0u8..6) {
            let advance = advance_over(over, ball);
            prop_assert!(advance.ball < 6);
        }

        #[test]
        fn prop_rotation_matches_parity(runs in 0u32..7) {
            prop_assert_eq!(should_rotate_strike(runs), runs % 2 == 1);
        }

        #[test]
        fn prop_team_runs_credit_full_value(runs in 0u32..7) {
            for ball_type in BallType::iter() {
                prop_assert_eq!(team_runs_for_delivery(runs, ball_type), runs);
            }
        }
    }
}
