//! Delivery records and the client-side ball history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Ball classification
// =============================================================================

/// How a delivery is classified for counting and run-credit purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum BallType {
    Normal,
    Wide,
    NoBall,
    Bye,
    LegBye,
}

impl BallType {
    /// Legal deliveries are the only ones that count toward the six-ball
    /// over. Wides and no-balls must be re-bowled.
    pub fn is_legal(&self) -> bool {
        matches!(self, BallType::Normal | BallType::Bye | BallType::LegBye)
    }

    /// Extras that carry an automatic one-run penalty on top of whatever the
    /// scorer adds. Byes and leg-byes credit only the runs actually taken.
    pub fn has_penalty_run(&self) -> bool {
        matches!(self, BallType::Wide | BallType::NoBall)
    }

    /// Whether recording this ball type needs a follow-up dialog for the
    /// additional runs before the delivery can be finalized.
    pub fn is_extra(&self) -> bool {
        !matches!(self, BallType::Normal)
    }

    pub fn name(&self) -> &'static str {
        match self {
            BallType::Normal => "Normal",
            BallType::Wide => "Wide",
            BallType::NoBall => "No ball",
            BallType::Bye => "Bye",
            BallType::LegBye => "Leg bye",
        }
    }
}

/// How a batter was dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DismissalType {
    Bowled,
    Caught,
    Lbw,
    RunOut,
    Stumped,
    HitWicket,
    RetiredHurt,
    ObstructingField,
}

impl DismissalType {
    /// Dismissals credited to the bowler in the bowling figures.
    pub fn credits_bowler(&self) -> bool {
        matches!(
            self,
            DismissalType::Bowled
                | DismissalType::Caught
                | DismissalType::Lbw
                | DismissalType::Stumped
                | DismissalType::HitWicket
        )
    }

    /// Dismissals that involve a fielder the scorer must name.
    pub fn requires_fielder(&self) -> bool {
        matches!(self, DismissalType::Caught | DismissalType::RunOut | DismissalType::Stumped)
    }

    pub fn name(&self) -> &'static str {
        match self {
            DismissalType::Bowled => "Bowled",
            DismissalType::Caught => "Caught",
            DismissalType::Lbw => "LBW",
            DismissalType::RunOut => "Run out",
            DismissalType::Stumped => "Stumped",
            DismissalType::HitWicket => "Hit wicket",
            DismissalType::RetiredHurt => "Retired hurt",
            DismissalType::ObstructingField => "Obstructing the field",
        }
    }
}

// =============================================================================
// Delivery record
// =============================================================================

/// Immutable record of one delivery, appended to `BallHistory` after a
/// successful local apply. The server keeps the true ball-by-ball ledger;
/// this copy exists for undo bookkeeping only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub id: Uuid,
    pub innings: u8,
    /// Over/ball position the delivery was bowled at (pre-increment).
    pub over: u32,
    pub ball: u8,
    /// Total runs credited to the batting team, penalty run included.
    pub runs: u32,
    pub ball_type: BallType,
    pub is_wicket: bool,
    pub is_boundary: bool,
    pub is_six: bool,
    /// Whether this delivery was bowled as a free hit.
    pub is_free_hit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dismissal_type: Option<DismissalType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dismissed_batter_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fielder_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incoming_batter_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Ball history
// =============================================================================

/// Insertion-ordered record of deliveries applied locally this session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BallHistory(Vec<Delivery>);

impl BallHistory {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, delivery: Delivery) {
        self.0.push(delivery);
    }

    /// Removes and returns the most recent delivery.
    pub fn pop(&mut self) -> Option<Delivery> {
        self.0.pop()
    }

    pub fn last(&self) -> Option<&Delivery> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Delivery> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_legality_partition() {
        // Exactly wide and no-ball sit outside the six-ball count.
        for ball_type in BallType::iter() {
            let expected = !matches!(ball_type, BallType::Wide | BallType::NoBall);
            assert_eq!(ball_type.is_legal(), expected, "{:?}", ball_type);
        }
    }

    #[test]
    fn test_penalty_run_partition() {
        for ball_type in BallType::iter() {
            let expected = matches!(ball_type, BallType::Wide | BallType::NoBall);
            assert_eq!(ball_type.has_penalty_run(), expected, "{:?}", ball_type);
        }
    }

    #[test]
    fn test_ball_type_wire_names() {
        assert_eq!(serde_json::to_string(&BallType::NoBall).unwrap(), "\"no_ball\"");
        assert_eq!(serde_json::to_string(&BallType::LegBye).unwrap(), "\"leg_bye\"");
    }

    #[test]
    fn test_history_is_lifo() {
        let mut history = BallHistory::new();
        assert!(history.pop().is_none());

        let mut delivery = Delivery {
            id: Uuid::new_v4(),
            innings: 1,
            over: 0,
            ball: 0,
            runs: 1,
            ball_type: BallType::Normal,
            is_wicket: false,
            is_boundary: false,
            is_six: false,
            is_free_hit: false,
            dismissal_type: None,
            dismissed_batter_id: None,
            fielder_id: None,
            incoming_batter_id: None,
            timestamp: Utc::now(),
        };
        history.push(delivery.clone());
        delivery.ball = 1;
        delivery.runs = 4;
        history.push(delivery);

        assert_eq!(history.len(), 2);
        assert_eq!(history.pop().unwrap().runs, 4);
        assert_eq!(history.pop().unwrap().runs, 1);
    }
}
