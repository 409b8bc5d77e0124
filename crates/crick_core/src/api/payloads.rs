//! Request and response payloads for the scoring backend.
//!
//! The backend speaks camelCase JSON; every mutating call returns the full
//! updated match snapshot. Requests report the *pre-increment* over, ball and
//! crease assignment: the position the delivery was bowled at, before any
//! local rotation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    BallType, BattingStat, BowlingStat, Delivery, DismissalType, LiveState, MatchFormat,
    MatchStatus, TeamScore, TeamSide,
};

// =============================================================================
// recordBall
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordBallRequest {
    pub innings: u8,
    pub batting_team: TeamSide,
    /// Over/ball the delivery was bowled at, before the local advance.
    pub over: u32,
    pub ball: u8,
    /// Crease and bowler assignment before the local rotation.
    pub striker_id: String,
    pub non_striker_id: String,
    pub bowler_id: String,
    pub delivery: DeliveryPayload,
    pub timestamp: DateTime<Utc>,
}

impl RecordBallRequest {
    /// Builds the wire command from the pre-delivery live state and the
    /// finalized record.
    pub fn new(live: &LiveState, delivery: &Delivery) -> Self {
        Self {
            innings: live.innings,
            batting_team: live.batting_team,
            over: live.over,
            ball: live.ball,
            striker_id: live.striker_id.clone(),
            non_striker_id: live.non_striker_id.clone(),
            bowler_id: live.bowler_id.clone(),
            delivery: DeliveryPayload::from_delivery(delivery),
            timestamp: delivery.timestamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPayload {
    pub runs: u32,
    pub ball_type: BallType,
    pub is_wicket: bool,
    pub is_boundary: bool,
    pub is_six: bool,
    pub is_free_hit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dismissal_type: Option<DismissalType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dismissed_batter_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fielder_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incoming_batter_id: Option<String>,
}

impl DeliveryPayload {
    pub fn from_delivery(delivery: &Delivery) -> Self {
        Self {
            runs: delivery.runs,
            ball_type: delivery.ball_type,
            is_wicket: delivery.is_wicket,
            is_boundary: delivery.is_boundary,
            is_six: delivery.is_six,
            is_free_hit: delivery.is_free_hit,
            dismissal_type: delivery.dismissal_type,
            dismissed_batter_id: delivery.dismissed_batter_id.clone(),
            fielder_id: delivery.fielder_id.clone(),
            incoming_batter_id: delivery.incoming_batter_id.clone(),
        }
    }
}

// =============================================================================
// startSecondInnings / completeMatch / updateLiveState
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSecondInningsRequest {
    pub opening_batter1_id: String,
    pub opening_batter2_id: String,
    pub first_bowler_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteMatchRequest {
    /// `None` for a tie or no-result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<TeamSide>,
    /// Human-readable margin, e.g. `"by 23 runs"`.
    pub margin: String,
    #[serde(default)]
    pub key_performers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Manual correction of the live state, bypassing the delivery processor.
/// Only the provided fields change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStateUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub striker_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub non_striker_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bowler_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_over: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_ball: Option<u8>,
}

// =============================================================================
// Snapshot responses and push updates
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSection {
    pub home: TeamScore,
    pub away: TeamScore,
}

/// Full match snapshot, returned by every successful backend call.
///
/// `score` is optional so a partial response can be detected: when it is
/// missing the coordinator falls back to a full reload instead of trusting
/// the rest of the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSnapshot {
    pub match_id: String,
    pub status: MatchStatus,
    pub format: MatchFormat,
    pub is_locked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<ScoreSection>,
    /// Absent during the innings break and after completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_state: Option<LiveState>,
    /// During the innings break: which side batted first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_innings_batting: Option<TeamSide>,
    #[serde(default)]
    pub batting_stats: Vec<BattingStat>,
    #[serde(default)]
    pub bowling_stats: Vec<BowlingStat>,
    pub timestamp: DateTime<Utc>,
}

/// Match-scoped push payload. Applied as another source of authoritative
/// state, through the same reconcile path as a sync response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreUpdate {
    pub match_id: String,
    pub score: ScoreSection,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_ball_carries_pre_increment_values() {
        let mut live = LiveState::new(1, TeamSide::Home, "s1", "s2", "b1");
        live.over = 4;
        live.ball = 3;
        let delivery = Delivery {
            id: uuid::Uuid::new_v4(),
            innings: 1,
            over: 4,
            ball: 3,
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

        let request = RecordBallRequest::new(&live, &delivery);
        assert_eq!((request.over, request.ball), (4, 3));
        assert_eq!(request.striker_id, "s1");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["strikerId"], "s1");
        assert_eq!(json["delivery"]["ballType"], "normal");
        assert!(json["delivery"].get("dismissalType").is_none());
    }

    #[test]
    fn test_snapshot_tolerates_missing_sections() {
        let json = r#"{
            "matchId": "m1",
            "status": "live",
            "format": "t20",
            "isLocked": false,
            "timestamp": "2026-08-06T10:00:00Z"
        }"#;
        let snapshot: MatchSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.score.is_none());
        assert!(snapshot.live_state.is_none());
        assert!(snapshot.batting_stats.is_empty());
    }

    #[test]
    fn test_live_state_update_serializes_sparsely() {
        let update = LiveStateUpdate { bowler_id: Some("b2".into()), ..Default::default() };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"bowlerId":"b2"}"#);
    }
}
