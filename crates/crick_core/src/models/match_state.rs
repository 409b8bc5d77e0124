//! Match identity and score bookkeeping.
//!
//! `Match` is the authoritative per-match record the client keeps between
//! syncs: identity, lifecycle status, format, and one `TeamScore` per side.
//! Everything here is plain data; mutation flows through the delivery
//! processor and the reconcile path only.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::rules::BALLS_PER_OVER;

// =============================================================================
// Format and lifecycle status
// =============================================================================

/// Match format, driving the overs caps used by the completion detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchFormat {
    T20,
    Odi,
    Test,
    #[serde(rename = "first-class")]
    FirstClass,
    #[serde(rename = "list-a")]
    ListA,
}

impl MatchFormat {
    /// Innings length in overs. `None` for uncapped formats, which never
    /// complete an innings on overs.
    pub fn overs_cap(&self) -> Option<u32> {
        match self {
            MatchFormat::T20 => Some(20),
            MatchFormat::Odi | MatchFormat::ListA => Some(50),
            MatchFormat::Test | MatchFormat::FirstClass => None,
        }
    }

    /// Per-bowler overs allowance. `None` for formats without a limit.
    pub fn bowler_overs_cap(&self) -> Option<u32> {
        match self {
            MatchFormat::T20 => Some(4),
            MatchFormat::Odi | MatchFormat::ListA => Some(10),
            MatchFormat::Test | MatchFormat::FirstClass => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MatchFormat::T20 => "T20",
            MatchFormat::Odi => "ODI",
            MatchFormat::Test => "Test",
            MatchFormat::FirstClass => "First-class",
            MatchFormat::ListA => "List A",
        }
    }
}

/// Match lifecycle status, owned by a collaborator endpoint. The core only
/// requires `Live` (and `is_locked == false`) before accepting deliveries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Upcoming,
    Live,
    Completed,
    Cancelled,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            MatchStatus::Upcoming => "upcoming",
            MatchStatus::Live => "live",
            MatchStatus::Completed => "completed",
            MatchStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

// =============================================================================
// Team side
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TeamSide {
    #[default]
    Home,
    Away,
}

impl TeamSide {
    pub fn opponent(&self) -> Self {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }

    pub fn is_home(&self) -> bool {
        matches!(self, TeamSide::Home)
    }
}

// =============================================================================
// Team score
// =============================================================================

/// One side's score line.
///
/// Invariant: `balls` stays in `0..6`; the sixth legal ball always collapses
/// into `overs + 1, balls = 0` before the struct is observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TeamScore {
    pub runs: u32,
    pub wickets: u8,
    /// Completed overs.
    pub overs: u32,
    /// Legal balls bowled in the current over, `0..6`.
    pub balls: u8,
}

impl TeamScore {
    /// Score line in the conventional `"145/6"` form.
    pub fn summary(&self) -> String {
        format!("{}/{}", self.runs, self.wickets)
    }

    /// Overs in the conventional `"12.4"` form.
    pub fn overs_display(&self) -> String {
        format!("{}.{}", self.overs, self.balls)
    }

    /// Legal balls faced so far across the whole innings.
    pub fn legal_balls_bowled(&self) -> u32 {
        self.overs * BALLS_PER_OVER + self.balls as u32
    }

    /// Runs per over, 0.0 before the first legal ball.
    pub fn run_rate(&self) -> f32 {
        let balls = self.legal_balls_bowled();
        if balls == 0 {
            return 0.0;
        }
        self.runs as f32 * BALLS_PER_OVER as f32 / balls as f32
    }
}

// =============================================================================
// Match
// =============================================================================

/// Authoritative per-match record held by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub match_id: String,
    pub status: MatchStatus,
    pub format: MatchFormat,
    pub home_score: TeamScore,
    pub away_score: TeamScore,
    /// True once the match is completed; no further mutation is permitted,
    /// client-side or server-side.
    pub is_locked: bool,
}

impl Match {
    pub fn new(match_id: impl Into<String>, format: MatchFormat) -> Self {
        Self {
            match_id: match_id.into(),
            status: MatchStatus::Upcoming,
            format,
            home_score: TeamScore::default(),
            away_score: TeamScore::default(),
            is_locked: false,
        }
    }

    pub fn score(&self, side: TeamSide) -> &TeamScore {
        match side {
            TeamSide::Home => &self.home_score,
            TeamSide::Away => &self.away_score,
        }
    }

    pub fn score_mut(&mut self, side: TeamSide) -> &mut TeamScore {
        match side {
            TeamSide::Home => &mut self.home_score,
            TeamSide::Away => &mut self.away_score,
        }
    }

    pub fn is_live(&self) -> bool {
        self.status == MatchStatus::Live && !self.is_locked
    }
}
