//! Per-player aggregates returned with every sync.
//!
//! The backend recomputes these authoritatively from its ball-by-ball ledger;
//! the client never derives them locally, it only displays them and feeds the
//! bowling figures to the bowler-change check.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattingStat {
    pub player_id: String,
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    /// Runs per hundred balls, as computed by the backend.
    pub strike_rate: f32,
    #[serde(default)]
    pub is_out: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BowlingStat {
    pub player_id: String,
    /// Completed overs bowled.
    pub overs: u32,
    /// Legal balls in the unfinished over, `0..6`.
    #[serde(default)]
    pub balls: u8,
    pub maidens: u32,
    pub runs_conceded: u32,
    pub wickets: u32,
    /// Runs per over, as computed by the backend.
    pub economy: f32,
}

impl BowlingStat {
    /// Figures in the conventional `"3/24"` form.
    pub fn figures(&self) -> String {
        format!("{}/{}", self.wickets, self.runs_conceded)
    }

    /// Whether this bowler has used up the per-format allowance.
    pub fn reached_overs_cap(&self, cap: u32) -> bool {
        self.overs >= cap
    }
}
