//! In-memory backend double for coordinator tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crick_core::{
    CompleteMatchRequest, LiveState, LiveStateUpdate, Match, MatchFormat, MatchSnapshot,
    MatchStatus, RecordBallRequest, ScoreSection, ScoreState, StartSecondInningsRequest,
    TeamScore, TeamSide,
};

use crate::backend::ScoringBackend;
use crate::error::SyncError;

/// Scriptable [`ScoringBackend`] that answers every call from configured
/// state and records what was invoked.
pub(crate) struct MockBackend {
    calls: Mutex<Vec<&'static str>>,
    home: Mutex<TeamScore>,
    away: Mutex<TeamScore>,
    live: Mutex<Option<LiveState>>,
    locked: Mutex<bool>,
    fail_next: Mutex<Option<String>>,
    reject_next: Mutex<Option<String>>,
    omit_score_once: Mutex<bool>,
    last_record: Mutex<Option<RecordBallRequest>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            home: Mutex::new(TeamScore::default()),
            away: Mutex::new(TeamScore::default()),
            live: Mutex::new(Some(LiveState::new(1, TeamSide::Home, "s1", "s2", "b1"))),
            locked: Mutex::new(false),
            fail_next: Mutex::new(None),
            reject_next: Mutex::new(None),
            omit_score_once: Mutex::new(false),
            last_record: Mutex::new(None),
        }
    }

    /// The client-side state every coordinator test starts from.
    pub fn live_state_fixture() -> ScoreState {
        let mut match_info = Match::new("m1", MatchFormat::T20);
        match_info.status = MatchStatus::Live;
        ScoreState::new(match_info, LiveState::new(1, TeamSide::Home, "s1", "s2", "b1"))
    }

    pub fn set_score(&self, home: TeamScore, away: TeamScore) {
        *self.home.lock().unwrap() = home;
        *self.away.lock().unwrap() = away;
    }

    pub fn set_bowler(&self, bowler_id: &str) {
        if let Some(live) = self.live.lock().unwrap().as_mut() {
            live.bowler_id = bowler_id.to_string();
        }
    }

    pub fn set_innings(&self, innings: u8, batting_team: TeamSide) {
        if let Some(live) = self.live.lock().unwrap().as_mut() {
            live.innings = innings;
            live.batting_team = batting_team;
        }
    }

    /// Next call fails at the transport layer.
    pub fn fail_next(&self, reason: &str) {
        *self.fail_next.lock().unwrap() = Some(reason.to_string());
    }

    /// Next call is rejected by backend validation.
    pub fn reject_next(&self, message: &str) {
        *self.reject_next.lock().unwrap() = Some(message.to_string());
    }

    /// Next snapshot comes back without the score payload.
    pub fn omit_score_once(&self) {
        *self.omit_score_once.lock().unwrap() = true;
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_record_request(&self) -> Option<RecordBallRequest> {
        self.last_record.lock().unwrap().clone()
    }

    fn answer(&self, call: &'static str) -> Result<MatchSnapshot, SyncError> {
        self.calls.lock().unwrap().push(call);
        if let Some(reason) = self.fail_next.lock().unwrap().take() {
            return Err(SyncError::Transport { reason });
        }
        if let Some(message) = self.reject_next.lock().unwrap().take() {
            return Err(SyncError::Rejected { message });
        }

        let locked = *self.locked.lock().unwrap();
        let omit_score = std::mem::take(&mut *self.omit_score_once.lock().unwrap());
        let score = if omit_score {
            None
        } else {
            Some(ScoreSection {
                home: *self.home.lock().unwrap(),
                away: *self.away.lock().unwrap(),
            })
        };
        Ok(MatchSnapshot {
            match_id: "m1".into(),
            status: if locked { MatchStatus::Completed } else { MatchStatus::Live },
            format: MatchFormat::T20,
            is_locked: locked,
            score,
            live_state: if locked { None } else { self.live.lock().unwrap().clone() },
            first_innings_batting: None,
            batting_stats: Vec::new(),
            bowling_stats: Vec::new(),
            timestamp: Utc::now(),
        })
    }
}

#[async_trait]
impl ScoringBackend for MockBackend {
    async fn record_ball(
        &self,
        _match_id: &str,
        request: &RecordBallRequest,
    ) -> Result<MatchSnapshot, SyncError> {
        *self.last_record.lock().unwrap() = Some(request.clone());
        self.answer("record_ball")
    }

    async fn undo_last_ball(&self, _match_id: &str) -> Result<MatchSnapshot, SyncError> {
        self.answer("undo_last_ball")
    }

    async fn start_second_innings(
        &self,
        _match_id: &str,
        request: &StartSecondInningsRequest,
    ) -> Result<MatchSnapshot, SyncError> {
        let batting_team = self
            .live
            .lock()
            .unwrap()
            .as_ref()
            .map(|live| live.batting_team)
            .unwrap_or(TeamSide::Away);
        *self.live.lock().unwrap() = Some(LiveState::new(
            2,
            batting_team,
            request.opening_batter1_id.clone(),
            request.opening_batter2_id.clone(),
            request.first_bowler_id.clone(),
        ));
        self.answer("start_second_innings")
    }

    async fn complete_match(
        &self,
        _match_id: &str,
        _request: &CompleteMatchRequest,
    ) -> Result<MatchSnapshot, SyncError> {
        *self.locked.lock().unwrap() = true;
        self.answer("complete_match")
    }

    async fn update_live_state(
        &self,
        _match_id: &str,
        update: &LiveStateUpdate,
    ) -> Result<MatchSnapshot, SyncError> {
        if let Some(live) = self.live.lock().unwrap().as_mut() {
            if let Some(id) = &update.striker_id {
                live.striker_id = id.clone();
            }
            if let Some(id) = &update.non_striker_id {
                live.non_striker_id = id.clone();
            }
            if let Some(id) = &update.bowler_id {
                live.bowler_id = id.clone();
            }
            if let Some(over) = update.current_over {
                live.over = over;
            }
            if let Some(ball) = update.current_ball {
                live.ball = ball;
            }
        }
        self.answer("update_live_state")
    }

    async fn fetch_match(&self, _match_id: &str) -> Result<MatchSnapshot, SyncError> {
        self.answer("fetch_match")
    }
}
