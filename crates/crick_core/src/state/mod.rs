//! The scoring state machine.
//!
//! One explicit reducer over a closed set of actions replaces scattered
//! mutable containers: every transition takes the current `ScoreState` and
//! returns a fresh one, plus at most one backend command for the sync layer
//! to execute. The two halves of the optimistic-update command pattern live
//! here as pure transforms: [`optimistic_apply`] and
//! [`reconcile_with_server`].

use serde::{Deserialize, Serialize};

use crate::api::{
    CompleteMatchRequest, MatchSnapshot, RecordBallRequest, ScoreUpdate, StartSecondInningsRequest,
};
use crate::engine::{
    intent_for, CompletionDetector, CompletionSignal, DeliveryInput, DeliveryProcessor, UiIntent,
    WicketDetails,
};
use crate::error::{Result, ScoringError};
use crate::models::{
    BallHistory, BallType, BattingStat, BowlingStat, LiveState, Match, MatchPhase, MatchStatus,
    TeamScore, TeamSide,
};
use crate::rules::BALLS_PER_OVER;

// =============================================================================
// State
// =============================================================================

/// Where the last issued backend command stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum SyncStatus {
    #[default]
    Idle,
    /// An optimistic update is applied locally and awaiting the server.
    Pending,
    /// The last command failed; local state is optimistic-but-unconfirmed
    /// until the next successful sync or reload.
    Error { message: String },
}

/// The single modal owner. Exactly one dialog (or none) is open at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum UiState {
    Idle,
    /// Extras dialog: collecting the additional runs for a wide, no-ball,
    /// bye or leg-bye before the delivery is finalized.
    AwaitingExtrasDetails { ball_type: BallType },
    /// Wicket dialog: collecting dismissal type, fielder and incoming batter.
    AwaitingWicketDetails { draft: DeliveryDraft },
    /// Advisory prompt; scoring continues while it is shown.
    AwaitingBowlerChange { bowler_id: String },
    InningsBreakPrompt,
    MatchCompletePrompt,
}

impl UiState {
    /// Dialogs that hold a half-entered delivery and therefore block a new
    /// one from being recorded.
    pub fn blocks_scoring(&self) -> bool {
        matches!(
            self,
            UiState::AwaitingExtrasDetails { .. } | UiState::AwaitingWicketDetails { .. }
        )
    }
}

/// What the scorer tapped, before any follow-up dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryDraft {
    pub ball_type: BallType,
    /// Runs off the bat for a normal ball; ignored for extras, whose runs
    /// come from the extras dialog.
    pub runs: u32,
    pub is_wicket: bool,
}

/// Authoritative in-memory state for one scored match.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreState {
    pub match_info: Match,
    pub phase: MatchPhase,
    pub ui: UiState,
    pub history: BallHistory,
    pub sync: SyncStatus,
    /// Backend-computed aggregates, replaced on every reconcile.
    pub batting_stats: Vec<BattingStat>,
    pub bowling_stats: Vec<BowlingStat>,
}

impl ScoreState {
    /// State for a live match whose setup may or may not be complete.
    pub fn new(match_info: Match, live: LiveState) -> Self {
        let phase = if live.is_setup_complete() {
            MatchPhase::InningsInProgress { live }
        } else {
            MatchPhase::SetupIncomplete
        };
        Self {
            match_info,
            phase,
            ui: UiState::Idle,
            history: BallHistory::new(),
            sync: SyncStatus::Idle,
            batting_stats: Vec::new(),
            bowling_stats: Vec::new(),
        }
    }

    /// Initial state built from a freshly fetched snapshot.
    pub fn from_snapshot(snapshot: &MatchSnapshot) -> Self {
        let base = Self {
            match_info: Match::new(snapshot.match_id.clone(), snapshot.format),
            phase: MatchPhase::SetupIncomplete,
            ui: UiState::Idle,
            history: BallHistory::new(),
            sync: SyncStatus::Idle,
            batting_stats: Vec::new(),
            bowling_stats: Vec::new(),
        };
        reconcile_with_server(&base, snapshot)
    }

    pub fn live_state(&self) -> Option<&LiveState> {
        self.phase.live_state()
    }

    /// The batting side's score line, while an innings is in progress.
    pub fn batting_score(&self) -> Option<&TeamScore> {
        self.live_state().map(|live| self.match_info.score(live.batting_team))
    }

    // -------------------------------------------------------------------------
    // Chase arithmetic (second innings only)
    // -------------------------------------------------------------------------

    /// Runs the chasing side must reach to win.
    pub fn target(&self) -> Option<u32> {
        let live = self.live_state()?;
        if live.innings < 2 {
            return None;
        }
        let first = self.match_info.score(live.batting_team.opponent());
        Some(first.runs + 1)
    }

    pub fn runs_required(&self) -> Option<u32> {
        let target = self.target()?;
        let chasing = self.batting_score()?;
        Some(target.saturating_sub(chasing.runs))
    }

    /// Legal balls left in the innings, for capped formats.
    pub fn balls_remaining(&self) -> Option<u32> {
        let live = self.live_state()?;
        let cap = self.match_info.format.overs_cap()?;
        let bowled = self.match_info.score(live.batting_team).legal_balls_bowled();
        Some((cap * BALLS_PER_OVER).saturating_sub(bowled))
    }

    pub fn required_run_rate(&self) -> Option<f32> {
        let required = self.runs_required()?;
        let balls = self.balls_remaining()?;
        if balls == 0 {
            return None;
        }
        Some(required as f32 * BALLS_PER_OVER as f32 / balls as f32)
    }

    /// Winner and margin derived from the final scores, offered as the
    /// prefill for the match-completion dialog.
    pub fn suggest_result(&self) -> Option<MatchResultSummary> {
        let chasing = match &self.phase {
            MatchPhase::MatchComplete { last_batting } => (*last_batting)?,
            _ => return None,
        };
        let first = chasing.opponent();
        let first_score = self.match_info.score(first);
        let chase_score = self.match_info.score(chasing);

        let summary = if first_score.runs > chase_score.runs {
            MatchResultSummary {
                winner: Some(first),
                margin: format!("by {} runs", first_score.runs - chase_score.runs),
            }
        } else if chase_score.runs > first_score.runs {
            MatchResultSummary {
                winner: Some(chasing),
                margin: format!("by {} wickets", 10 - chase_score.wickets),
            }
        } else {
            MatchResultSummary { winner: None, margin: "match tied".into() }
        };
        Some(summary)
    }
}

/// Suggested outcome for the completion dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResultSummary {
    pub winner: Option<TeamSide>,
    pub margin: String,
}

// =============================================================================
// Actions and transitions
// =============================================================================

/// The closed set of actions the UI can dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoringAction {
    RecordDelivery(DeliveryDraft),
    ConfirmExtras { additional_runs: u32 },
    ConfirmWicket(WicketDetails),
    /// Close whatever dialog is open, discarding any half-entered delivery.
    DismissDialog,
    Undo,
    StartSecondInnings {
        striker_id: String,
        non_striker_id: String,
        bowler_id: String,
    },
    CompleteMatch(CompleteMatchRequest),
    /// Reconcile with an authoritative server snapshot.
    ApplyServerSnapshot(MatchSnapshot),
    /// The in-flight command failed; keep the optimistic state, flag it.
    SyncFailed { message: String },
}

/// Command for the sync layer to execute after the optimistic transition.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    RecordBall(RecordBallRequest),
    UndoLastBall,
    StartSecondInnings(StartSecondInningsRequest),
    CompleteMatch(CompleteMatchRequest),
}

/// A completed transition: the new state plus at most one network command.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: ScoreState,
    pub command: Option<BackendCommand>,
}

impl Transition {
    fn local(state: ScoreState) -> Self {
        Self { state, command: None }
    }
}

// =============================================================================
// Reducer
// =============================================================================

/// Applies one action. Errors are local precondition failures; no state is
/// changed when one is returned.
pub fn reduce(state: &ScoreState, action: ScoringAction) -> Result<Transition> {
    match action {
        ScoringAction::RecordDelivery(draft) => record_delivery(state, draft),
        ScoringAction::ConfirmExtras { additional_runs } => confirm_extras(state, additional_runs),
        ScoringAction::ConfirmWicket(details) => confirm_wicket(state, details),
        ScoringAction::DismissDialog => {
            let mut next = state.clone();
            next.ui = UiState::Idle;
            Ok(Transition::local(next))
        }
        ScoringAction::Undo => undo(state),
        ScoringAction::StartSecondInnings { striker_id, non_striker_id, bowler_id } => {
            start_second_innings(state, striker_id, non_striker_id, bowler_id)
        }
        ScoringAction::CompleteMatch(request) => complete_match(state, request),
        ScoringAction::ApplyServerSnapshot(snapshot) => {
            Ok(Transition::local(reconcile_with_server(state, &snapshot)))
        }
        ScoringAction::SyncFailed { message } => {
            let mut next = state.clone();
            next.sync = SyncStatus::Error { message };
            Ok(Transition::local(next))
        }
    }
}

fn record_delivery(state: &ScoreState, draft: DeliveryDraft) -> Result<Transition> {
    if state.ui.blocks_scoring() {
        return Err(ScoringError::PhaseConflict { action: "recording a delivery" });
    }
    // Fail before opening a dialog the delivery could never pass.
    live_state_for_scoring(state)?;

    match intent_for(draft.ball_type, draft.is_wicket) {
        UiIntent::None => {
            optimistic_apply(state, DeliveryInput::runs(draft.ball_type, draft.runs))
        }
        UiIntent::CollectWicketDetails => {
            let mut next = state.clone();
            next.ui = UiState::AwaitingWicketDetails { draft };
            Ok(Transition::local(next))
        }
        UiIntent::CollectExtrasDetails => {
            let mut next = state.clone();
            next.ui = UiState::AwaitingExtrasDetails { ball_type: draft.ball_type };
            Ok(Transition::local(next))
        }
    }
}

fn confirm_extras(state: &ScoreState, additional_runs: u32) -> Result<Transition> {
    let ball_type = match &state.ui {
        UiState::AwaitingExtrasDetails { ball_type } => *ball_type,
        _ => return Err(ScoringError::NothingPending),
    };
    optimistic_apply(
        state,
        DeliveryInput { ball_type, scorer_runs: additional_runs, wicket: None },
    )
}

fn confirm_wicket(state: &ScoreState, details: WicketDetails) -> Result<Transition> {
    let draft = match &state.ui {
        UiState::AwaitingWicketDetails { draft } => draft.clone(),
        _ => return Err(ScoringError::NothingPending),
    };
    optimistic_apply(
        state,
        DeliveryInput { ball_type: draft.ball_type, scorer_runs: draft.runs, wicket: Some(details) },
    )
}

/// The optimistic half of the sync protocol: applies the delivery locally
/// and emits the wire command carrying the pre-increment position.
pub fn optimistic_apply(state: &ScoreState, input: DeliveryInput) -> Result<Transition> {
    let live = live_state_for_scoring(state)?;
    let processed = DeliveryProcessor::apply(&state.match_info, live, &input)?;
    let request = RecordBallRequest::new(live, &processed.delivery);

    let mut next = state.clone();
    next.match_info = processed.match_info;
    next.phase = MatchPhase::InningsInProgress { live: processed.live };
    next.history.push(processed.delivery);
    next.ui = UiState::Idle;
    next.sync = SyncStatus::Pending;

    Ok(Transition {
        state: apply_completion(next),
        command: Some(BackendCommand::RecordBall(request)),
    })
}

fn undo(state: &ScoreState) -> Result<Transition> {
    if state.match_info.is_locked {
        return Err(ScoringError::MatchLocked);
    }
    let mut next = state.clone();
    let popped = next.history.pop().ok_or(ScoringError::NothingToUndo)?;

    // Best-effort rollback so the UI does not stall on the old score; the
    // server's resulting state is authoritative and replaces all of this.
    let batting = match &next.phase {
        MatchPhase::InningsInProgress { live } => Some(live.batting_team),
        MatchPhase::InningsBreak { first_innings_batting } => Some(*first_innings_batting),
        MatchPhase::MatchComplete { last_batting } => *last_batting,
        MatchPhase::SetupIncomplete => None,
    };
    if let Some(side) = batting {
        let score = next.match_info.score_mut(side);
        score.runs = score.runs.saturating_sub(popped.runs);
        if popped.is_wicket {
            score.wickets = score.wickets.saturating_sub(1);
        }
        if popped.ball_type.is_legal() {
            rollback_counter(&mut score.overs, &mut score.balls);
        }
    }
    if let MatchPhase::InningsInProgress { live } = &mut next.phase {
        if popped.ball_type.is_legal() {
            rollback_counter(&mut live.over, &mut live.ball);
        }
    }

    next.sync = SyncStatus::Pending;
    log::info!("undoing delivery {} ({:?})", popped.id, popped.ball_type);
    Ok(Transition { state: next, command: Some(BackendCommand::UndoLastBall) })
}

fn rollback_counter(over: &mut u32, ball: &mut u8) {
    if *ball == 0 {
        if *over > 0 {
            *over -= 1;
            *ball = (BALLS_PER_OVER - 1) as u8;
        }
    } else {
        *ball -= 1;
    }
}

fn start_second_innings(
    state: &ScoreState,
    striker_id: String,
    non_striker_id: String,
    bowler_id: String,
) -> Result<Transition> {
    let first_batting = match &state.phase {
        MatchPhase::InningsBreak { first_innings_batting } => *first_innings_batting,
        _ => return Err(ScoringError::PhaseConflict { action: "starting the second innings" }),
    };

    let live = LiveState::new(2, first_batting.opponent(), striker_id, non_striker_id, bowler_id);
    if !live.is_setup_complete() {
        return Err(ScoringError::IncompleteSetup {
            missing: live.missing_setup_fields().join(", "),
        });
    }

    let request = StartSecondInningsRequest {
        opening_batter1_id: live.striker_id.clone(),
        opening_batter2_id: live.non_striker_id.clone(),
        first_bowler_id: live.bowler_id.clone(),
    };

    let mut next = state.clone();
    log::info!("second innings: {:?} chasing", live.batting_team);
    next.phase = MatchPhase::InningsInProgress { live };
    next.ui = UiState::Idle;
    next.sync = SyncStatus::Pending;
    Ok(Transition { state: next, command: Some(BackendCommand::StartSecondInnings(request)) })
}

fn complete_match(state: &ScoreState, request: CompleteMatchRequest) -> Result<Transition> {
    if state.match_info.is_locked {
        return Err(ScoringError::MatchLocked);
    }
    if !matches!(state.phase, MatchPhase::MatchComplete { .. }) {
        return Err(ScoringError::PhaseConflict { action: "completing the match" });
    }
    let mut next = state.clone();
    // Optimistic lock: no further mutation, even before the server confirms.
    next.match_info.status = MatchStatus::Completed;
    next.match_info.is_locked = true;
    next.ui = UiState::Idle;
    next.sync = SyncStatus::Pending;
    Ok(Transition { state: next, command: Some(BackendCommand::CompleteMatch(request)) })
}

// =============================================================================
// Reconciliation
// =============================================================================

/// The confirm half of the sync protocol: the server snapshot overwrites the
/// local match state unconditionally. Local-only bookkeeping (ball history,
/// open dialogs) survives, then completion signals are re-evaluated.
pub fn reconcile_with_server(state: &ScoreState, snapshot: &MatchSnapshot) -> ScoreState {
    let mut next = state.clone();
    next.match_info.match_id = snapshot.match_id.clone();
    next.match_info.status = snapshot.status;
    next.match_info.format = snapshot.format;
    next.match_info.is_locked = snapshot.is_locked;
    if let Some(score) = snapshot.score {
        next.match_info.home_score = score.home;
        next.match_info.away_score = score.away;
    }
    next.batting_stats = snapshot.batting_stats.clone();
    next.bowling_stats = snapshot.bowling_stats.clone();
    next.phase = phase_from_snapshot(state, snapshot);
    next.sync = SyncStatus::Idle;

    // A prompt left over from a phase the server has moved past is stale.
    if next.phase.is_scoreable()
        && matches!(next.ui, UiState::InningsBreakPrompt | UiState::MatchCompletePrompt)
    {
        next.ui = UiState::Idle;
    }

    apply_completion(next)
}

fn phase_from_snapshot(state: &ScoreState, snapshot: &MatchSnapshot) -> MatchPhase {
    if snapshot.is_locked || snapshot.status == MatchStatus::Completed {
        let last_batting = match &state.phase {
            MatchPhase::MatchComplete { last_batting } => *last_batting,
            MatchPhase::InningsInProgress { live } if live.innings >= 2 => {
                Some(live.batting_team)
            }
            _ => None,
        };
        return MatchPhase::MatchComplete { last_batting };
    }
    if let Some(live) = &snapshot.live_state {
        if live.is_setup_complete() {
            return MatchPhase::InningsInProgress { live: live.clone() };
        }
        return MatchPhase::SetupIncomplete;
    }
    if let Some(side) = snapshot.first_innings_batting {
        return MatchPhase::InningsBreak { first_innings_batting: side };
    }
    // The snapshot carries nothing newer about the phase; keep the local view.
    state.phase.clone()
}

/// Narrow push-channel merge: overwrites the team scores the same way a sync
/// response would, then re-evaluates completion.
pub fn apply_score_update(state: &ScoreState, update: &ScoreUpdate) -> ScoreState {
    let mut next = state.clone();
    next.match_info.home_score = update.score.home;
    next.match_info.away_score = update.score.away;
    apply_completion(next)
}

// =============================================================================
// Completion pass
// =============================================================================

/// Runs the detector and folds any signal into the phase/UI. A signal whose
/// dialog is already open is not re-fired.
fn apply_completion(mut state: ScoreState) -> ScoreState {
    let signal = match &state.phase {
        MatchPhase::InningsInProgress { live } => {
            CompletionDetector::detect(&state.match_info, live, &state.bowling_stats)
        }
        _ => None,
    };

    match signal {
        Some(CompletionSignal::InningsComplete { innings }) => {
            if let MatchPhase::InningsInProgress { live } = &state.phase {
                let side = live.batting_team;
                log::info!(
                    "innings {} complete: {}",
                    innings,
                    state.match_info.score(side).summary()
                );
                state.phase = MatchPhase::InningsBreak { first_innings_batting: side };
                state.ui = UiState::InningsBreakPrompt;
            }
        }
        Some(CompletionSignal::MatchComplete) => {
            if let MatchPhase::InningsInProgress { live } = &state.phase {
                let chasing = live.batting_team;
                log::info!("match complete: {}", state.match_info.score(chasing).summary());
                state.phase = MatchPhase::MatchComplete { last_batting: Some(chasing) };
                state.ui = UiState::MatchCompletePrompt;
            }
        }
        Some(CompletionSignal::BowlerChangeRequired { bowler_id }) => {
            if state.ui == UiState::Idle {
                state.ui = UiState::AwaitingBowlerChange { bowler_id };
            }
        }
        None => {}
    }
    state
}

fn live_state_for_scoring(state: &ScoreState) -> Result<&LiveState> {
    if state.match_info.is_locked {
        return Err(ScoringError::MatchLocked);
    }
    if state.match_info.status != MatchStatus::Live {
        return Err(ScoringError::MatchNotLive { status: state.match_info.status });
    }
    match &state.phase {
        MatchPhase::InningsInProgress { live } => Ok(live),
        MatchPhase::SetupIncomplete => Err(ScoringError::IncompleteSetup {
            missing: "striker, non-striker and bowler".into(),
        }),
        MatchPhase::InningsBreak { .. } => Err(ScoringError::IncompleteSetup {
            missing: "second-innings openers and bowler".into(),
        }),
        MatchPhase::MatchComplete { .. } => Err(ScoringError::MatchLocked),
    }
}
