use thiserror::Error;

use crate::models::MatchStatus;

/// Local precondition and validation failures.
///
/// Every variant is raised before any network call is attempted. The sync
/// layer wraps these unchanged so the UI can route setup problems back to the
/// match-setup flow.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("match is not live (status: {status})")]
    MatchNotLive { status: MatchStatus },

    #[error("match is locked, scoring is closed")]
    MatchLocked,

    #[error("match setup is incomplete: {missing}")]
    IncompleteSetup { missing: String },

    #[error("invalid delivery: {0}")]
    InvalidDelivery(String),

    #[error("no delivery is awaiting confirmation")]
    NothingPending,

    #[error("{action} is not available in the current match phase")]
    PhaseConflict { action: &'static str },

    #[error("ball history is empty, nothing to undo")]
    NothingToUndo,
}

impl ScoringError {
    /// Whether the failure is rooted in match setup.
    ///
    /// The UI redirects to the setup screen for these instead of showing a
    /// plain error toast.
    pub fn is_setup_error(&self) -> bool {
        matches!(self, ScoringError::IncompleteSetup { .. })
    }

    /// Whether retrying the same action can ever succeed without the user
    /// changing something first.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ScoringError::MatchNotLive { .. } => true, // status can transition to live
            ScoringError::MatchLocked => false,
            ScoringError::IncompleteSetup { .. } => true, // completing setup unblocks
            ScoringError::InvalidDelivery(_) => true,
            ScoringError::NothingPending => false,
            ScoringError::PhaseConflict { .. } => false,
            ScoringError::NothingToUndo => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoringError>;
