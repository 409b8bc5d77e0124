use thiserror::Error;

use crick_core::ScoringError;

/// Failures surfaced by the sync and undo coordinators.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Local precondition failure; never reached the network.
    #[error(transparent)]
    Scoring(#[from] ScoringError),

    /// Timeout, abort or server-side 5xx. The optimistic state is kept and
    /// flagged until the next successful sync or a reload.
    #[error("transport failure: {reason}")]
    Transport { reason: String },

    /// The backend rejected the command; the message is surfaced verbatim.
    #[error("{message}")]
    Rejected { message: String },

    /// Another scoring command is already in flight for this match.
    #[error("a scoring command is already in flight")]
    CommandInFlight,

    /// The previous delivery was recorded a moment ago; the tap is dropped
    /// rather than queued.
    #[error("delivery recorded too soon after the previous one")]
    CoolingDown,

    /// A second undo arrived within the guard window of the first.
    #[error("undo pressed again too quickly")]
    UndoGuard,
}

impl SyncError {
    /// Whether the UI should route to the match-setup screen instead of
    /// showing a plain error. Backend validation messages that mention the
    /// crease or bowler assignment count as setup problems.
    pub fn requires_setup_redirect(&self) -> bool {
        match self {
            SyncError::Scoring(err) => err.is_setup_error(),
            SyncError::Rejected { message } => {
                let message = message.to_lowercase();
                message.contains("setup")
                    || message.contains("striker")
                    || message.contains("bowler")
            }
            _ => false,
        }
    }

    /// Transport-level failures leave the state optimistic-but-unconfirmed;
    /// everything else failed before or at validation.
    pub fn is_transport(&self) -> bool {
        matches!(self, SyncError::Transport { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_redirect_classification() {
        let err = SyncError::Scoring(ScoringError::IncompleteSetup { missing: "bowler".into() });
        assert!(err.requires_setup_redirect());

        let err = SyncError::Rejected { message: "Striker is not part of the batting side".into() };
        assert!(err.requires_setup_redirect());

        let err = SyncError::Rejected { message: "innings already complete".into() };
        assert!(!err.requires_setup_redirect());

        assert!(!SyncError::Transport { reason: "timeout".into() }.requires_setup_redirect());
    }
}
