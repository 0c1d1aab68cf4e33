use thiserror::Error;

/// Errors produced by the game engine when an action does not fit the current round.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlackjackGameError {
    #[error("no round is in progress, start a new game first")]
    RoundNotInProgress,
}
