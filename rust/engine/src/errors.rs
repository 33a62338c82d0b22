use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::player::PlayerStatus;

/// Broad classification used by callers to decide how to react to a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Illegal action, amount or turn. Nothing changed; retry or fall back.
    Validation,
    /// The session cannot accept the operation in its current phase.
    State,
    /// Internal consistency check failed. The session is frozen.
    InvariantViolation,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("seat {0} does not exist")]
    UnknownSeat(usize),
    #[error("it is not seat {actual}'s turn (expected {expected:?})")]
    NotPlayersTurn {
        expected: Option<usize>,
        actual: usize,
    },
    #[error("seat {seat} cannot act while {status:?}")]
    SeatCannotAct { seat: usize, status: PlayerStatus },
    #[error("cannot check facing a bet of {to_call}")]
    CannotCheck { to_call: u32 },
    #[error("invalid raise to {amount}, minimum is {minimum}")]
    InvalidBetAmount { amount: u32, minimum: u32 },
    #[error("action was not reopened for seat {seat}; only call or fold are allowed")]
    RaiseNotAllowed { seat: usize },
    #[error("no hand in progress")]
    NoHandInProgress,
    #[error("a hand is already in progress")]
    HandInProgress,
    #[error("table collapsed: fewer than two seats have chips")]
    TableCollapsed,
    #[error("invalid table configuration: {0}")]
    InvalidConfig(String),
    #[error("deck exhausted")]
    DeckExhausted,
    #[error("chip total mismatch: expected {expected}, found {actual}")]
    ChipsNotConserved { expected: u64, actual: u64 },
    #[error("session frozen after an invariant violation")]
    SessionFrozen,
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::UnknownSeat(_)
            | GameError::NotPlayersTurn { .. }
            | GameError::SeatCannotAct { .. }
            | GameError::CannotCheck { .. }
            | GameError::InvalidBetAmount { .. }
            | GameError::RaiseNotAllowed { .. } => ErrorKind::Validation,
            GameError::NoHandInProgress
            | GameError::HandInProgress
            | GameError::TableCollapsed
            | GameError::InvalidConfig(_) => ErrorKind::State,
            GameError::DeckExhausted
            | GameError::ChipsNotConserved { .. }
            | GameError::SessionFrozen => ErrorKind::InvariantViolation,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.kind() != ErrorKind::InvariantViolation
    }
}
