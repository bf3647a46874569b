//! Error type shared by every engine operation

use thiserror::Error;

use crate::types::PlayerId;

/// Failures raised synchronously at the point a tournament rule is violated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SwissError {
    /// Configuration, registration or match start attempted too late
    #[error("{0} has already started")]
    AlreadyStarted(&'static str),

    #[error("{0} has not started yet")]
    NotStarted(&'static str),

    /// Round advance refused by the tournament state machine
    #[error("cannot start next round: {0}")]
    InvalidTransition(&'static str),

    #[error("even participant count required, got {0}")]
    OddParticipants(usize),

    #[error("tournament has no participants")]
    NoParticipants,

    #[error("end time must be later than start time")]
    InvalidTimeOrder,

    #[error("unknown player: {0}")]
    UnknownPlayer(String),

    #[error("invalid player id '{0}': expected two uppercase letters and five digits")]
    InvalidPlayerId(String),

    #[error("round count must be positive")]
    InvalidRoundCount,

    #[error("no match at index {0} in the current round")]
    NoSuchMatch(usize),

    #[error("invalid pairing: {0}")]
    InvalidPairing(String),

    /// Persisted state that cannot be turned back into a tournament
    #[error("invalid tournament record: {0}")]
    InvalidRecord(String),
}

impl SwissError {
    pub(crate) fn unknown(id: &PlayerId) -> Self {
        SwissError::UnknownPlayer(id.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SwissError>;
