use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse failure category shared by every engine error.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    StateConflict,
    NotFound,
    TimeoutNotElapsed,
    ServerPaused,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid card id: {id}")]
    InvalidCard { id: u8 },
    #[error("Rule not found: {0}")]
    RuleNotFound(String),
    #[error("Round already started")]
    RoundAlreadyStarted,
    #[error("Round has not been dealt yet")]
    RoundNotDealt,
    #[error("Round already finished")]
    RoundFinished,
    #[error("No participants have placed a bet")]
    NoParticipants,
    #[error("Invalid bet amount: {amount}")]
    InvalidBetAmount { amount: u64 },
    #[error("Bet {amount} exceeds the maximum of {max}")]
    BetTooHigh { amount: u64, max: u64 },
    #[error("Insufficient balance: {balance}, required: {required}")]
    InsufficientBalance { balance: i64, required: u64 },
    #[error("The dealer cannot place a bet")]
    DealerCannotBet,
    #[error("Player already played this turn")]
    AlreadyPlayed,
    #[error("It's not your turn")]
    NotYourTurn,
    #[error("Hand is too low to stand")]
    HandTooLow,
    #[error("Cannot hit with this hand")]
    CannotHit,
    #[error("Cannot stand with this hand")]
    CannotStand,
    #[error("Player has not stood yet")]
    NotStandingYet,
    #[error("Player already settled")]
    AlreadySettled,
    #[error("Turn timeout has not elapsed")]
    NotTimedOut,
    #[error("Participant not found: {0}")]
    ParticipantNotFound(String),
    #[error("Deck exhausted")]
    DeckExhausted,
}

impl GameError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::InvalidCard { .. }
            | GameError::InvalidBetAmount { .. }
            | GameError::BetTooHigh { .. }
            | GameError::InsufficientBalance { .. } => ErrorKind::Validation,
            GameError::RuleNotFound(_) | GameError::ParticipantNotFound(_) => ErrorKind::NotFound,
            GameError::NotTimedOut => ErrorKind::TimeoutNotElapsed,
            GameError::RoundAlreadyStarted
            | GameError::RoundNotDealt
            | GameError::RoundFinished
            | GameError::NoParticipants
            | GameError::DealerCannotBet
            | GameError::AlreadyPlayed
            | GameError::NotYourTurn
            | GameError::HandTooLow
            | GameError::CannotHit
            | GameError::CannotStand
            | GameError::NotStandingYet
            | GameError::AlreadySettled
            | GameError::DeckExhausted => ErrorKind::StateConflict,
        }
    }
}
