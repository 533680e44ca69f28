use thiserror::Error;

use crate::{PlayerId, RoundPhase};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    #[error("Shoe must contain at least one deck")]
    NoDecks,
    #[error("Minimum bet must be positive")]
    ZeroMinimumBet,
    #[error("Players must be allowed at least one hand")]
    NoHandsAllowed,
    #[error("Table must have at least one seat")]
    NoSeats,
    #[error("Payout ratio denominator cannot be zero")]
    ZeroPayoutDenominator,
    #[error("Invalid payout ratio '{0}', expected N:D (e.g. 3:2)")]
    InvalidPayoutRatio(String),
    #[error("Dealer stand threshold {0} is outside 2..=21")]
    DealerThresholdOutOfRange(u8),
}

/// A rejected table command. The table is left exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("Cannot {action} during {phase:?}")]
    WrongPhase {
        action: &'static str,
        phase: RoundPhase,
    },
    #[error("Unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("Table is full ({max} seats)")]
    TableFull { max: usize },
    #[error("Player name cannot be empty")]
    EmptyName,
    #[error("Bankroll {bankroll} is below the minimum bet of {min_bet}")]
    BankrollBelowMinimum { bankroll: u64, min_bet: u64 },
    #[error("Bet {bet} is below the minimum of {min_bet}")]
    BetBelowMinimum { bet: u64, min_bet: u64 },
    #[error("Insufficient bankroll. Required: {required}, Available: {available}")]
    InsufficientBankroll { required: u64, available: u64 },
    #[error("At least one player must place a bet of {min_bet} or more")]
    NoBets { min_bet: u64 },
    #[error("No active hand")]
    NoActiveHand,
    #[error("Hand is already standing or bust")]
    HandNotPlayable,
    #[error("Hand cannot be doubled")]
    CannotDouble,
    #[error("Hand cannot be split")]
    CannotSplit,
    #[error("Player already holds the maximum of {max} hands")]
    HandLimitReached { max: usize },
    #[error("You must Stand or Bust before moving on")]
    HandInPlay,
    #[error("Already at the first hand")]
    AtFirstHand,
    #[error("All hands must be finished before the dealer plays")]
    HandsInPlay,
}
