use serde::{Deserialize, Serialize};

use crate::RulesError;

/// Blackjack payout multiplier as a ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutRatio {
    pub numerator: u16,
    pub denominator: u16,
}

impl PayoutRatio {
    pub const THREE_TO_TWO: Self = Self {
        numerator: 3,
        denominator: 2,
    };
    pub const SIX_TO_FIVE: Self = Self {
        numerator: 6,
        denominator: 5,
    };
    pub const ONE_TO_ONE: Self = Self {
        numerator: 1,
        denominator: 1,
    };

    pub fn new(numerator: u16, denominator: u16) -> Result<Self, RulesError> {
        if denominator == 0 {
            return Err(RulesError::ZeroPayoutDenominator);
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Profit on `bet`, rounded down.
    pub fn calculate_payout(&self, bet: u64) -> u64 {
        if self.denominator == 0 {
            return 0;
        }
        let profit = (bet as u128 * self.numerator as u128) / self.denominator as u128;
        profit.min(u64::MAX as u128) as u64
    }
}

impl std::str::FromStr for PayoutRatio {
    type Err = RulesError;

    /// Parses `N:D`, e.g. `3:2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RulesError::InvalidPayoutRatio(s.to_string());
        let (num, den) = s.split_once(':').ok_or_else(invalid)?;
        let num: u16 = num.trim().parse().map_err(|_| invalid())?;
        let den: u16 = den.trim().parse().map_err(|_| invalid())?;
        PayoutRatio::new(num, den)
    }
}

/// Table configuration.
///
/// Every field has a default, so a partial config file only overrides the
/// fields it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableRules {
    /// Chips each newly seated player starts with
    pub starting_bankroll: u64,

    /// Smallest accepted wager
    pub min_bet: u64,

    /// Number of decks in the shoe
    pub num_decks: u8,

    /// The shoe is rebuilt before a draw when fewer cards than this remain
    pub reshuffle_threshold: usize,

    /// Dealer draws while below this total
    pub dealer_stands_on: u8,

    /// Hands one player may hold after splitting
    pub max_hands_per_player: usize,

    /// Seats at the table
    pub max_players: usize,

    /// Profit paid on a natural, on top of the returned stake
    pub blackjack_payout: PayoutRatio,
}

impl Default for TableRules {
    fn default() -> Self {
        Self {
            starting_bankroll: 1000,
            min_bet: 50,
            num_decks: 6,
            reshuffle_threshold: 15,
            dealer_stands_on: 17,
            max_hands_per_player: 4,
            max_players: 6,
            blackjack_payout: PayoutRatio::THREE_TO_TWO,
        }
    }
}

impl TableRules {
    pub fn validate(&self) -> Result<(), RulesError> {
        if self.num_decks == 0 {
            return Err(RulesError::NoDecks);
        }
        if self.min_bet == 0 {
            return Err(RulesError::ZeroMinimumBet);
        }
        if self.max_hands_per_player == 0 {
            return Err(RulesError::NoHandsAllowed);
        }
        if self.max_players == 0 {
            return Err(RulesError::NoSeats);
        }
        if self.blackjack_payout.denominator == 0 {
            return Err(RulesError::ZeroPayoutDenominator);
        }
        if !(2..=21).contains(&self.dealer_stands_on) {
            return Err(RulesError::DealerThresholdOutOfRange(self.dealer_stands_on));
        }
        Ok(())
    }
}
