use serde::{Deserialize, Serialize};

use crate::{Hand, PayoutRatio};

/// Outcome of one player hand against the dealer's final hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandResult {
    Bust,
    Blackjack,
    DealerBustWin,
    Win,
    Push,
    Lose,
}

impl HandResult {
    pub fn code(&self) -> &'static str {
        match self {
            HandResult::Bust => "bust",
            HandResult::Blackjack => "blackjack",
            HandResult::DealerBustWin => "dealer_bust_win",
            HandResult::Win => "win",
            HandResult::Push => "push",
            HandResult::Lose => "lose",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HandResult::Bust => "BUST - LOSE",
            HandResult::Blackjack => "BLACKJACK - WIN 3:2",
            HandResult::DealerBustWin => "DEALER BUST - WIN",
            HandResult::Win => "WIN",
            HandResult::Push => "PUSH",
            HandResult::Lose => "LOSE",
        }
    }

    pub fn is_win(&self) -> bool {
        matches!(
            self,
            HandResult::Blackjack | HandResult::DealerBustWin | HandResult::Win
        )
    }

    /// Chips returned for `bet`, stake included. Saturates at `u64::MAX`.
    pub fn payout(&self, bet: u64, blackjack_payout: PayoutRatio) -> u64 {
        match self {
            HandResult::Bust | HandResult::Lose => 0,
            HandResult::Blackjack => bet.saturating_add(blackjack_payout.calculate_payout(bet)),
            HandResult::DealerBustWin | HandResult::Win => bet.saturating_mul(2),
            HandResult::Push => bet,
        }
    }
}

/// The facts a showdown depends on, for either side of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Showdown {
    pub value: u8,
    pub bust: bool,
    pub blackjack: bool,
}

impl From<&Hand> for Showdown {
    fn from(hand: &Hand) -> Self {
        Self {
            value: hand.value(),
            bust: hand.is_bust(),
            blackjack: hand.is_blackjack(),
        }
    }
}

/// First matching rule wins. A natural against a dealer natural falls
/// through to the value comparison and pushes.
pub fn classify(player: Showdown, dealer: Showdown) -> HandResult {
    if player.bust {
        HandResult::Bust
    } else if player.blackjack && !dealer.blackjack {
        HandResult::Blackjack
    } else if dealer.bust {
        HandResult::DealerBustWin
    } else if player.value > dealer.value {
        HandResult::Win
    } else if player.value == dealer.value {
        HandResult::Push
    } else {
        HandResult::Lose
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub result: HandResult,
    pub payout: u64,
}

pub fn resolve_hand(hand: &Hand, dealer: &Hand, blackjack_payout: PayoutRatio) -> Resolution {
    let result = classify(Showdown::from(hand), Showdown::from(dealer));
    Resolution {
        result,
        payout: result.payout(hand.bet(), blackjack_payout),
    }
}
