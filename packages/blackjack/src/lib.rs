mod card;
mod error;
mod hand;
mod payout;
mod player;
mod rules;
mod settlement;
mod shoe;
mod table;

pub use card::{Card, Rank, Suit};
pub use error::{RulesError, TableError};
pub use hand::{
    calculate_hand_value, can_split_cards, is_blackjack, is_busted, is_soft_hand, Hand, HandStatus,
};
pub use payout::{classify, resolve_hand, HandResult, Resolution, Showdown};
pub use player::{Player, PlayerId};
pub use rules::{PayoutRatio, TableRules};
pub use settlement::{SaveReport, Settlement, SettlementRecord, SettlementSink};
pub use shoe::Shoe;
pub use table::{Advance, DealerView, Round, RoundPhase, Seat, Table, TurnPointer};
