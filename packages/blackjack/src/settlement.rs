use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use time::OffsetDateTime;

use crate::{Card, HandResult, PlayerId};

/// One settled hand, in the shape handed to persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRecord {
    #[serde(rename = "ts", with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub player_id: PlayerId,
    pub player_name: String,
    pub hand_index: usize,
    pub bet: u64,
    pub result: HandResult,
    pub payout: u64,
    pub final_bankroll: u64,
    pub player_cards: Vec<Card>,
    pub dealer_cards: Vec<Card>,
    pub player_value: u8,
    pub dealer_value: u8,
}

/// Every hand of a settled round, in seat order then hand order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    #[serde(with = "time::serde::rfc3339")]
    pub settled_at: OffsetDateTime,
    pub records: Vec<SettlementRecord>,
}

impl Settlement {
    pub fn total_payout(&self) -> u64 {
        self.records.iter().map(|r| r.payout).sum()
    }

    pub fn for_player(&self, player: PlayerId) -> impl Iterator<Item = &SettlementRecord> {
        self.records.iter().filter(move |r| r.player_id == player)
    }
}

/// Where settled rounds are stored. Storage is outside the table: a failing
/// sink never touches bankrolls or hands.
pub trait SettlementSink {
    type Error: std::fmt::Display;

    fn record(&mut self, records: &[SettlementRecord]) -> Result<(), Self::Error>;
}

impl SettlementSink for Vec<SettlementRecord> {
    type Error = Infallible;

    fn record(&mut self, records: &[SettlementRecord]) -> Result<(), Self::Error> {
        self.extend_from_slice(records);
        Ok(())
    }
}

/// Outcome of a save attempt, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReport {
    pub saved: bool,
    pub message: String,
}

impl SaveReport {
    pub fn saved(message: impl Into<String>) -> Self {
        Self {
            saved: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            saved: false,
            message: message.into(),
        }
    }
}
