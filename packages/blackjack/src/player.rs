use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable seat key. Assigned in seat order and never reused at a table, so
/// two players may share a display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub bankroll: u64,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, bankroll: u64) -> Self {
        Self {
            id,
            name: name.into(),
            bankroll,
        }
    }

    pub fn can_cover(&self, amount: u64) -> bool {
        self.bankroll >= amount
    }
}
