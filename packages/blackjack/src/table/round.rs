use serde::{Deserialize, Serialize};

use crate::{Hand, PlayerId};

/// One betting player's place in a round (can have multiple hands if split)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub player: PlayerId,
    pub hands: Vec<Hand>,
}

impl Seat {
    pub fn new(player: PlayerId, bet: u64) -> Self {
        Self {
            player,
            hands: vec![Hand::with_bet(bet)],
        }
    }

    pub fn all_hands_finished(&self) -> bool {
        self.hands.iter().all(|h| h.is_finished())
    }

    pub fn total_bet(&self) -> u64 {
        self.hands.iter().map(|h| h.bet()).sum()
    }
}

/// Position of the active hand: index of the seat among the round's
/// betting players, and of the hand within that seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnPointer {
    pub player_index: usize,
    pub hand_index: usize,
}

/// Transient state of one deal: created by the deal, dropped at the next round.
///
/// Turn order is kept as a flat list of pointers rebuilt after every split,
/// and the cursor indexes into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub(crate) dealer: Hand,
    pub(crate) seats: Vec<Seat>,
    turn_order: Vec<TurnPointer>,
    cursor: usize,
    pub(crate) dealer_revealed: bool,
}

impl Round {
    pub(crate) fn new(seats: Vec<Seat>) -> Self {
        let mut round = Self {
            dealer: Hand::new(),
            seats,
            turn_order: Vec::new(),
            cursor: 0,
            dealer_revealed: false,
        };
        round.rebuild_turn_order();
        round
    }

    pub fn dealer(&self) -> &Hand {
        &self.dealer
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn seat_of(&self, player: PlayerId) -> Option<&Seat> {
        self.seats.iter().find(|s| s.player == player)
    }

    pub fn turn_order(&self) -> &[TurnPointer] {
        &self.turn_order
    }

    pub fn pointer(&self) -> Option<TurnPointer> {
        self.turn_order.get(self.cursor).copied()
    }

    pub fn active_seat(&self) -> Option<&Seat> {
        self.pointer().and_then(|p| self.seats.get(p.player_index))
    }

    pub fn active_player(&self) -> Option<PlayerId> {
        self.active_seat().map(|s| s.player)
    }

    pub fn active_hand(&self) -> Option<&Hand> {
        let pointer = self.pointer()?;
        self.seats
            .get(pointer.player_index)?
            .hands
            .get(pointer.hand_index)
    }

    pub(crate) fn active_hand_mut(&mut self) -> Option<&mut Hand> {
        let pointer = self.pointer()?;
        self.seats
            .get_mut(pointer.player_index)?
            .hands
            .get_mut(pointer.hand_index)
    }

    pub fn is_last_turn(&self) -> bool {
        self.cursor + 1 >= self.turn_order.len()
    }

    pub fn has_previous_turn(&self) -> bool {
        self.cursor > 0
    }

    /// The pointer is on the last hand of the last player and that hand,
    /// like every other, is standing or bust.
    pub fn all_hands_done(&self) -> bool {
        self.is_last_turn() && self.seats.iter().all(|s| s.all_hands_finished())
    }

    pub(crate) fn move_next(&mut self) -> bool {
        if self.is_last_turn() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub(crate) fn move_previous(&mut self) -> bool {
        if !self.has_previous_turn() {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Inserts `hand` directly after the active hand of the active seat.
    pub(crate) fn insert_after_active(&mut self, hand: Hand) {
        let Some(pointer) = self.pointer() else {
            return;
        };
        if let Some(seat) = self.seats.get_mut(pointer.player_index) {
            seat.hands.insert(pointer.hand_index + 1, hand);
        }
        self.rebuild_turn_order();
        self.cursor = self
            .turn_order
            .iter()
            .position(|p| *p == pointer)
            .unwrap_or(self.cursor);
    }

    fn rebuild_turn_order(&mut self) {
        self.turn_order = self
            .seats
            .iter()
            .enumerate()
            .flat_map(|(player_index, seat)| {
                (0..seat.hands.len()).map(move |hand_index| TurnPointer {
                    player_index,
                    hand_index,
                })
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Card, Rank, Suit};

    fn two_seats() -> Round {
        Round::new(vec![Seat::new(PlayerId(0), 100), Seat::new(PlayerId(1), 50)])
    }

    #[test]
    fn test_turn_order_follows_seats() {
        let round = two_seats();
        assert_eq!(
            round.turn_order(),
            &[
                TurnPointer { player_index: 0, hand_index: 0 },
                TurnPointer { player_index: 1, hand_index: 0 },
            ]
        );
        assert_eq!(round.active_player(), Some(PlayerId(0)));
    }

    #[test]
    fn test_move_next_and_previous() {
        let mut round = two_seats();
        assert!(!round.move_previous());
        assert!(round.move_next());
        assert_eq!(round.active_player(), Some(PlayerId(1)));
        assert!(round.is_last_turn());
        assert!(!round.move_next());
        assert!(round.move_previous());
        assert_eq!(round.active_player(), Some(PlayerId(0)));
    }

    #[test]
    fn test_insert_after_active_keeps_cursor() {
        let mut round = two_seats();
        round
            .active_hand_mut()
            .unwrap()
            .add_card(Card::new(Rank::Eight, Suit::Hearts));
        round.insert_after_active(Hand::with_bet(100));

        assert_eq!(round.seats()[0].hands.len(), 2);
        assert_eq!(round.turn_order().len(), 3);
        assert_eq!(
            round.pointer(),
            Some(TurnPointer { player_index: 0, hand_index: 0 })
        );
        assert_eq!(round.active_hand().unwrap().cards().len(), 1);

        round.move_next();
        assert_eq!(
            round.pointer(),
            Some(TurnPointer { player_index: 0, hand_index: 1 })
        );
        round.move_next();
        assert_eq!(
            round.pointer(),
            Some(TurnPointer { player_index: 1, hand_index: 0 })
        );
    }

    #[test]
    fn test_all_hands_done_requires_last_turn() {
        let mut round = two_seats();
        for seat in &mut round.seats {
            seat.hands[0].stand();
        }
        assert!(!round.all_hands_done());
        round.move_next();
        assert!(round.all_hands_done());
    }
}
