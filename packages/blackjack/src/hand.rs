use crate::Card;
use serde::{Deserialize, Serialize};

/// Display state of a hand while it is being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandStatus {
    Playing,
    Standing,
    Blackjack,
    Bust,
}

impl HandStatus {
    pub fn label(&self) -> &'static str {
        match self {
            HandStatus::Playing => "",
            HandStatus::Standing => "Standing",
            HandStatus::Blackjack => "BLACKJACK",
            HandStatus::Bust => "BUST",
        }
    }
}

/// Calculate the value of a blackjack hand
pub fn calculate_hand_value(cards: &[Card]) -> u8 {
    let mut total: u16 = 0;
    let mut aces = 0;

    for card in cards {
        if card.is_ace() {
            aces += 1;
        }
        total += card.value() as u16;
    }

    // Count aces as 1 until the hand stops busting
    while total > 21 && aces > 0 {
        total -= 10;
        aces -= 1;
    }

    total.min(u8::MAX as u16) as u8
}

/// Check if a hand is soft (has an ace counted as 11)
pub fn is_soft_hand(cards: &[Card]) -> bool {
    let hard_total: u16 = cards
        .iter()
        .map(|c| if c.is_ace() { 1 } else { c.value() as u16 })
        .sum();
    cards.iter().any(|c| c.is_ace()) && hard_total + 10 == calculate_hand_value(cards) as u16
}

/// Check if a hand is busted
pub fn is_busted(cards: &[Card]) -> bool {
    calculate_hand_value(cards) > 21
}

/// Check if a hand is blackjack (21 with 2 cards)
pub fn is_blackjack(cards: &[Card]) -> bool {
    cards.len() == 2 && calculate_hand_value(cards) == 21
}

/// Check if two cards can be split (same rank)
pub fn can_split_cards(card1: &Card, card2: &Card) -> bool {
    card1.rank == card2.rank
}

/// A player or dealer hand.
///
/// The `bust` and `blackjack` flags are recomputed on every card added, and
/// reaching exactly 21 stands the hand automatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
    bet: u64,
    standing: bool,
    bust: bool,
    blackjack: bool,
    doubled: bool,
}

impl Hand {
    pub fn new() -> Self {
        Self::with_bet(0)
    }

    pub fn with_bet(bet: u64) -> Self {
        Self {
            cards: Vec::new(),
            bet,
            standing: false,
            bust: false,
            blackjack: false,
            doubled: false,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn bet(&self) -> u64 {
        self.bet
    }

    pub fn value(&self) -> u8 {
        calculate_hand_value(&self.cards)
    }

    pub fn is_soft(&self) -> bool {
        is_soft_hand(&self.cards)
    }

    pub fn is_bust(&self) -> bool {
        self.bust
    }

    pub fn is_blackjack(&self) -> bool {
        self.blackjack
    }

    pub fn is_standing(&self) -> bool {
        self.standing
    }

    pub fn is_doubled(&self) -> bool {
        self.doubled
    }

    /// Neither standing nor bust.
    pub fn is_playable(&self) -> bool {
        !self.standing && !self.bust
    }

    pub fn is_finished(&self) -> bool {
        !self.is_playable()
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
        self.refresh();
        if self.value() == 21 {
            self.standing = true;
        }
    }

    pub fn stand(&mut self) {
        self.standing = true;
    }

    pub fn can_split(&self) -> bool {
        self.cards.len() == 2 && can_split_cards(&self.cards[0], &self.cards[1])
    }

    pub fn can_double(&self) -> bool {
        self.cards.len() == 2 && !self.doubled
    }

    /// Moves the second card of a splittable pair into a new hand carrying
    /// the same bet. Returns `None` and leaves the hand alone otherwise.
    pub fn split_off(&mut self) -> Option<Hand> {
        if !self.can_split() {
            return None;
        }
        let second = self.cards.pop()?;
        self.refresh();

        let mut new_hand = Hand::with_bet(self.bet);
        new_hand.cards.push(second);
        new_hand.refresh();
        Some(new_hand)
    }

    /// Doubles the bet, takes exactly one card and stands whatever the
    /// result. Returns `false` without changes when doubling is not allowed.
    pub fn double_down(&mut self, card: Card) -> bool {
        if !self.can_double() {
            return false;
        }
        self.doubled = true;
        self.bet = self.bet.saturating_mul(2);
        self.add_card(card);
        self.standing = true;
        true
    }

    pub fn status(&self) -> HandStatus {
        if self.bust {
            HandStatus::Bust
        } else if self.blackjack {
            HandStatus::Blackjack
        } else if self.standing {
            HandStatus::Standing
        } else {
            HandStatus::Playing
        }
    }

    fn refresh(&mut self) {
        let value = self.value();
        self.bust = value > 21;
        self.blackjack = self.cards.len() == 2 && value == 21;
    }
}

impl Default for Hand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Rank, Suit};

    fn card(rank: Rank) -> Card {
        Card::new(rank, Suit::Spades)
    }

    fn hand_of(ranks: &[Rank]) -> Hand {
        let mut hand = Hand::with_bet(100);
        for &rank in ranks {
            hand.add_card(card(rank));
        }
        hand
    }

    #[test]
    fn test_calculate_hand_value_simple() {
        let cards = vec![card(Rank::Two), card(Rank::Three)];
        assert_eq!(calculate_hand_value(&cards), 5);
    }

    #[test]
    fn test_calculate_hand_value_with_face_cards() {
        let cards = vec![card(Rank::King), card(Rank::Queen)];
        assert_eq!(calculate_hand_value(&cards), 20);
    }

    #[test]
    fn test_calculate_hand_value_soft_ace() {
        let cards = vec![card(Rank::Ace), card(Rank::Six)];
        assert_eq!(calculate_hand_value(&cards), 17);
    }

    #[test]
    fn test_calculate_hand_value_hard_ace() {
        let cards = vec![card(Rank::Ace), card(Rank::Six), card(Rank::Nine)];
        assert_eq!(calculate_hand_value(&cards), 16);
    }

    #[test]
    fn test_calculate_hand_value_multiple_aces() {
        let cards = vec![card(Rank::Ace), card(Rank::Ace), card(Rank::Nine)];
        assert_eq!(calculate_hand_value(&cards), 21);

        let cards = vec![card(Rank::Ace); 4];
        assert_eq!(calculate_hand_value(&cards), 14);
    }

    #[test]
    fn test_bust_only_when_all_aces_downgraded() {
        // A A K K: 1 + 1 + 10 + 10 = 22 even with every ace at 1
        let cards = vec![card(Rank::Ace), card(Rank::Ace), card(Rank::King), card(Rank::King)];
        assert_eq!(calculate_hand_value(&cards), 22);
        assert!(is_busted(&cards));

        // A A K 9: 21 with both aces at 1
        let cards = vec![card(Rank::Ace), card(Rank::Ace), card(Rank::King), card(Rank::Nine)];
        assert_eq!(calculate_hand_value(&cards), 21);
        assert!(!is_busted(&cards));
    }

    #[test]
    fn test_is_blackjack() {
        assert!(is_blackjack(&[card(Rank::Ace), card(Rank::King)]));
        assert!(!is_blackjack(&[card(Rank::Seven), card(Rank::Seven), card(Rank::Seven)]));
        assert!(!is_blackjack(&[card(Rank::King), card(Rank::Queen)]));
    }

    #[test]
    fn test_is_soft_hand() {
        assert!(is_soft_hand(&[card(Rank::Ace), card(Rank::Six)]));
        assert!(!is_soft_hand(&[card(Rank::Ace), card(Rank::Six), card(Rank::Nine)]));
        assert!(!is_soft_hand(&[card(Rank::King), card(Rank::Queen)]));
    }

    #[test]
    fn test_can_split_cards() {
        assert!(can_split_cards(&card(Rank::Eight), &Card::new(Rank::Eight, Suit::Hearts)));
        assert!(!can_split_cards(&card(Rank::Eight), &card(Rank::Nine)));
        // Same value, different rank
        assert!(!can_split_cards(&card(Rank::King), &card(Rank::Queen)));
    }

    #[test]
    fn test_add_card_updates_flags() {
        let mut hand = hand_of(&[Rank::King, Rank::Six]);
        assert!(hand.is_playable());
        assert_eq!(hand.status(), HandStatus::Playing);

        hand.add_card(card(Rank::Nine));
        assert!(hand.is_bust());
        assert!(!hand.is_standing());
        assert_eq!(hand.status(), HandStatus::Bust);
    }

    #[test]
    fn test_natural_is_blackjack_and_standing() {
        let hand = hand_of(&[Rank::Ace, Rank::King]);
        assert!(hand.is_blackjack());
        assert!(hand.is_standing());
        assert!(!hand.is_playable());
        assert_eq!(hand.status(), HandStatus::Blackjack);
    }

    #[test]
    fn test_three_card_21_auto_stands_without_blackjack() {
        let hand = hand_of(&[Rank::Seven, Rank::Seven, Rank::Seven]);
        assert_eq!(hand.value(), 21);
        assert!(hand.is_standing());
        assert!(!hand.is_blackjack());
        assert!(!hand.is_bust());
        assert_eq!(hand.status(), HandStatus::Standing);
    }

    #[test]
    fn test_can_split_only_with_two_cards() {
        let mut hand = hand_of(&[Rank::Eight, Rank::Eight]);
        assert!(hand.can_split());
        hand.add_card(card(Rank::Two));
        assert!(!hand.can_split());
    }

    #[test]
    fn test_split_off() {
        let mut hand = Hand::with_bet(100);
        hand.add_card(Card::new(Rank::Eight, Suit::Hearts));
        hand.add_card(Card::new(Rank::Eight, Suit::Spades));

        let new_hand = hand.split_off().unwrap();
        assert_eq!(hand.cards(), &[Card::new(Rank::Eight, Suit::Hearts)]);
        assert_eq!(new_hand.cards(), &[Card::new(Rank::Eight, Suit::Spades)]);
        assert_eq!(new_hand.bet(), 100);
        assert!(new_hand.is_playable());
    }

    #[test]
    fn test_split_off_rejected_for_unpaired_hand() {
        let mut hand = hand_of(&[Rank::King, Rank::Queen]);
        assert!(hand.split_off().is_none());
        assert_eq!(hand.cards().len(), 2);
    }

    #[test]
    fn test_double_down() {
        let mut hand = hand_of(&[Rank::Six, Rank::Four]);
        assert!(hand.can_double());
        assert!(hand.double_down(card(Rank::King)));
        assert_eq!(hand.bet(), 200);
        assert_eq!(hand.value(), 20);
        assert!(hand.is_doubled());
        assert!(hand.is_standing());
        assert!(!hand.can_double());
    }

    #[test]
    fn test_double_down_bust_still_stands() {
        let mut hand = hand_of(&[Rank::King, Rank::Six]);
        assert!(hand.double_down(card(Rank::Nine)));
        assert!(hand.is_bust());
        assert!(hand.is_standing());
    }

    #[test]
    fn test_cannot_double_three_cards() {
        let mut hand = hand_of(&[Rank::Two, Rank::Three, Rank::Four]);
        assert!(!hand.can_double());
        assert!(!hand.double_down(card(Rank::King)));
        assert_eq!(hand.bet(), 100);
        assert_eq!(hand.cards().len(), 3);
    }
}
