use rand::seq::SliceRandom;
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

use crate::{Card, TableRules};

/// The dealing shoe: several standard decks shuffled together.
///
/// Cards are dealt from the end of `cards`. Whenever fewer than
/// `reshuffle_threshold` cards remain before a draw, the shoe is rebuilt
/// from scratch and reshuffled; nothing about the previous shoe survives.
#[derive(Debug, Clone)]
pub struct Shoe {
    cards: Vec<Card>,
    num_decks: u8,
    reshuffle_threshold: usize,
    rng: ChaCha8Rng,
    rebuilds: u64,
}

impl Shoe {
    pub fn new(num_decks: u8, reshuffle_threshold: usize) -> Self {
        Self::seeded(num_decks, reshuffle_threshold, rand::random())
    }

    pub fn seeded(num_decks: u8, reshuffle_threshold: usize, seed: u64) -> Self {
        let mut shoe = Self {
            cards: Vec::new(),
            num_decks: num_decks.max(1),
            reshuffle_threshold,
            rng: ChaCha8Rng::seed_from_u64(seed),
            rebuilds: 0,
        };
        shoe.fill();
        shoe
    }

    pub fn from_rules(rules: &TableRules) -> Self {
        Self::new(rules.num_decks, rules.reshuffle_threshold)
    }

    /// Fresh shoe with `top` placed on top, `top[0]` dealt first.
    pub fn stacked(num_decks: u8, reshuffle_threshold: usize, seed: u64, top: &[Card]) -> Self {
        let mut shoe = Self::seeded(num_decks, reshuffle_threshold, seed);
        shoe.cards.extend(top.iter().rev().copied());
        shoe
    }

    /// Draws the top card, rebuilding first when the shoe runs low.
    pub fn deal(&mut self) -> Card {
        if self.cards.len() < self.reshuffle_threshold.max(1) {
            self.rebuild();
        }
        self.cards
            .pop()
            .expect("a rebuilt shoe holds at least one full deck")
    }

    pub fn rebuild(&mut self) {
        self.fill();
        self.rebuilds += 1;
        log::debug!(
            "Rebuilt shoe: {} decks, {} cards",
            self.num_decks,
            self.cards.len()
        );
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn num_decks(&self) -> u8 {
        self.num_decks
    }

    /// Number of times the shoe has been rebuilt after construction.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    fn fill(&mut self) {
        self.cards.clear();
        for _ in 0..self.num_decks {
            self.cards.extend(Card::standard_deck());
        }
        self.cards.shuffle(&mut self.rng);
    }
}
