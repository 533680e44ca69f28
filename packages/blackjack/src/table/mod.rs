//! The round engine for a single table.
//!
//! A round moves `Betting -> Playing -> DealerResolving -> Settled`, and
//! `start_next_round` goes back to `Betting`. Every command checks its
//! preconditions first; a command that returns `Err` has changed nothing.

mod round;

pub use round::{Round, Seat, TurnPointer};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

use crate::{
    calculate_hand_value, resolve_hand, Card, Hand, Player, PlayerId, RulesError, SaveReport,
    Settlement, SettlementRecord, SettlementSink, Shoe, TableError, TableRules,
};

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    Betting,
    Playing,
    DealerResolving,
    Settled,
}

/// Result of `Table::advance_turn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved(TurnPointer),
    /// The pointer is on the last finished hand; the dealer may now play.
    AllHandsDone,
}

/// Dealer hand as it may be shown: the hole card stays `None` until the
/// dealer is revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealerView {
    pub cards: Vec<Option<Card>>,
    pub total: u8,
    pub hole_hidden: bool,
}

pub struct Table {
    rules: TableRules,
    shoe: Shoe,
    players: BTreeMap<PlayerId, Player>,
    next_player_id: u32,
    wagers: BTreeMap<PlayerId, u64>,
    phase: RoundPhase,
    round: Option<Round>,
    settlement: Option<Settlement>,
}

impl Table {
    pub fn new(rules: TableRules) -> Result<Self, RulesError> {
        let shoe = Shoe::from_rules(&rules);
        Self::with_shoe(rules, shoe)
    }

    pub fn with_shoe(rules: TableRules, shoe: Shoe) -> Result<Self, RulesError> {
        rules.validate()?;
        Ok(Self {
            rules,
            shoe,
            players: BTreeMap::new(),
            next_player_id: 0,
            wagers: BTreeMap::new(),
            phase: RoundPhase::Betting,
            round: None,
            settlement: None,
        })
    }

    // ── Queries ──

    pub fn rules(&self) -> &TableRules {
        &self.rules
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    pub fn shoe_remaining(&self) -> usize {
        self.shoe.remaining()
    }

    /// Seated players in seat order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn bankroll(&self, id: PlayerId) -> Option<u64> {
        self.players.get(&id).map(|p| p.bankroll)
    }

    /// Every seated player's current chips, in seat order.
    pub fn stacks(&self) -> Vec<(PlayerId, &str, u64)> {
        self.players
            .values()
            .map(|p| (p.id, p.name.as_str(), p.bankroll))
            .collect()
    }

    pub fn wager(&self, id: PlayerId) -> Option<u64> {
        self.wagers.get(&id).copied()
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// The full dealer hand, hole card included.
    pub fn dealer_hand(&self) -> Option<&Hand> {
        self.round.as_ref().map(Round::dealer)
    }

    pub fn dealer_view(&self) -> Option<DealerView> {
        let round = self.round.as_ref()?;
        let hole_hidden = !round.dealer_revealed;
        let cards: Vec<Option<Card>> = round
            .dealer()
            .cards()
            .iter()
            .enumerate()
            .map(|(i, card)| (!(hole_hidden && i == 1)).then_some(*card))
            .collect();
        let visible: Vec<Card> = cards.iter().flatten().copied().collect();
        Some(DealerView {
            total: calculate_hand_value(&visible),
            cards,
            hole_hidden,
        })
    }

    /// Hands of `player` in the current round; empty when not betting.
    pub fn hands(&self, player: PlayerId) -> &[Hand] {
        self.round
            .as_ref()
            .and_then(|r| r.seat_of(player))
            .map(|s| s.hands.as_slice())
            .unwrap_or(&[])
    }

    pub fn turn_pointer(&self) -> Option<TurnPointer> {
        self.playing_round().and_then(Round::pointer)
    }

    pub fn active_player(&self) -> Option<PlayerId> {
        self.playing_round().and_then(Round::active_player)
    }

    pub fn active_hand(&self) -> Option<&Hand> {
        self.playing_round().and_then(Round::active_hand)
    }

    pub fn all_hands_done(&self) -> bool {
        self.playing_round().is_some_and(Round::all_hands_done)
    }

    pub fn settlement(&self) -> Option<&Settlement> {
        self.settlement.as_ref()
    }

    pub fn can_hit(&self) -> bool {
        self.check_playable("hit").is_ok()
    }

    pub fn can_stand(&self) -> bool {
        self.check_playable("stand").is_ok()
    }

    pub fn can_double(&self) -> bool {
        self.check_double().is_ok()
    }

    pub fn can_split(&self) -> bool {
        self.check_split().is_ok()
    }

    pub fn can_advance(&self) -> bool {
        self.active_hand().is_some_and(Hand::is_finished)
    }

    pub fn can_go_back(&self) -> bool {
        self.playing_round().is_some_and(Round::has_previous_turn)
    }

    pub fn can_reveal_dealer(&self) -> bool {
        self.all_hands_done()
    }

    // ── Betting ──

    pub fn seat_player(&mut self, name: &str) -> Result<PlayerId, TableError> {
        self.expect_phase("seat a player", RoundPhase::Betting)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(TableError::EmptyName);
        }
        if self.players.len() >= self.rules.max_players {
            return Err(TableError::TableFull {
                max: self.rules.max_players,
            });
        }

        let id = PlayerId(self.next_player_id);
        self.next_player_id += 1;
        self.players
            .insert(id, Player::new(id, name, self.rules.starting_bankroll));
        log::info!(
            "Seated {name} ({id}) with {} chips",
            self.rules.starting_bankroll
        );
        Ok(id)
    }

    /// Records a wager for the next deal. An amount of zero sits the player out.
    pub fn place_bet(&mut self, player: PlayerId, amount: u64) -> Result<(), TableError> {
        self.expect_phase("place a bet", RoundPhase::Betting)?;
        let seated = self
            .players
            .get(&player)
            .ok_or(TableError::UnknownPlayer(player))?;

        if amount == 0 {
            self.wagers.remove(&player);
            return Ok(());
        }

        let min_bet = self.rules.min_bet;
        if seated.bankroll < min_bet {
            return Err(TableError::BankrollBelowMinimum {
                bankroll: seated.bankroll,
                min_bet,
            });
        }
        if amount < min_bet {
            return Err(TableError::BetBelowMinimum {
                bet: amount,
                min_bet,
            });
        }
        if !seated.can_cover(amount) {
            return Err(TableError::InsufficientBankroll {
                required: amount,
                available: seated.bankroll,
            });
        }

        self.wagers.insert(player, amount);
        Ok(())
    }

    /// Takes every pending wager and deals two cards to each betting player
    /// and to the dealer, one card at a time around the table.
    pub fn deal(&mut self) -> Result<(), TableError> {
        self.expect_phase("deal", RoundPhase::Betting)?;

        let min_bet = self.rules.min_bet;
        let bets: Vec<(PlayerId, u64)> = self
            .wagers
            .iter()
            .filter(|&(id, &bet)| {
                self.players
                    .get(id)
                    .is_some_and(|p| p.bankroll >= min_bet && p.can_cover(bet))
            })
            .map(|(&id, &bet)| (id, bet))
            .collect();
        if bets.is_empty() {
            return Err(TableError::NoBets { min_bet });
        }

        let mut seats = Vec::with_capacity(bets.len());
        for (id, bet) in bets {
            if let Some(player) = self.players.get_mut(&id) {
                player.bankroll -= bet;
                seats.push(Seat::new(id, bet));
            }
        }

        let mut round = Round::new(seats);
        for _ in 0..2 {
            for seat in &mut round.seats {
                seat.hands[0].add_card(self.shoe.deal());
            }
            round.dealer.add_card(self.shoe.deal());
        }

        log::info!(
            "Dealt round to {} players, dealer shows {}",
            round.seats.len(),
            round.dealer.cards()[0]
        );
        self.wagers.clear();
        self.settlement = None;
        self.round = Some(round);
        self.phase = RoundPhase::Playing;
        Ok(())
    }

    // ── Playing ──

    pub fn hit(&mut self) -> Result<Card, TableError> {
        self.check_playable("hit")?;
        let (hand, shoe) = self.active_hand_with_shoe()?;
        let card = shoe.deal();
        hand.add_card(card);
        log::debug!("Hit {card}: total {}", hand.value());
        Ok(card)
    }

    pub fn stand(&mut self) -> Result<(), TableError> {
        self.check_playable("stand")?;
        let (hand, _) = self.active_hand_with_shoe()?;
        hand.stand();
        log::debug!("Stand on {}", hand.value());
        Ok(())
    }

    /// Doubles the active hand's bet, draws exactly one card and stands.
    pub fn double(&mut self) -> Result<Card, TableError> {
        self.check_double()?;
        let player = self.active_player().ok_or(TableError::NoActiveHand)?;

        let (hand, shoe) = self.active_hand_with_shoe()?;
        if !hand.can_double() {
            return Err(TableError::CannotDouble);
        }
        let extra = hand.bet();
        let card = shoe.deal();
        hand.double_down(card);
        log::debug!("Double for {extra} more, drew {card}: total {}", hand.value());

        self.debit(player, extra);
        Ok(card)
    }

    /// Splits the active pair: the second card moves to a new hand right
    /// after the active one, each hand draws one card, and the player puts
    /// up a matching bet for the new hand.
    pub fn split(&mut self) -> Result<(), TableError> {
        self.check_split()?;
        let player = self.active_player().ok_or(TableError::NoActiveHand)?;

        let (hand, shoe) = self.active_hand_with_shoe()?;
        let mut new_hand = hand.split_off().ok_or(TableError::CannotSplit)?;
        hand.add_card(shoe.deal());
        new_hand.add_card(shoe.deal());
        let bet = new_hand.bet();

        if let Some(round) = self.round.as_mut() {
            round.insert_after_active(new_hand);
        }
        self.debit(player, bet);
        log::debug!("Split for {bet} more");
        Ok(())
    }

    /// Moves to the next hand, or reports that every hand is finished.
    /// Rejected while the active hand is still in play.
    pub fn advance_turn(&mut self) -> Result<Advance, TableError> {
        self.expect_phase("advance", RoundPhase::Playing)?;
        let round = self.round.as_mut().ok_or(TableError::NoActiveHand)?;
        let hand = round.active_hand().ok_or(TableError::NoActiveHand)?;
        if hand.is_playable() {
            return Err(TableError::HandInPlay);
        }

        if round.move_next() {
            let pointer = round.pointer().ok_or(TableError::NoActiveHand)?;
            log::debug!(
                "Turn moved to player {} hand {}",
                pointer.player_index,
                pointer.hand_index
            );
            Ok(Advance::Moved(pointer))
        } else {
            Ok(Advance::AllHandsDone)
        }
    }

    pub fn previous_hand(&mut self) -> Result<TurnPointer, TableError> {
        self.expect_phase("go back", RoundPhase::Playing)?;
        let round = self.round.as_mut().ok_or(TableError::NoActiveHand)?;
        if !round.move_previous() {
            return Err(TableError::AtFirstHand);
        }
        round.pointer().ok_or(TableError::NoActiveHand)
    }

    // ── Dealer and settlement ──

    /// Reveals the hole card and draws while the dealer is below the stand
    /// threshold. A no-op once the dealer has already played.
    pub fn reveal_dealer(&mut self) -> Result<(), TableError> {
        match self.phase {
            RoundPhase::DealerResolving | RoundPhase::Settled => return Ok(()),
            RoundPhase::Betting => {
                return Err(TableError::WrongPhase {
                    action: "reveal the dealer",
                    phase: self.phase,
                })
            }
            RoundPhase::Playing => {}
        }

        let round = self.round.as_mut().ok_or(TableError::NoActiveHand)?;
        if !round.all_hands_done() {
            return Err(TableError::HandsInPlay);
        }

        round.dealer_revealed = true;
        while round.dealer.value() < self.rules.dealer_stands_on {
            round.dealer.add_card(self.shoe.deal());
        }
        log::info!(
            "Dealer reveals {} cards for {}",
            round.dealer.cards().len(),
            round.dealer.value()
        );
        self.phase = RoundPhase::DealerResolving;
        Ok(())
    }

    /// Pays every hand against the dealer exactly once. Calling it again
    /// after settlement returns the same settlement and pays nothing.
    pub fn settle(&mut self) -> Result<&Settlement, TableError> {
        if self.phase == RoundPhase::Settled {
            return self.settlement.as_ref().ok_or(TableError::WrongPhase {
                action: "settle",
                phase: self.phase,
            });
        }
        self.expect_phase("settle", RoundPhase::DealerResolving)?;
        let round = self.round.as_ref().ok_or(TableError::NoActiveHand)?;

        let dealer = round.dealer();
        let mut resolved = Vec::new();
        for seat in round.seats() {
            for (hand_index, hand) in seat.hands.iter().enumerate() {
                let resolution = resolve_hand(hand, dealer, self.rules.blackjack_payout);
                resolved.push((seat.player, hand_index, hand, resolution));
            }
        }

        for (player, _, _, resolution) in &resolved {
            if let Some(p) = self.players.get_mut(player) {
                p.bankroll = p.bankroll.saturating_add(resolution.payout);
            }
        }

        let timestamp = OffsetDateTime::now_utc();
        let records: Vec<SettlementRecord> = resolved
            .into_iter()
            .map(|(player, hand_index, hand, resolution)| {
                let seated = self.players.get(&player);
                SettlementRecord {
                    timestamp,
                    player_id: player,
                    player_name: seated.map(|p| p.name.clone()).unwrap_or_default(),
                    hand_index,
                    bet: hand.bet(),
                    result: resolution.result,
                    payout: resolution.payout,
                    final_bankroll: seated.map(|p| p.bankroll).unwrap_or_default(),
                    player_cards: hand.cards().to_vec(),
                    dealer_cards: dealer.cards().to_vec(),
                    player_value: hand.value(),
                    dealer_value: dealer.value(),
                }
            })
            .collect();

        let settlement = Settlement {
            settled_at: timestamp,
            records,
        };
        log::info!(
            "Settled {} hands, paid {} chips",
            settlement.records.len(),
            settlement.total_payout()
        );
        self.phase = RoundPhase::Settled;
        let settlement: &Settlement = self.settlement.insert(settlement);
        Ok(settlement)
    }

    pub fn reveal_dealer_and_resolve(&mut self) -> Result<&Settlement, TableError> {
        self.reveal_dealer()?;
        self.settle()
    }

    /// Clears the finished round. Bankrolls carry over.
    pub fn start_next_round(&mut self) -> Result<(), TableError> {
        self.expect_phase("start the next round", RoundPhase::Settled)?;
        self.round = None;
        self.settlement = None;
        self.wagers.clear();
        self.phase = RoundPhase::Betting;
        log::info!("Table open for bets");
        Ok(())
    }

    /// Hands the settled round to `sink`. Table state is never affected.
    pub fn save_settlement<S: SettlementSink>(&self, sink: &mut S) -> SaveReport {
        let Some(settlement) = self.settlement.as_ref() else {
            return SaveReport::failed("No settled round to save.");
        };
        match sink.record(&settlement.records) {
            Ok(()) => SaveReport::saved(format!(
                "Saved round ({} hands).",
                settlement.records.len()
            )),
            Err(e) => {
                log::warn!("Failed to save round: {e}");
                SaveReport::failed(format!("Failed to save round: {e}"))
            }
        }
    }

    // ── Helpers ──

    fn expect_phase(&self, action: &'static str, phase: RoundPhase) -> Result<(), TableError> {
        if self.phase != phase {
            return Err(TableError::WrongPhase {
                action,
                phase: self.phase,
            });
        }
        Ok(())
    }

    fn playing_round(&self) -> Option<&Round> {
        match self.phase {
            RoundPhase::Playing => self.round.as_ref(),
            _ => None,
        }
    }

    fn active_hand_with_shoe(&mut self) -> Result<(&mut Hand, &mut Shoe), TableError> {
        let hand = self
            .round
            .as_mut()
            .and_then(Round::active_hand_mut)
            .ok_or(TableError::NoActiveHand)?;
        Ok((hand, &mut self.shoe))
    }

    fn active_bankroll(&self) -> u64 {
        self.active_player()
            .and_then(|id| self.bankroll(id))
            .unwrap_or(0)
    }

    fn debit(&mut self, player: PlayerId, amount: u64) {
        if let Some(p) = self.players.get_mut(&player) {
            p.bankroll = p.bankroll.saturating_sub(amount);
        }
    }

    fn check_playable(&self, action: &'static str) -> Result<&Hand, TableError> {
        self.expect_phase(action, RoundPhase::Playing)?;
        let hand = self.active_hand().ok_or(TableError::NoActiveHand)?;
        if !hand.is_playable() {
            return Err(TableError::HandNotPlayable);
        }
        Ok(hand)
    }

    fn check_double(&self) -> Result<(), TableError> {
        let hand = self.check_playable("double")?;
        if !hand.can_double() {
            return Err(TableError::CannotDouble);
        }
        let available = self.active_bankroll();
        if available < hand.bet() {
            return Err(TableError::InsufficientBankroll {
                required: hand.bet(),
                available,
            });
        }
        Ok(())
    }

    fn check_split(&self) -> Result<(), TableError> {
        let hand = self.check_playable("split")?;
        if !hand.can_split() {
            return Err(TableError::CannotSplit);
        }
        let held = self
            .playing_round()
            .and_then(Round::active_seat)
            .map_or(0, |s| s.hands.len());
        if held >= self.rules.max_hands_per_player {
            return Err(TableError::HandLimitReached {
                max: self.rules.max_hands_per_player,
            });
        }
        let available = self.active_bankroll();
        if available < hand.bet() {
            return Err(TableError::InsufficientBankroll {
                required: hand.bet(),
                available,
            });
        }
        Ok(())
    }
}
