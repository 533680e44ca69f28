//! Plain-text views of the table for the terminal.

use blackjack::{Card, DealerView, Hand, RoundPhase, Settlement, SettlementRecord, Table};

const HIDDEN: &str = "??";

pub fn cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(Card::to_display)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn dealer(view: &DealerView) -> String {
    let shown: Vec<String> = view
        .cards
        .iter()
        .map(|c| c.map_or_else(|| HIDDEN.to_string(), |c| c.to_display()))
        .collect();
    format!("Dealer: {} ({})", shown.join(" "), view.total)
}

pub fn hand(hand: &Hand) -> String {
    let soft = if hand.is_playable() && hand.is_soft() {
        "soft "
    } else {
        ""
    };
    let mut line = format!(
        "{} ({soft}{}) bet {}",
        cards(hand.cards()),
        hand.value(),
        hand.bet()
    );
    if hand.is_doubled() {
        line.push_str(" doubled");
    }
    let status = hand.status().label();
    if !status.is_empty() {
        line.push_str(" - ");
        line.push_str(status);
    }
    line
}

pub fn table(table: &Table) -> String {
    let mut lines = vec![format!(
        "== {:?} == shoe: {} cards",
        table.phase(),
        table.shoe_remaining()
    )];

    if let Some(view) = table.dealer_view() {
        lines.push(dealer(&view));
    }

    let pointer = table.turn_pointer();
    let settlement = table.settlement();
    for (seat_no, player) in table.players().enumerate() {
        let mut header = format!("[{}] {} - bankroll {}", seat_no + 1, player.name, player.bankroll);
        if table.phase() == RoundPhase::Betting {
            match table.wager(player.id) {
                Some(bet) => header.push_str(&format!(", bet {bet}")),
                None if player.bankroll < table.rules().min_bet => header.push_str(", out"),
                None => {}
            }
        } else if let Some(seat) = table.round().and_then(|r| r.seat_of(player.id)) {
            header.push_str(&format!(", in play {}", seat.total_bet()));
        }
        lines.push(header);

        let player_index = table
            .round()
            .and_then(|r| r.seats().iter().position(|s| s.player == player.id));
        for (hand_index, h) in table.hands(player.id).iter().enumerate() {
            let active = pointer.is_some_and(|p| {
                Some(p.player_index) == player_index && p.hand_index == hand_index
            });
            let marker = if active { ">" } else { " " };
            let mut line = format!(" {marker} hand {}: {}", hand_index + 1, hand(h));
            if let Some(record) = settlement.and_then(|s| {
                s.for_player(player.id)
                    .find(|r| r.hand_index == hand_index)
            }) {
                line.push_str(&format!(" => {} ({})", record.result.label(), record.payout));
            }
            lines.push(line);
        }
    }

    if table.can_reveal_dealer() {
        lines.push("All hands finished. Type `reveal` for the dealer.".to_string());
    }
    lines.join("\n")
}

pub fn settlement(settlement: &Settlement) -> String {
    let mut lines = vec!["Round settled:".to_string()];
    for record in &settlement.records {
        lines.push(format!(
            "  {} hand {}: {} vs {} - {}, paid {} (bankroll {})",
            record.player_name,
            record.hand_index + 1,
            record.player_value,
            record.dealer_value,
            record.result.label(),
            record.payout,
            record.final_bankroll
        ));
    }
    lines.join("\n")
}

/// Saved hands, newest first, as `(line number, record)` pairs.
pub fn history(entries: &[(usize, SettlementRecord)]) -> String {
    if entries.is_empty() {
        return "No saved rounds yet.".to_string();
    }
    let mut lines = vec![format!(
        "{:>5}  {:<25}  {:<12}  {:>4}  {:>8}  {:<18}  {:>8}  {:>10}",
        "id", "ts", "player", "hand", "bet", "result", "payout", "bankroll"
    )];
    for (id, r) in entries {
        lines.push(format!(
            "{:>5}  {:<25}  {:<12}  {:>4}  {:>8}  {:<18}  {:>8}  {:>10}",
            id,
            r.timestamp.to_string(),
            r.player_name,
            r.hand_index + 1,
            r.bet,
            r.result.code(),
            r.payout,
            r.final_bankroll
        ));
    }
    lines.join("\n")
}

pub fn stacks(table: &Table) -> String {
    table
        .stacks()
        .into_iter()
        .enumerate()
        .map(|(seat_no, (_, name, bankroll))| format!("[{}] {name}: {bankroll}", seat_no + 1))
        .collect::<Vec<_>>()
        .join("\n")
}
