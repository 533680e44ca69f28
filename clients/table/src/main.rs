mod command;
mod recorder;
mod render;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use blackjack::{Advance, PayoutRatio, PlayerId, Shoe, Table, TableError, TableRules};
use clap::Parser;

use command::{Command, SeatRef, HELP};
use recorder::JsonLinesRecorder;

type BoxErr = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(name = "blackjack-table", about = "Casino blackjack table for up to six players")]
struct Cli {
    /// Seat a player (repeat for more seats, in seat order)
    #[arg(long = "player", value_name = "NAME")]
    players: Vec<String>,

    /// JSON file with table rules; missing fields keep their defaults
    #[arg(long, env = "BLACKJACK_CONFIG")]
    config: Option<PathBuf>,

    /// Decks in the shoe
    #[arg(long)]
    decks: Option<u8>,

    /// Minimum bet
    #[arg(long)]
    min_bet: Option<u64>,

    /// Chips each player starts with
    #[arg(long)]
    starting_bankroll: Option<u64>,

    /// Blackjack payout ratio (e.g. "3:2")
    #[arg(long)]
    blackjack_payout: Option<PayoutRatio>,

    /// Seed for the shoe shuffle, for replayable sessions
    #[arg(long, env = "BLACKJACK_SEED")]
    seed: Option<u64>,

    /// File that saved rounds are appended to
    #[arg(long, env = "BLACKJACK_RECORD", default_value = "rounds.jsonl")]
    record: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn load_rules(cli: &Cli) -> Result<TableRules, BoxErr> {
    let mut rules = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
            let rules: TableRules = serde_json::from_str(&text)
                .map_err(|e| format!("Invalid rules in {}: {e}", path.display()))?;
            log::info!("Loaded table rules from {}", path.display());
            rules
        }
        None => TableRules::default(),
    };

    if let Some(decks) = cli.decks {
        rules.num_decks = decks;
    }
    if let Some(min_bet) = cli.min_bet {
        rules.min_bet = min_bet;
    }
    if let Some(bankroll) = cli.starting_bankroll {
        rules.starting_bankroll = bankroll;
    }
    if let Some(ratio) = cli.blackjack_payout {
        rules.blackjack_payout = ratio;
    }

    rules.validate()?;
    Ok(rules)
}

fn run(cli: Cli) -> Result<(), BoxErr> {
    let rules = load_rules(&cli)?;
    log::info!(
        "Opening table: {} decks, minimum bet {}, blackjack pays {}:{}",
        rules.num_decks,
        rules.min_bet,
        rules.blackjack_payout.numerator,
        rules.blackjack_payout.denominator
    );
    let names = if cli.players.is_empty() {
        vec!["Player 1".to_string()]
    } else {
        cli.players.clone()
    };
    let mut session = Session::open(rules, cli.seed, names, JsonLinesRecorder::new(&cli.record))?;
    log::info!("Saved rounds go to {}", session.recorder.path().display());
    println!("{}", render::table(&session.table));
    println!("Type `help` for commands.");

    let stdin = io::stdin();
    prompt()?;
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            prompt()?;
            continue;
        }
        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => session.execute(command),
            Err(msg) => println!("{msg}"),
        }
        prompt()?;
    }

    println!("{}", render::stacks(&session.table));
    Ok(())
}

fn prompt() -> io::Result<()> {
    print!("> ");
    io::stdout().flush()
}

/// One sitting at the table: the live table plus what is needed to open
/// it again from scratch.
struct Session {
    rules: TableRules,
    seed: Option<u64>,
    names: Vec<String>,
    table: Table,
    recorder: JsonLinesRecorder,
}

impl Session {
    fn open(
        rules: TableRules,
        seed: Option<u64>,
        names: Vec<String>,
        recorder: JsonLinesRecorder,
    ) -> Result<Self, BoxErr> {
        let table = open_table(rules, seed, &names)?;
        Ok(Self {
            rules,
            seed,
            names,
            table,
            recorder,
        })
    }

    /// Throws away the current table, bankrolls and shoe included, and
    /// seats the same players again.
    fn restart(&mut self) -> Result<(), BoxErr> {
        self.table = open_table(self.rules, self.seed, &self.names)?;
        log::info!("Table restarted with {} players", self.names.len());
        Ok(())
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::History(limit) => {
                match self.recorder.recent(limit) {
                    Ok(entries) => println!("{}", render::history(&entries)),
                    Err(e) => println!("Failed to read {}: {e}", self.recorder.path().display()),
                }
                return;
            }
            Command::Restart => {
                match self.restart() {
                    Ok(()) => println!("{}", render::table(&self.table)),
                    Err(e) => println!("{e}"),
                }
                return;
            }
            _ => {}
        }

        let table = &mut self.table;
        let outcome: Result<(), TableError> = match command {
            Command::Bet { seat, amount } => match find_seat(table, &seat) {
                Some(id) => table.place_bet(id, amount),
                None => {
                    println!("No player at {seat}");
                    return;
                }
            },
            Command::Deal => table.deal(),
            Command::Hit => table.hit().map(|card| println!("Drew {card}")),
            Command::Stand => table.stand(),
            Command::Double => table.double().map(|card| println!("Doubled, drew {card}")),
            Command::Split => table.split(),
            Command::Next => table.advance_turn().map(|advance| {
                if advance == Advance::AllHandsDone {
                    println!("No more hands to play.");
                }
            }),
            Command::Prev => table.previous_hand().map(|_| ()),
            Command::Reveal => table
                .reveal_dealer_and_resolve()
                .map(|settlement| println!("{}", render::settlement(settlement))),
            Command::Save => {
                println!("{}", table.save_settlement(&mut self.recorder).message);
                return;
            }
            Command::SaveRound => {
                let report = table.save_settlement(&mut self.recorder);
                println!("{}", report.message);
                if !report.saved {
                    return;
                }
                table.start_next_round()
            }
            Command::Round => table.start_next_round(),
            Command::Stacks => {
                println!("{}", render::stacks(table));
                return;
            }
            Command::Show => Ok(()),
            Command::Help => {
                println!("{HELP}");
                return;
            }
            Command::History(_) | Command::Restart | Command::Quit => return,
        };

        match outcome {
            Ok(()) => println!("{}", render::table(table)),
            Err(e) => println!("{e}"),
        }
    }
}

fn open_table(rules: TableRules, seed: Option<u64>, names: &[String]) -> Result<Table, BoxErr> {
    let shoe = match seed {
        Some(seed) => Shoe::seeded(rules.num_decks, rules.reshuffle_threshold, seed),
        None => Shoe::from_rules(&rules),
    };
    let mut table = Table::with_shoe(rules, shoe)?;
    for name in names {
        table.seat_player(name)?;
    }
    Ok(table)
}

/// Seats are numbered from 1; names match case-insensitively.
fn find_seat(table: &Table, seat: &SeatRef) -> Option<PlayerId> {
    match seat {
        SeatRef::Number(n) => table
            .players()
            .nth(n.checked_sub(1)?)
            .map(|p| p.id),
        SeatRef::Name(name) => table
            .players()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .map(|p| p.id),
    }
}
