use std::fmt;
use std::str::FromStr;

pub const HELP: &str = "\
Commands:
  bet <seat|name> <amount>  place a wager (0 sits the player out)
  deal                      take the wagers and deal
  hit | stand | double | split
  next | prev               move between hands
  reveal                    dealer plays and the round settles
  save                      save the settled round
  save-round                save, then start the next round
  round                     start the next round without saving
  stacks                    show every player's chips
  history [n]               list the last n saved hands (default 20)
  restart                   reseat everyone with fresh chips and a new shoe
  show                      redraw the table
  help | quit";

/// A seat as typed by the user: 1-based seat number or player name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatRef {
    Number(usize),
    Name(String),
}

impl fmt::Display for SeatRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatRef::Number(n) => write!(f, "seat {n}"),
            SeatRef::Name(name) => write!(f, "'{name}'"),
        }
    }
}

/// Saved hands listed by `history` when no count is given.
pub const DEFAULT_HISTORY: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Bet { seat: SeatRef, amount: u64 },
    Deal,
    Hit,
    Stand,
    Double,
    Split,
    Next,
    Prev,
    Reveal,
    Save,
    SaveRound,
    Round,
    Stacks,
    History(usize),
    Restart,
    Show,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&verb, args)) = words.split_first() else {
            return Err("Type `help` for commands".to_string());
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "bet" => return parse_bet(args),
            "history" => return parse_history(args),
            "deal" => Command::Deal,
            "hit" | "h" => Command::Hit,
            "stand" | "s" => Command::Stand,
            "double" | "d" => Command::Double,
            "split" => Command::Split,
            "next" | "n" => Command::Next,
            "prev" | "p" => Command::Prev,
            "reveal" => Command::Reveal,
            "save" => Command::Save,
            "save-round" => Command::SaveRound,
            "round" => Command::Round,
            "stacks" => Command::Stacks,
            "restart" => Command::Restart,
            "show" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("Unknown command '{other}'. Type `help` for commands")),
        };
        if !args.is_empty() {
            return Err(format!("`{verb}` takes no arguments"));
        }
        Ok(command)
    }
}

fn parse_bet(args: &[&str]) -> Result<Command, String> {
    let usage = || "Usage: bet <seat|name> <amount>".to_string();
    let (amount, seat) = args.split_last().ok_or_else(usage)?;
    if seat.is_empty() {
        return Err(usage());
    }
    let amount: u64 = amount
        .parse()
        .map_err(|_| format!("Invalid amount '{amount}'"))?;

    let seat = match seat {
        [single] => match single.parse::<usize>() {
            Ok(n) => SeatRef::Number(n),
            Err(_) => SeatRef::Name(single.to_string()),
        },
        words => SeatRef::Name(words.join(" ")),
    };
    Ok(Command::Bet { seat, amount })
}

fn parse_history(args: &[&str]) -> Result<Command, String> {
    match args {
        [] => Ok(Command::History(DEFAULT_HISTORY)),
        [count] => match count.parse::<usize>() {
            Ok(n) if n > 0 => Ok(Command::History(n)),
            _ => Err(format!("Invalid count '{count}'")),
        },
        _ => Err("Usage: history [n]".to_string()),
    }
}
