//! Line-oriented command loop used by the `chess_ai` binary.
//!
//! Commands (one per line):
//! - `position startpos|fen <fen> [moves <m1> <m2> ...]`
//! - `go [depth <n>] [movetime <ms>]`
//! - `eval`
//! - `suggest <square>`
//! - `difficulty [easy|medium|hard]`
//! - `setoption name <name> [value <value>]`
//! - `undo`, `start`, `stop`, `isready`, `quit`

use std::fmt;
use std::io::{self, BufRead, Write};
use std::time::Duration;

use cozy_chess::Board;
use log::{debug, warn};

use crate::config::{parse_setoption, AiConfig, AppliedOption};
use crate::decision::DecisionPolicy;
use crate::error::{FenError, MoveParseError};
use crate::limits::SearchLimit;
use crate::rules::{game_outcome, GameOutcome, Rules, StandardRules};
use crate::types::Square;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    InvalidFen(FenError),
    InvalidMove {
        move_str: String,
        error: MoveParseError,
    },
    MissingParts(&'static str),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::InvalidFen(e) => write!(f, "{e}"),
            CommandError::InvalidMove { move_str, error } => {
                write!(f, "Invalid move '{move_str}': {error}")
            }
            CommandError::MissingParts(usage) => write!(f, "Usage: {usage}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<FenError> for CommandError {
    fn from(e: FenError) -> Self {
        CommandError::InvalidFen(e)
    }
}

/// Positions reached by a `position` command, oldest first. Never empty.
pub fn parse_position_command(parts: &[&str]) -> Result<Vec<Board>, CommandError> {
    const USAGE: &str = "position startpos|fen <fen> [moves ...]";
    let rules = StandardRules;
    let mut i = 1;

    let start = match parts.get(i) {
        Some(&"startpos") => {
            i += 1;
            rules.startpos()
        }
        Some(&"fen") => {
            let end = parts[i + 1..]
                .iter()
                .position(|p| *p == "moves")
                .map_or(parts.len(), |offset| i + 1 + offset);
            if end == i + 1 {
                return Err(CommandError::MissingParts(USAGE));
            }
            let board = rules.from_fen(&parts[i + 1..end].join(" "))?;
            i = end;
            board
        }
        _ => return Err(CommandError::MissingParts(USAGE)),
    };

    let mut history = vec![start];
    if parts.get(i) == Some(&"moves") {
        for move_str in &parts[i + 1..] {
            let current = history.last().ok_or(CommandError::MissingParts(USAGE))?;
            let next = rules
                .parse_move(current, move_str)
                .and_then(|mv| {
                    rules
                        .apply_move(current, mv)
                        .ok_or_else(|| MoveParseError::NotLegal((*move_str).to_string()))
                })
                .map_err(|error| CommandError::InvalidMove {
                    move_str: (*move_str).to_string(),
                    error,
                })?;
            history.push(next);
        }
    }
    Ok(history)
}

/// `go` arguments as a one-call override, if any were given.
fn parse_go_limit(parts: &[&str]) -> Option<SearchLimit> {
    let mut depth = None;
    let mut time_budget = None;
    let mut i = 1;
    while i < parts.len() {
        match parts[i] {
            "depth" => {
                depth = parts.get(i + 1).and_then(|v| v.parse::<u32>().ok());
                i += 2;
            }
            "movetime" => {
                time_budget = parts
                    .get(i + 1)
                    .and_then(|v| v.parse::<u64>().ok())
                    .map(Duration::from_millis);
                i += 2;
            }
            _ => i += 1,
        }
    }
    (depth.is_some() || time_budget.is_some()).then_some(SearchLimit { depth, time_budget })
}

fn describe_outcome(outcome: GameOutcome) -> String {
    match outcome {
        GameOutcome::Checkmate { winner } => format!("checkmate, {winner} wins"),
        GameOutcome::Stalemate => "stalemate".to_string(),
        GameOutcome::InsufficientMaterial => "insufficient material".to_string(),
    }
}

/// Run commands from `input` until `quit` or end of input.
pub fn run_command_loop<I: BufRead, O: Write>(
    input: I,
    mut out: O,
    mut config: AiConfig,
) -> io::Result<()> {
    let mut policy = DecisionPolicy::from_config(StandardRules, &config);
    let mut history = vec![StandardRules.startpos()];

    for line in input.lines() {
        let line = line?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = parts.first() else {
            continue;
        };
        // `history` is never empty; `undo` keeps the root.
        let Some(current) = history.last().cloned() else {
            break;
        };

        match command {
            "isready" => writeln!(out, "readyok")?,
            "position" => match parse_position_command(&parts) {
                Ok(positions) => history = positions,
                Err(e) => writeln!(out, "info string error: {e}")?,
            },
            "go" => match game_outcome(policy.rules(), &current) {
                Some(outcome) => {
                    writeln!(out, "info string game over: {}", describe_outcome(outcome))?;
                    writeln!(out, "bestmove (none)")?;
                }
                None => match policy.decide(&current, parse_go_limit(&parts)) {
                    Some(decision) => {
                        writeln!(out, "info string source {}", decision.source)?;
                        writeln!(out, "bestmove {}", decision.mv)?;
                    }
                    None => writeln!(out, "bestmove (none)")?,
                },
            },
            "eval" => match policy.get_evaluation(&current) {
                Some(report) => {
                    writeln!(out, "eval {:+.2} {}", report.numeric, report.description)?;
                }
                None => writeln!(out, "eval none")?,
            },
            "suggest" => match parts.get(1).map(|s| s.parse::<Square>()) {
                Some(Ok(from)) => {
                    let moves = policy.suggest_moves(&current, from);
                    if moves.is_empty() {
                        writeln!(out, "suggest (none)")?;
                    } else {
                        let list: Vec<String> = moves.iter().map(ToString::to_string).collect();
                        writeln!(out, "suggest {}", list.join(" "))?;
                    }
                }
                Some(Err(e)) => writeln!(out, "info string error: {e}")?,
                None => writeln!(out, "info string error: Usage: suggest <square>")?,
            },
            "difficulty" => {
                if let Some(name) = parts.get(1) {
                    config.difficulty = policy.set_difficulty(name);
                }
                let limit = policy.current_limit();
                writeln!(
                    out,
                    "difficulty {} depth {} movetime {}",
                    policy.current_difficulty(),
                    limit.depth.unwrap_or(0),
                    limit.time_budget.map_or(0, |t| t.as_millis())
                )?;
            }
            "setoption" => match parse_setoption(&parts) {
                Some((name, value)) => match config.apply_setoption(&name, value.as_deref()) {
                    AppliedOption::Difficulty(tier) => {
                        policy.set_difficulty(tier.name());
                    }
                    AppliedOption::Policy | AppliedOption::Engine => {
                        debug!("option '{name}' changed, rebuilding decision policy");
                        policy.stop();
                        policy = DecisionPolicy::from_config(StandardRules, &config);
                    }
                },
                None => writeln!(
                    out,
                    "info string error: Usage: setoption name <name> [value <value>]"
                )?,
            },
            "undo" => {
                if history.len() > 1 {
                    history.pop();
                } else {
                    writeln!(out, "info string nothing to undo")?;
                }
            }
            "start" => match policy.start() {
                Ok(()) => writeln!(
                    out,
                    "info string engine ready: {}",
                    policy.engine().engine_name().as_deref().unwrap_or("unnamed")
                )?,
                Err(e) => writeln!(out, "info string {e}")?,
            },
            "stop" => policy.stop(),
            "fen" => writeln!(out, "{}", policy.rules().fen(&current))?,
            "quit" => break,
            other => warn!("unknown command '{other}'"),
        }

        out.flush()?;
    }

    policy.stop();
    Ok(())
}
