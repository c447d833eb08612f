//! UCI lines exchanged with the analysis engine.

use crate::error::ProtocolError;
use crate::evaluation::RawScore;
use crate::limits::SearchBound;

/// A decoded line from the engine's stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineReply {
    IdName(String),
    UciOk,
    ReadyOk,
    /// `None` when the engine reports `(none)` or `0000`
    BestMove(Option<String>),
    Info(SearchInfo),
    /// Anything we do not act on
    Other(String),
}

/// The fields of an `info` line we use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchInfo {
    pub depth: Option<u32>,
    pub multipv: Option<u32>,
    pub score: Option<RawScore>,
    pub pv: Vec<String>,
}

impl SearchInfo {
    /// Fold a newer line into the running summary of a search.
    pub fn merge(&mut self, newer: SearchInfo) {
        if newer.multipv.is_some_and(|n| n > 1) {
            return;
        }
        if newer.depth.is_some() {
            self.depth = newer.depth;
        }
        if newer.score.is_some() {
            self.score = newer.score;
        }
        if !newer.pv.is_empty() {
            self.pv = newer.pv;
        }
    }
}

#[must_use]
pub fn position_command(fen: &str) -> String {
    format!("position fen {fen}")
}

#[must_use]
pub fn go_command(bound: SearchBound) -> String {
    match bound {
        SearchBound::Depth(depth) => format!("go depth {depth}"),
        SearchBound::MoveTime(time) => format!("go movetime {}", time.as_millis().max(1)),
    }
}

#[must_use]
pub fn setoption_command(name: &str, value: Option<&str>) -> String {
    match value {
        Some(value) => format!("setoption name {name} value {value}"),
        None => format!("setoption name {name}"),
    }
}

pub fn parse_reply(line: &str) -> Result<EngineReply, ProtocolError> {
    let trimmed = line.trim();
    let parts: Vec<&str> = trimmed.split_whitespace().collect();
    let Some(&head) = parts.first() else {
        return Ok(EngineReply::Other(String::new()));
    };

    let reply = match head {
        "uciok" => EngineReply::UciOk,
        "readyok" => EngineReply::ReadyOk,
        "id" if parts.get(1) == Some(&"name") => EngineReply::IdName(parts[2..].join(" ")),
        "bestmove" => match parts.get(1) {
            Some(&"(none)") | Some(&"0000") => EngineReply::BestMove(None),
            Some(mv) => EngineReply::BestMove(Some((*mv).to_string())),
            None => {
                return Err(ProtocolError::Malformed {
                    line: trimmed.to_string(),
                })
            }
        },
        "info" => EngineReply::Info(parse_info(&parts[1..])),
        _ => EngineReply::Other(trimmed.to_string()),
    };
    Ok(reply)
}

/// Lenient: a field with a missing or unreadable value is skipped.
fn parse_info(tokens: &[&str]) -> SearchInfo {
    let mut info = SearchInfo::default();
    let mut i = 0;
    while i < tokens.len() {
        match tokens[i] {
            "depth" => {
                info.depth = tokens.get(i + 1).and_then(|v| v.parse().ok());
                i += 2;
            }
            "multipv" => {
                info.multipv = tokens.get(i + 1).and_then(|v| v.parse().ok());
                i += 2;
            }
            "score" => {
                let value = tokens.get(i + 2).and_then(|v| v.parse::<i32>().ok());
                info.score = match (tokens.get(i + 1), value) {
                    (Some(&"cp"), Some(cp)) => Some(RawScore::Centipawns(cp)),
                    (Some(&"mate"), Some(n)) => Some(RawScore::MateIn(n)),
                    _ => info.score,
                };
                i += 3;
            }
            "pv" => {
                info.pv = tokens[i + 1..].iter().map(|m| (*m).to_string()).collect();
                break;
            }
            "string" => break,
            _ => i += 1,
        }
    }
    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn encodes_requests() {
        assert_eq!(
            position_command("8/8/8/8/8/8/8/K6k w - - 0 1"),
            "position fen 8/8/8/8/8/8/8/K6k w - - 0 1"
        );
        assert_eq!(go_command(SearchBound::Depth(12)), "go depth 12");
        assert_eq!(
            go_command(SearchBound::MoveTime(Duration::from_millis(800))),
            "go movetime 800"
        );
        assert_eq!(
            setoption_command("Skill Level", Some("5")),
            "setoption name Skill Level value 5"
        );
        assert_eq!(setoption_command("Clear Hash", None), "setoption name Clear Hash");
    }

    #[test]
    fn decodes_handshake_and_bestmove() {
        assert_eq!(
            parse_reply("id name Stockfish 16").unwrap(),
            EngineReply::IdName("Stockfish 16".to_string())
        );
        assert_eq!(parse_reply("uciok\n").unwrap(), EngineReply::UciOk);
        assert_eq!(parse_reply("readyok").unwrap(), EngineReply::ReadyOk);
        assert_eq!(
            parse_reply("bestmove e2e4 ponder e7e5").unwrap(),
            EngineReply::BestMove(Some("e2e4".to_string()))
        );
        assert_eq!(
            parse_reply("bestmove (none)").unwrap(),
            EngineReply::BestMove(None)
        );
        assert!(parse_reply("bestmove").is_err());
        assert!(matches!(
            parse_reply("option name Hash type spin").unwrap(),
            EngineReply::Other(_)
        ));
    }

    #[test]
    fn decodes_info_fields() {
        let EngineReply::Info(info) = parse_reply(
            "info depth 14 seldepth 20 multipv 1 score cp -35 lowerbound nodes 123456 pv e7e5 g1f3 b8c6",
        )
        .unwrap() else {
            panic!("expected info");
        };
        assert_eq!(info.depth, Some(14));
        assert_eq!(info.score, Some(RawScore::Centipawns(-35)));
        assert_eq!(info.pv, vec!["e7e5", "g1f3", "b8c6"]);

        let EngineReply::Info(info) = parse_reply("info depth 3 score mate -2").unwrap() else {
            panic!("expected info");
        };
        assert_eq!(info.score, Some(RawScore::MateIn(-2)));

        let EngineReply::Info(info) = parse_reply("info string depth 99 pv a2a3").unwrap() else {
            panic!("expected info");
        };
        assert_eq!(info, SearchInfo::default());
    }

    #[test]
    fn merge_ignores_secondary_lines() {
        let mut summary = SearchInfo::default();
        summary.merge(SearchInfo {
            depth: Some(5),
            multipv: None,
            score: Some(RawScore::Centipawns(20)),
            pv: vec!["d2d4".to_string()],
        });
        summary.merge(SearchInfo {
            depth: Some(5),
            multipv: Some(2),
            score: Some(RawScore::Centipawns(-80)),
            pv: vec!["a2a3".to_string()],
        });
        summary.merge(SearchInfo {
            depth: Some(6),
            ..SearchInfo::default()
        });
        assert_eq!(summary.depth, Some(6));
        assert_eq!(summary.score, Some(RawScore::Centipawns(20)));
        assert_eq!(summary.pv, vec!["d2d4"]);
    }
}
