//! Translation of raw engine scores into a signed evaluation and a
//! human-readable description.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::Color;

/// Score as reported by an analysis, from the side to move's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RawScore {
    /// Hundredths of a pawn; positive favors the side to move
    Centipawns(i32),
    /// Mate distance in moves; positive means the side to move mates,
    /// zero or negative means the side to move gets mated
    MateIn(i32),
}

impl RawScore {
    /// Color delivering mate, if this is a mate score.
    #[must_use]
    pub fn mating_side(self, side_to_move: Color) -> Option<Color> {
        match self {
            RawScore::MateIn(n) if n > 0 => Some(side_to_move),
            RawScore::MateIn(_) => Some(side_to_move.opponent()),
            RawScore::Centipawns(_) => None,
        }
    }
}

/// Qualitative band of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EvaluationBand {
    Equal,
    SlightEdge(Color),
    Advantage(Color),
    Decisive(Color),
    Mate { winner: Color, moves: u32 },
}

impl EvaluationBand {
    /// Band for a White-positive evaluation in pawns.
    #[must_use]
    pub fn from_pawns(e: f64) -> Self {
        let side = if e >= 0.0 { Color::White } else { Color::Black };
        let magnitude = e.abs();
        if magnitude < 0.5 {
            EvaluationBand::Equal
        } else if magnitude <= 1.0 {
            EvaluationBand::SlightEdge(side)
        } else if magnitude <= 3.0 {
            EvaluationBand::Advantage(side)
        } else {
            EvaluationBand::Decisive(side)
        }
    }
}

impl fmt::Display for EvaluationBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationBand::Equal => write!(f, "equal position"),
            EvaluationBand::SlightEdge(side) => write!(f, "slight {side} edge"),
            EvaluationBand::Advantage(side) => write!(f, "{side} advantage"),
            EvaluationBand::Decisive(side) => write!(f, "decisive {side} advantage"),
            EvaluationBand::Mate { winner, moves } => {
                write!(f, "mate for {winner} in {moves} move(s)")
            }
        }
    }
}

/// Evaluation in pawns, White-positive, with its description.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EvaluationReport {
    pub numeric: f64,
    pub description: String,
    pub band: EvaluationBand,
}

/// Convert a raw score into a White-positive report.
#[must_use]
pub fn to_evaluation(raw: RawScore, side_to_move: Color) -> EvaluationReport {
    let (numeric, band) = match raw {
        RawScore::MateIn(n) => {
            let winner = raw.mating_side(side_to_move).unwrap_or(side_to_move);
            let numeric = match winner {
                Color::White => f64::INFINITY,
                Color::Black => f64::NEG_INFINITY,
            };
            (
                numeric,
                EvaluationBand::Mate {
                    winner,
                    moves: n.unsigned_abs(),
                },
            )
        }
        RawScore::Centipawns(cp) => {
            let pawns = f64::from(cp) / 100.0 * f64::from(side_to_move.sign());
            (pawns, EvaluationBand::from_pawns(pawns))
        }
    };

    EvaluationReport {
        numeric,
        description: band.to_string(),
        band,
    }
}
