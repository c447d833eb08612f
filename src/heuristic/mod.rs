//! Hand-written move scoring used when no engine answer is available.
//!
//! Each candidate move is played on a scratch position and scored on a few
//! coarse terms:
//! - Captures (material table P=1, N=3, B=3, R=5, Q=9, K=0)
//! - Opponent pieces attacked afterwards
//! - Center control and minor-piece development
//! - Destination left hanging
//! - Checks
//! - The mover's own king left attacked
//!
//! The best total wins; ties keep the earliest move in canonical order.

mod hanging;
mod suggest;
pub mod tables;
mod threats;

pub use hanging::{hanging_verdict, HangingVerdict};
pub use suggest::{material_balance, suggest_moves};
pub use threats::{tally_threats, ThreatTally};

use log::trace;

use crate::rules::{canonical_moves, king_square, Rules};
use crate::types::{Color, Move, Piece, PieceKind};
use tables::{
    CAPTURE_BASE, CAPTURE_PER_PAWN, CENTER_BONUS, CHECK_BONUS, DEVELOPMENT_BONUS, HANGING_PENALTY,
    SELF_EXPOSURE_PENALTY, THREAT_BONUS,
};

/// Per-term breakdown of one move's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveScore {
    pub capture: i32,
    pub exposure: i32,
    pub threats: i32,
    pub center: i32,
    pub development: i32,
    pub hanging: i32,
    pub check: i32,
}

impl MoveScore {
    #[inline]
    #[must_use]
    pub const fn total(&self) -> i32 {
        self.capture
            + self.exposure
            + self.threats
            + self.center
            + self.development
            + self.hanging
            + self.check
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: MoveScore,
}

/// Stateless one-ply move scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEvaluator;

impl HeuristicEvaluator {
    #[must_use]
    pub const fn new() -> Self {
        HeuristicEvaluator
    }

    /// Score one move. `None` if the rules collaborator refuses to play it.
    pub fn score_move<R: Rules>(
        &self,
        rules: &R,
        position: &R::Position,
        mv: Move,
    ) -> Option<MoveScore> {
        let mover = rules.side_to_move(position);
        let moved = rules.piece_at(position, mv.from)?;
        let next = rules.apply_move(position, mv)?;

        let capture = captured_kind(rules, position, mv, moved, mover)
            .map_or(0, |kind| CAPTURE_BASE + CAPTURE_PER_PAWN * kind.value());

        // Any move that leaves the mover's own king attacked is disqualified.
        let exposed = king_square(rules, &next, mover)
            .is_some_and(|king| rules.attacker_count(&next, mover.opponent(), king) > 0);

        let threats = THREAT_BONUS * tally_threats(rules, &next, mover).attacked as i32;

        let development = moved.kind.is_minor() && mv.from.rank() == mover.back_rank();

        Some(MoveScore {
            capture,
            exposure: if exposed { -SELF_EXPOSURE_PENALTY } else { 0 },
            threats,
            center: if mv.to.is_central() { CENTER_BONUS } else { 0 },
            development: if development { DEVELOPMENT_BONUS } else { 0 },
            hanging: if hanging_verdict(rules, &next, mv.to, mover).is_hanging() {
                -HANGING_PENALTY
            } else {
                0
            },
            check: if rules.is_in_check(&next) { CHECK_BONUS } else { 0 },
        })
    }

    /// Highest-scoring move among `candidates`, scanned in the given order.
    /// Only a strictly better total replaces the current best.
    pub fn select_move<R: Rules>(
        &self,
        rules: &R,
        position: &R::Position,
        candidates: &[Move],
    ) -> Option<ScoredMove> {
        let mut best: Option<ScoredMove> = None;
        for &mv in candidates {
            let Some(score) = self.score_move(rules, position, mv) else {
                continue;
            };
            trace!("heuristic {mv}: {} {score:?}", score.total());
            if best.map_or(true, |b| score.total() > b.score.total()) {
                best = Some(ScoredMove { mv, score });
            }
        }
        best
    }

    /// Best move over all legal moves in canonical order.
    pub fn best_move<R: Rules>(&self, rules: &R, position: &R::Position) -> Option<ScoredMove> {
        let moves = canonical_moves(rules, position);
        self.select_move(rules, position, &moves)
    }
}

/// Kind of the piece removed by `mv`, including en passant.
fn captured_kind<R: Rules>(
    rules: &R,
    position: &R::Position,
    mv: Move,
    moved: Piece,
    mover: Color,
) -> Option<PieceKind> {
    match rules.piece_at(position, mv.to) {
        Some(target) if target.color != mover => Some(target.kind),
        Some(_) => None,
        None if moved.kind == PieceKind::Pawn && mv.from.file() != mv.to.file() => {
            Some(PieceKind::Pawn)
        }
        None => None,
    }
}
