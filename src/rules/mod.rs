//! The rules collaborator.
//!
//! The decision engine never generates moves or decides legality itself.
//! Everything it knows about a position comes through the [`Rules`] trait.
//! [`StandardRules`] is the production implementation, backed by `cozy-chess`.

mod standard;

pub use standard::{StandardRules, STARTPOS_FEN};

use crate::error::MoveParseError;
use crate::types::{Color, Move, Piece, PieceKind, Square};

/// Narrow interface onto a rules engine.
///
/// Positions are never mutated: [`Rules::apply_move`] returns a fork, and
/// undoing a move is dropping that fork and keeping the original.
pub trait Rules {
    type Position: Clone;

    /// Legal moves in the position, in any order.
    fn legal_moves(&self, position: &Self::Position) -> Vec<Move>;

    /// Play `mv` on a copy of `position`. `None` if the move is not legal there.
    fn apply_move(&self, position: &Self::Position, mv: Move) -> Option<Self::Position>;

    fn side_to_move(&self, position: &Self::Position) -> Color;

    fn is_checkmate(&self, position: &Self::Position) -> bool;

    fn is_stalemate(&self, position: &Self::Position) -> bool;

    fn is_insufficient_material(&self, position: &Self::Position) -> bool;

    /// Whether the side to move is in check.
    fn is_in_check(&self, position: &Self::Position) -> bool;

    fn piece_at(&self, position: &Self::Position, square: Square) -> Option<Piece>;

    /// Number of pieces of color `by` attacking `square`.
    fn attacker_count(&self, position: &Self::Position, by: Color, square: Square) -> u32;

    /// FEN encoding, used to send positions to the external engine.
    fn fen(&self, position: &Self::Position) -> String;
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
}

/// Legal moves sorted into canonical order (origin index, destination
/// index, promotion). Every scan that breaks ties by "first seen" uses this.
pub fn canonical_moves<R: Rules>(rules: &R, position: &R::Position) -> Vec<Move> {
    let mut moves = rules.legal_moves(position);
    moves.sort_unstable();
    moves.dedup();
    moves
}

/// Parse a UCI move string and check it against the legal moves of `position`.
pub fn parse_legal_move<R: Rules>(
    rules: &R,
    position: &R::Position,
    notation: &str,
) -> Result<Move, MoveParseError> {
    let mv: Move = notation.trim().parse()?;
    if rules.legal_moves(position).contains(&mv) {
        Ok(mv)
    } else {
        Err(MoveParseError::NotLegal(notation.trim().to_string()))
    }
}

/// Square of `color`'s king, if it has one on the board.
pub fn king_square<R: Rules>(rules: &R, position: &R::Position, color: Color) -> Option<Square> {
    Square::ALL.into_iter().find(|&sq| {
        rules
            .piece_at(position, sq)
            .is_some_and(|p| p.kind == PieceKind::King && p.color == color)
    })
}

/// How the game ended, or `None` while it is still in progress.
pub fn game_outcome<R: Rules>(rules: &R, position: &R::Position) -> Option<GameOutcome> {
    if rules.is_checkmate(position) {
        Some(GameOutcome::Checkmate {
            winner: rules.side_to_move(position).opponent(),
        })
    } else if rules.is_stalemate(position) {
        Some(GameOutcome::Stalemate)
    } else if rules.is_insufficient_material(position) {
        Some(GameOutcome::InsufficientMaterial)
    } else {
        None
    }
}
