//! Move suggestions for a single piece.

use crate::rules::{canonical_moves, Rules};
use crate::types::{Move, Square};

use super::tables::SUGGESTION_MATERIAL_WEIGHT;

/// Material on the board in pawns, positive when White is ahead.
pub fn material_balance<R: Rules>(rules: &R, position: &R::Position) -> i32 {
    Square::ALL
        .into_iter()
        .filter_map(|sq| rules.piece_at(position, sq))
        .map(|piece| piece.kind.value() * piece.color.sign())
        .sum()
}

/// Best moves for the piece standing on `from`.
///
/// Each move scores its material gain for the mover, weighted, plus the
/// number of legal replies in the resulting position. Only moves tied at the
/// top score are returned, at most `max` of them, in canonical order.
/// Empty when `from` holds no piece of the side to move.
pub fn suggest_moves<R: Rules>(
    rules: &R,
    position: &R::Position,
    from: Square,
    max: usize,
) -> Vec<Move> {
    let mover = rules.side_to_move(position);
    match rules.piece_at(position, from) {
        Some(piece) if piece.color == mover => {}
        _ => return Vec::new(),
    }

    let sign = mover.sign();
    let before = material_balance(rules, position) * sign;

    let scored: Vec<(i32, Move)> = canonical_moves(rules, position)
        .into_iter()
        .filter(|mv| mv.from == from)
        .filter_map(|mv| {
            let next = rules.apply_move(position, mv)?;
            let gain = material_balance(rules, &next) * sign - before;
            let mobility = i32::try_from(rules.legal_moves(&next).len()).unwrap_or(i32::MAX);
            Some((gain * SUGGESTION_MATERIAL_WEIGHT + mobility, mv))
        })
        .collect();

    let Some(top) = scored.iter().map(|&(score, _)| score).max() else {
        return Vec::new();
    };
    scored
        .into_iter()
        .filter(|&(score, _)| score == top)
        .map(|(_, mv)| mv)
        .take(max)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::tables::DEFAULT_SUGGESTIONS;
    use crate::rules::StandardRules;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn material_is_even_at_the_start() {
        let rules = StandardRules;
        assert_eq!(material_balance(&rules, &rules.startpos()), 0);

        let board = rules.from_fen("6k1/8/8/3r4/8/8/8/3Q2K1 w - - 0 1").unwrap();
        assert_eq!(material_balance(&rules, &board), 9 - 5);
    }

    #[test]
    fn capture_outranks_quiet_moves() {
        let rules = StandardRules;
        let board = rules.from_fen("6k1/8/8/3r4/8/8/8/3Q2K1 w - - 0 1").unwrap();
        let picks = suggest_moves(&rules, &board, sq("d1"), DEFAULT_SUGGESTIONS);
        assert_eq!(picks, vec!["d1d5".parse::<Move>().unwrap()]);
    }

    #[test]
    fn opponent_or_empty_square_gives_nothing() {
        let rules = StandardRules;
        let board = rules.startpos();
        assert!(suggest_moves(&rules, &board, sq("e7"), 2).is_empty());
        assert!(suggest_moves(&rules, &board, sq("e4"), 2).is_empty());
    }

    #[test]
    fn respects_the_cap() {
        let rules = StandardRules;
        let board = rules.startpos();
        let picks = suggest_moves(&rules, &board, sq("g1"), 2);
        assert!(!picks.is_empty() && picks.len() <= 2);
        assert!(picks.iter().all(|mv| mv.from == sq("g1")));
        assert!(suggest_moves(&rules, &board, sq("g1"), 0).is_empty());
    }
}
