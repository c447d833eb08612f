//! Hanging-square detection.
//!
//! Coarse: compares raw attacker and defender counts and ignores piece
//! values, exchange order and discovered attacks.

use crate::rules::Rules;
use crate::types::{Color, Square};

/// Attacker/defender balance on one square for one color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HangingVerdict {
    pub square: Square,
    pub color: Color,
    /// Opposing pieces attacking the square
    pub attackers: u32,
    /// Pieces of `color` defending the square
    pub defenders: u32,
}

impl HangingVerdict {
    #[inline]
    #[must_use]
    pub const fn is_hanging(&self) -> bool {
        self.attackers > self.defenders
    }
}

/// Whether `square` is hanging for `color` in `position`.
pub fn hanging_verdict<R: Rules>(
    rules: &R,
    position: &R::Position,
    square: Square,
    color: Color,
) -> HangingVerdict {
    HangingVerdict {
        square,
        color,
        attackers: rules.attacker_count(position, color.opponent(), square),
        defenders: rules.attacker_count(position, color, square),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::StandardRules;

    #[test]
    fn two_attackers_one_defender_is_hanging() {
        let rules = StandardRules;
        let board = rules
            .from_fen("4k3/5n2/3p4/4N3/3P4/8/8/4K3 w - - 0 1")
            .unwrap();
        let verdict = hanging_verdict(&rules, &board, "e5".parse().unwrap(), Color::White);
        assert_eq!(verdict.attackers, 2);
        assert_eq!(verdict.defenders, 1);
        assert!(verdict.is_hanging());
    }

    #[test]
    fn equal_counts_are_not_hanging() {
        let rules = StandardRules;
        // d4 pawn and d3 knight defend e5 against the d6 pawn and f7 knight.
        let board = rules
            .from_fen("4k3/5n2/3p4/4N3/3P4/3N4/8/4K3 w - - 0 1")
            .unwrap();
        let verdict = hanging_verdict(&rules, &board, "e5".parse().unwrap(), Color::White);
        assert!(!verdict.is_hanging());
    }

    #[test]
    fn undefended_and_unattacked_is_safe() {
        let rules = StandardRules;
        let board = rules.startpos();
        let verdict = hanging_verdict(&rules, &board, "e4".parse().unwrap(), Color::White);
        assert_eq!(verdict.attackers, 0);
        assert!(!verdict.is_hanging());
    }
}
