//! Threat counting.

use crate::rules::Rules;
use crate::types::{Color, PieceKind, Square};

/// Opponent pieces currently under attack by one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThreatTally {
    /// Number of attacked opponent pieces, king excluded
    pub attacked: u32,
    /// Summed material value of those pieces
    pub attacked_value: i32,
}

/// Count the pieces of `by`'s opponent that `by` attacks. The king is left
/// out; attacking it is a check and is scored separately.
pub fn tally_threats<R: Rules>(rules: &R, position: &R::Position, by: Color) -> ThreatTally {
    let target = by.opponent();
    Square::ALL
        .into_iter()
        .filter_map(|sq| rules.piece_at(position, sq).map(|piece| (sq, piece)))
        .filter(|(_, piece)| piece.color == target && piece.kind != PieceKind::King)
        .filter(|&(sq, _)| rules.attacker_count(position, by, sq) > 0)
        .fold(ThreatTally::default(), |tally, (_, piece)| ThreatTally {
            attacked: tally.attacked + 1,
            attacked_value: tally.attacked_value + piece.kind.value(),
        })
}
