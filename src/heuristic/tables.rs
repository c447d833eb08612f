//! Heuristic scoring constants.
//!
//! Material values (P=1, N=3, B=3, R=5, Q=9, K=0) live on `PieceKind::value`.

// ============================================================================
// CAPTURES
// ============================================================================

/// Flat bonus for any capture
pub const CAPTURE_BASE: i32 = 100;

/// Per pawn of captured material
pub const CAPTURE_PER_PAWN: i32 = 20;

// ============================================================================
// KING SAFETY
// ============================================================================

/// Any move, capture or quiet, that leaves the mover's own king attacked
pub const SELF_EXPOSURE_PENALTY: i32 = 1000;

// ============================================================================
// POSITIONAL TERMS
// ============================================================================

/// Per opponent piece attacked after the move
pub const THREAT_BONUS: i32 = 30;

/// Destination inside c3-f6
pub const CENTER_BONUS: i32 = 20;

/// Knight or bishop leaving its back rank
pub const DEVELOPMENT_BONUS: i32 = 25;

/// Destination square left hanging
pub const HANGING_PENALTY: i32 = 20;

/// Move gives check
pub const CHECK_BONUS: i32 = 50;

// ============================================================================
// SUGGESTIONS
// ============================================================================

/// Material gain weight relative to the mobility tie-break
pub const SUGGESTION_MATERIAL_WEIGHT: i32 = 100;

/// Suggestions returned when the caller does not ask for a count
pub const DEFAULT_SUGGESTIONS: usize = 2;
