//! Value types shared by the decision engine.
//!
//! - `Square` - board square with file/rank arithmetic
//! - `Piece`, `PieceKind` and `Color` - piece descriptors
//! - `Move` - origin, destination and optional promotion, in UCI notation

mod moves;
mod piece;
mod square;

pub use moves::Move;
pub use piece::{Color, Piece, PieceKind};
pub use square::Square;
