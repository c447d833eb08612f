//! Error types for position parsing and the external engine session.

use std::fmt;
use std::io;

/// Error type for square parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    /// Index outside 0-63
    IndexOutOfBounds { index: u8 },
    /// Invalid algebraic notation
    InvalidNotation { notation: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::IndexOutOfBounds { index } => {
                write!(f, "Square index {index} out of bounds (must be 0-63)")
            }
            SquareError::InvalidNotation { notation } => {
                write!(f, "Invalid square notation '{notation}'")
            }
        }
    }
}

impl std::error::Error for SquareError {}

/// Why a UCI move string was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    /// Not 4 or 5 ASCII characters long
    Length(usize),
    /// Origin or destination is not a board square
    Square(SquareError),
    /// Suffix other than n, b, r or q
    Promotion(char),
    /// Well formed, but not among the legal moves of the position
    NotLegal(String),
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::Length(n) => {
                write!(f, "expected a 4 or 5 character UCI move, got {n} characters")
            }
            MoveParseError::Square(e) => write!(f, "bad square in move: {e}"),
            MoveParseError::Promotion(c) => write!(f, "'{c}' is not a promotion piece"),
            MoveParseError::NotLegal(uci) => write!(f, "'{uci}' is not legal in this position"),
        }
    }
}

impl std::error::Error for MoveParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MoveParseError::Square(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SquareError> for MoveParseError {
    fn from(e: SquareError) -> Self {
        MoveParseError::Square(e)
    }
}

/// Unrecognized tier name. Only surfaced by the strict `FromStr` parse of
/// `DifficultyTier`; the lossy paths coerce to medium instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDifficulty(pub String);

impl fmt::Display for InvalidDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown difficulty '{}'", self.0)
    }
}

impl std::error::Error for InvalidDifficulty {}

/// Error type for FEN parsing failures reported by the rules collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenError {
    pub fen: String,
    pub reason: String,
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid FEN '{}': {}", self.fen, self.reason)
    }
}

impl std::error::Error for FenError {}

/// A malformed, missing or late reply from the engine process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// No reply arrived before the deadline
    Timeout { waiting_for: &'static str },
    /// The engine closed its output stream
    Closed,
    /// Reading from or writing to the process failed
    Io(String),
    /// A reply line that could not be decoded
    Malformed { line: String },
    /// `bestmove` named a move that is not legal in the position sent
    IllegalMove { notation: String },
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Timeout { waiting_for } => {
                write!(f, "Timed out waiting for '{waiting_for}'")
            }
            ProtocolError::Closed => write!(f, "Engine closed its output"),
            ProtocolError::Io(msg) => write!(f, "Engine I/O error: {msg}"),
            ProtocolError::Malformed { line } => write!(f, "Malformed engine reply '{line}'"),
            ProtocolError::IllegalMove { notation } => {
                write!(f, "Engine proposed illegal move '{notation}'")
            }
        }
    }
}

impl std::error::Error for ProtocolError {}

impl From<io::Error> for ProtocolError {
    fn from(e: io::Error) -> Self {
        ProtocolError::Io(e.to_string())
    }
}

/// Engine-layer failure. Never escapes the engine adapter: it is logged
/// and turned into an absent result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Spawn or handshake failed; the decision chain runs without an engine
    Unavailable { reason: String },
    /// The session was running but a request failed
    Protocol(ProtocolError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Unavailable { reason } => write!(f, "Engine unavailable: {reason}"),
            EngineError::Protocol(e) => write!(f, "Engine protocol error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Protocol(e) => Some(e),
            EngineError::Unavailable { .. } => None,
        }
    }
}

impl From<ProtocolError> for EngineError {
    fn from(e: ProtocolError) -> Self {
        EngineError::Protocol(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn engine_error_wraps_protocol_failures() {
        let err = EngineError::from(ProtocolError::Timeout {
            waiting_for: "bestmove",
        });
        assert_eq!(
            err.to_string(),
            "Engine protocol error: Timed out waiting for 'bestmove'"
        );
        assert!(err.source().is_some());
        assert!(EngineError::Unavailable {
            reason: "spawn failed".into()
        }
        .source()
        .is_none());
    }

    #[test]
    fn bad_square_is_the_move_error_source() {
        let err = MoveParseError::from(SquareError::InvalidNotation {
            notation: "z9".into(),
        });
        assert_eq!(err.to_string(), "bad square in move: Invalid square notation 'z9'");
        assert!(err.source().is_some());
        assert!(MoveParseError::Length(2).source().is_none());
    }
}
