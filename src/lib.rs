//! Move selection for a computer-controlled chess player.
//!
//! [`DecisionPolicy`] chains three strategies: an immediate checkmate if one
//! exists, then an external UCI engine, then a one-ply heuristic. It also
//! translates engine scores into readable evaluations and maps named
//! difficulty tiers to search limits.

pub mod cli;
pub mod config;
pub mod decision;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod heuristic;
pub mod limits;
pub mod rules;
pub mod types;

pub use config::{AiConfig, EngineConfig};
pub use decision::{Decision, DecisionPolicy, Strategy, StrategyKind};
pub use engine::{AnalysisResult, EngineAdapter, Launcher, ProcessLauncher, Transport};
pub use error::{
    EngineError, FenError, InvalidDifficulty, MoveParseError, ProtocolError, SquareError,
};
pub use evaluation::{to_evaluation, EvaluationBand, EvaluationReport, RawScore};
pub use heuristic::{HeuristicEvaluator, MoveScore};
pub use limits::{limit_for, DifficultyTier, LimitPolicy, SearchLimit};
pub use rules::{game_outcome, GameOutcome, Rules, StandardRules, STARTPOS_FEN};
pub use types::{Color, Move, Piece, PieceKind, Square};
