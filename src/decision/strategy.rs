//! The strategies a [`DecisionPolicy`](super::DecisionPolicy) chains together.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::engine::EngineAdapter;
use crate::heuristic::HeuristicEvaluator;
use crate::limits::SearchLimit;
use crate::rules::Rules;
use crate::types::Move;

/// Which strategy produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StrategyKind {
    ForcedMate,
    Engine,
    Heuristic,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StrategyKind::ForcedMate => "forced mate",
            StrategyKind::Engine => "engine",
            StrategyKind::Heuristic => "heuristic",
        })
    }
}

/// Everything a strategy may look at for one decision.
pub struct DecisionContext<'a, R: Rules> {
    pub rules: &'a R,
    pub position: &'a R::Position,
    /// Legal moves in canonical order, never empty
    pub legal_moves: &'a [Move],
    pub limit: SearchLimit,
    pub engine: &'a EngineAdapter,
}

/// One link in the decision chain. `None` passes to the next link.
pub trait Strategy<R: Rules>: Send + Sync {
    fn kind(&self) -> StrategyKind;

    fn propose(&self, ctx: &DecisionContext<'_, R>) -> Option<Move>;
}

/// First move, in canonical order, that mates immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForcedMate;

impl<R: Rules> Strategy<R> for ForcedMate {
    fn kind(&self) -> StrategyKind {
        StrategyKind::ForcedMate
    }

    fn propose(&self, ctx: &DecisionContext<'_, R>) -> Option<Move> {
        ctx.legal_moves.iter().copied().find(|&mv| {
            ctx.rules
                .apply_move(ctx.position, mv)
                .is_some_and(|next| ctx.rules.is_checkmate(&next))
        })
    }
}

/// Ask the external engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineBestMove;

impl<R: Rules> Strategy<R> for EngineBestMove {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Engine
    }

    fn propose(&self, ctx: &DecisionContext<'_, R>) -> Option<Move> {
        if !ctx.engine.is_enabled() {
            return None;
        }
        ctx.engine.best_move(ctx.rules, ctx.position, ctx.limit)
    }
}

/// Best one-ply heuristic score.
#[derive(Debug, Clone, Copy, Default)]
pub struct Heuristic {
    pub evaluator: HeuristicEvaluator,
}

impl<R: Rules> Strategy<R> for Heuristic {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Heuristic
    }

    fn propose(&self, ctx: &DecisionContext<'_, R>) -> Option<Move> {
        self.evaluator
            .select_move(ctx.rules, ctx.position, ctx.legal_moves)
            .map(|scored| scored.mv)
    }
}

/// Forced mate, then engine, then heuristic.
#[must_use]
pub fn default_chain<R: Rules>() -> Vec<Box<dyn Strategy<R>>> {
    vec![
        Box::new(ForcedMate),
        Box::new(EngineBestMove),
        Box::new(Heuristic::default()),
    ]
}
