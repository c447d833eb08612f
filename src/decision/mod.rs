//! The decision policy: the public face of the crate.
//!
//! A [`DecisionPolicy`] owns the rules collaborator, the active difficulty
//! and the engine adapter. For each request it runs its strategy chain over
//! the position's legal moves and returns the first legal proposal.

mod strategy;

pub use strategy::{
    default_chain, DecisionContext, EngineBestMove, ForcedMate, Heuristic, Strategy, StrategyKind,
};

use log::{debug, info, warn};
use parking_lot::Mutex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::AiConfig;
use crate::engine::EngineAdapter;
use crate::error::EngineError;
use crate::evaluation::{to_evaluation, EvaluationReport, RawScore};
use crate::heuristic::{material_balance, suggest_moves, tables::DEFAULT_SUGGESTIONS};
use crate::limits::{DifficultyTier, LimitPolicy, SearchLimit};
use crate::rules::{canonical_moves, Rules};
use crate::types::{Move, Square};

/// A chosen move and the strategy that chose it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Decision {
    pub mv: Move,
    pub source: StrategyKind,
}

pub struct DecisionPolicy<R: Rules> {
    rules: R,
    limits: Mutex<LimitPolicy>,
    engine: EngineAdapter,
    strategies: Vec<Box<dyn Strategy<R>>>,
    evaluation_fallback: bool,
}

impl<R: Rules> DecisionPolicy<R> {
    /// Default chain at medium difficulty.
    pub fn new(rules: R, engine: EngineAdapter) -> Self {
        Self::with_strategies(rules, engine, default_chain())
    }

    pub fn with_strategies(
        rules: R,
        engine: EngineAdapter,
        strategies: Vec<Box<dyn Strategy<R>>>,
    ) -> Self {
        DecisionPolicy {
            rules,
            limits: Mutex::new(LimitPolicy::default()),
            engine,
            strategies,
            evaluation_fallback: true,
        }
    }

    pub fn from_config(rules: R, config: &AiConfig) -> Self {
        let engine = if config.use_engine {
            EngineAdapter::from_config(config.engine.clone())
        } else {
            EngineAdapter::disabled()
        };
        let mut policy = Self::new(rules, engine);
        policy.limits.get_mut().set_tier(config.difficulty);
        policy.evaluation_fallback = config.evaluation_fallback;
        policy
    }

    #[must_use]
    pub fn with_evaluation_fallback(mut self, enabled: bool) -> Self {
        self.evaluation_fallback = enabled;
        self
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn engine(&self) -> &EngineAdapter {
        &self.engine
    }

    /// Move for the side to move at the current difficulty. `None` only
    /// when there are no legal moves.
    pub fn decide_move(&self, position: &R::Position) -> Option<Move> {
        self.decide(position, None).map(|d| d.mv)
    }

    /// Run the chain, with an optional one-call limit override.
    pub fn decide(
        &self,
        position: &R::Position,
        override_limit: Option<SearchLimit>,
    ) -> Option<Decision> {
        let legal_moves = canonical_moves(&self.rules, position);
        if legal_moves.is_empty() {
            debug!("no legal moves, nothing to decide");
            return None;
        }

        let ctx = DecisionContext {
            rules: &self.rules,
            position,
            legal_moves: &legal_moves,
            limit: self.limits.lock().resolve(override_limit),
            engine: &self.engine,
        };

        for strategy in &self.strategies {
            let kind = strategy.kind();
            let Some(mv) = strategy.propose(&ctx) else {
                debug!("{kind}: no proposal");
                continue;
            };
            if legal_moves.binary_search(&mv).is_err() {
                warn!("{kind} proposed illegal move {mv}, skipping");
                continue;
            }
            info!("{kind} chose {mv}");
            return Some(Decision { mv, source: kind });
        }
        None
    }

    /// Evaluation of `position` for display.
    ///
    /// Uses the engine's score when it has one; otherwise, unless disabled,
    /// a material count (checkmate reported as mate in 0).
    pub fn get_evaluation(&self, position: &R::Position) -> Option<EvaluationReport> {
        let side_to_move = self.rules.side_to_move(position);
        let limit = self.current_limit();

        let engine_score = if self.engine.is_enabled() {
            self.engine
                .analyze(&self.rules, position, limit)
                .and_then(|analysis| analysis.score)
        } else {
            None
        };

        let raw = match engine_score {
            Some(score) => score,
            None if !self.evaluation_fallback => return None,
            None if self.rules.is_checkmate(position) => RawScore::MateIn(0),
            None => {
                let pawns = material_balance(&self.rules, position) * side_to_move.sign();
                RawScore::Centipawns(pawns * 100)
            }
        };
        Some(to_evaluation(raw, side_to_move))
    }

    /// Best destinations for the piece on `from`.
    pub fn suggest_moves(&self, position: &R::Position, from: Square) -> Vec<Move> {
        suggest_moves(&self.rules, position, from, DEFAULT_SUGGESTIONS)
    }

    /// Switch difficulty by name; unknown names select medium.
    pub fn set_difficulty(&self, name: &str) -> DifficultyTier {
        let tier = self.limits.lock().set_difficulty(name);
        info!("difficulty set to {tier}");
        tier
    }

    pub fn current_difficulty(&self) -> DifficultyTier {
        self.limits.lock().current_difficulty()
    }

    pub fn current_limit(&self) -> SearchLimit {
        self.limits.lock().current_limit()
    }

    /// Start the engine now instead of on first use.
    pub fn start(&self) -> Result<(), EngineError> {
        self.engine.ensure_started()
    }

    pub fn stop(&self) {
        self.engine.stop();
    }
}
