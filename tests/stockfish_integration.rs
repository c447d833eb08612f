//! Smoke tests against a real engine binary.
//!
//! Run with `cargo test -- --ignored` with Stockfish on `PATH`, or point
//! `CHESS_AI_ENGINE` at another UCI engine.

use std::time::Duration;

use chess_ai::{AiConfig, DecisionPolicy, Rules, SearchLimit, StandardRules, StrategyKind};

fn policy() -> DecisionPolicy<StandardRules> {
    let config = AiConfig {
        use_engine: true,
        ..AiConfig::from_env()
    };
    DecisionPolicy::from_config(StandardRules, &config)
}

#[test]
#[ignore]
fn real_engine_returns_legal_move() {
    let policy = policy();
    policy.start().expect("engine should start");
    assert!(policy.engine().engine_name().is_some());

    let board = StandardRules.startpos();
    let decision = policy
        .decide(&board, Some(SearchLimit::time(Duration::from_millis(100))))
        .unwrap();
    assert_eq!(decision.source, StrategyKind::Engine);
    assert!(StandardRules.legal_moves(&board).contains(&decision.mv));

    policy.stop();
    assert!(!policy.engine().is_running());
}

#[test]
#[ignore]
fn real_engine_scores_start_as_roughly_equal() {
    let policy = policy();
    policy.set_difficulty("easy");
    let report = policy.get_evaluation(&StandardRules.startpos()).unwrap();
    assert!(report.numeric.abs() < 1.0, "{report:?}");
    assert!(policy.engine().last_score().is_some());
}
