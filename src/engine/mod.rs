//! Adapter around an external UCI analysis engine.
//!
//! The adapter owns at most one engine session. The session is started
//! lazily, serialized behind a mutex, and torn down on any protocol failure
//! so that the next request starts from a clean handshake. Failures never
//! escape: every request answers `None` and the caller moves on.

mod protocol;
mod transport;

pub use protocol::{go_command, parse_reply, position_command, EngineReply, SearchInfo};
pub use transport::{Launcher, ProcessLauncher, ProcessTransport, Transport};

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use parking_lot::Mutex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{EngineError, ProtocolError};
use crate::evaluation::RawScore;
use crate::limits::{SearchBound, SearchLimit};
use crate::rules::{parse_legal_move, Rules};
use crate::types::Move;

/// Outcome of one engine search.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnalysisResult {
    /// `None` when the engine had no move to offer
    pub best_move: Option<Move>,
    pub score: Option<RawScore>,
    /// Leading legal prefix of the reported principal variation
    pub principal_variation: Vec<Move>,
    pub depth: Option<u32>,
}

struct Session {
    transport: Box<dyn Transport>,
    name: Option<String>,
}

#[derive(Default)]
struct SessionState {
    session: Option<Session>,
    last_score: Option<RawScore>,
}

pub struct EngineAdapter {
    launcher: Option<Box<dyn Launcher>>,
    config: EngineConfig,
    state: Mutex<SessionState>,
}

impl EngineAdapter {
    pub fn new(launcher: Box<dyn Launcher>, config: EngineConfig) -> Self {
        EngineAdapter {
            launcher: Some(launcher),
            config,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Adapter that spawns the configured binary.
    #[must_use]
    pub fn from_config(config: EngineConfig) -> Self {
        let launcher = ProcessLauncher::from_config(&config);
        EngineAdapter::new(Box::new(launcher), config)
    }

    /// Adapter that never starts an engine.
    #[must_use]
    pub fn disabled() -> Self {
        EngineAdapter {
            launcher: None,
            config: EngineConfig::default(),
            state: Mutex::new(SessionState::default()),
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.launcher.is_some()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.lock().session.is_some()
    }

    /// Name the engine reported during its handshake.
    #[must_use]
    pub fn engine_name(&self) -> Option<String> {
        self.state
            .lock()
            .session
            .as_ref()
            .and_then(|s| s.name.clone())
    }

    /// Most recent score produced by [`EngineAdapter::analyze`].
    #[must_use]
    pub fn last_score(&self) -> Option<RawScore> {
        self.state.lock().last_score
    }

    /// Launch and handshake if no session is running. Idempotent.
    pub fn ensure_started(&self) -> Result<(), EngineError> {
        let mut state = self.state.lock();
        self.start_locked(&mut state)
    }

    /// Best move for `position` within `limit`, or `None` on any failure.
    pub fn best_move<R: Rules>(
        &self,
        rules: &R,
        position: &R::Position,
        limit: SearchLimit,
    ) -> Option<Move> {
        let mut state = self.state.lock();
        self.search_locked(&mut state, rules, position, limit)?
            .best_move
    }

    /// Like [`EngineAdapter::best_move`] but also reports score, principal
    /// variation and depth. The score is remembered for [`EngineAdapter::last_score`].
    pub fn analyze<R: Rules>(
        &self,
        rules: &R,
        position: &R::Position,
        limit: SearchLimit,
    ) -> Option<AnalysisResult> {
        let mut state = self.state.lock();
        let result = self.search_locked(&mut state, rules, position, limit)?;
        if result.score.is_some() {
            state.last_score = result.score;
        }
        Some(result)
    }

    /// Terminate the session if one is running. Idempotent; never fails.
    pub fn stop(&self) {
        let mut state = self.state.lock();
        if let Some(mut session) = state.session.take() {
            info!("stopping engine");
            session.transport.shutdown();
        }
    }

    fn start_locked(&self, state: &mut SessionState) -> Result<(), EngineError> {
        if state.session.is_some() {
            return Ok(());
        }
        let Some(launcher) = &self.launcher else {
            return Err(EngineError::Unavailable {
                reason: "engine disabled".to_string(),
            });
        };

        let mut transport = launcher.launch()?;
        match handshake(transport.as_mut(), &self.config) {
            Ok(name) => {
                info!(
                    "engine ready: {}",
                    name.as_deref().unwrap_or("unnamed engine")
                );
                state.session = Some(Session { transport, name });
                Ok(())
            }
            Err(e) => {
                transport.shutdown();
                Err(EngineError::Unavailable {
                    reason: format!("handshake failed: {e}"),
                })
            }
        }
    }

    fn search_locked<R: Rules>(
        &self,
        state: &mut SessionState,
        rules: &R,
        position: &R::Position,
        limit: SearchLimit,
    ) -> Option<AnalysisResult> {
        if let Err(e) = self.start_locked(state) {
            match e {
                EngineError::Unavailable { ref reason } if !self.is_enabled() => {
                    debug!("{reason}");
                }
                _ => warn!("{e}"),
            }
            return None;
        }

        let session = state.session.as_mut()?;
        let fen = rules.fen(position);
        let outcome = run_search(session.transport.as_mut(), &fen, limit.bound(), &self.config)
            .and_then(|(best, summary)| decode(rules, position, best, summary))
            .map_err(EngineError::from);

        match outcome {
            Ok(result) => Some(result),
            Err(e) => {
                warn!("engine request failed, restarting on next use: {e}");
                if let Some(mut session) = state.session.take() {
                    session.transport.shutdown();
                }
                None
            }
        }
    }
}

impl Drop for EngineAdapter {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for EngineAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineAdapter")
            .field("enabled", &self.is_enabled())
            .field("running", &self.is_running())
            .field("config", &self.config)
            .finish()
    }
}

/// `uci`/`uciok`, configured options, then `isready`/`readyok`.
fn handshake(
    transport: &mut dyn Transport,
    config: &EngineConfig,
) -> Result<Option<String>, ProtocolError> {
    transport.send("uci")?;
    let mut name = None;
    read_until(transport, config.handshake_timeout, "uciok", |reply| match reply {
        EngineReply::IdName(n) => {
            name = Some(n);
            None
        }
        EngineReply::UciOk => Some(()),
        _ => None,
    })?;

    for (option, value) in &config.options {
        transport.send(&protocol::setoption_command(option, value.as_deref()))?;
    }

    transport.send("isready")?;
    read_until(transport, config.handshake_timeout, "readyok", |reply| {
        matches!(reply, EngineReply::ReadyOk).then_some(())
    })?;
    Ok(name)
}

/// Send one position and `go`, collect `info` lines until `bestmove`.
fn run_search(
    transport: &mut dyn Transport,
    fen: &str,
    bound: SearchBound,
    config: &EngineConfig,
) -> Result<(Option<String>, SearchInfo), ProtocolError> {
    let wait = match bound {
        SearchBound::Depth(_) => config.depth_timeout,
        SearchBound::MoveTime(budget) => budget + config.response_grace,
    };

    transport.send(&position_command(fen))?;
    transport.send(&go_command(bound))?;
    debug!("engine searching ({})", go_command(bound));

    let mut summary = SearchInfo::default();
    let best = read_until(transport, wait, "bestmove", |reply| match reply {
        EngineReply::Info(info) => {
            summary.merge(info);
            None
        }
        EngineReply::BestMove(best) => Some(best),
        _ => None,
    })?;
    Ok((best, summary))
}

/// Check the engine's answer against the legal moves of `position`.
fn decode<R: Rules>(
    rules: &R,
    position: &R::Position,
    best: Option<String>,
    summary: SearchInfo,
) -> Result<AnalysisResult, ProtocolError> {
    let best_move = best
        .map(|notation| {
            parse_legal_move(rules, position, &notation)
                .map_err(|_| ProtocolError::IllegalMove { notation })
        })
        .transpose()?;

    let mut principal_variation = Vec::with_capacity(summary.pv.len());
    let mut cursor = position.clone();
    for notation in &summary.pv {
        let Ok(mv) = parse_legal_move(rules, &cursor, notation) else {
            break;
        };
        let Some(next) = rules.apply_move(&cursor, mv) else {
            break;
        };
        principal_variation.push(mv);
        cursor = next;
    }

    Ok(AnalysisResult {
        best_move,
        score: summary.score,
        principal_variation,
        depth: summary.depth,
    })
}

/// Read lines until `accept` returns a value or `timeout` runs out.
fn read_until<T>(
    transport: &mut dyn Transport,
    timeout: Duration,
    waiting_for: &'static str,
    mut accept: impl FnMut(EngineReply) -> Option<T>,
) -> Result<T, ProtocolError> {
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(ProtocolError::Timeout { waiting_for });
        }
        let Some(line) = transport.recv(remaining)? else {
            return Err(ProtocolError::Timeout { waiting_for });
        };
        if let Some(value) = accept(parse_reply(&line)?) {
            return Ok(value);
        }
    }
}
