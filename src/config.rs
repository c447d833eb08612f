//! Runtime configuration for the decision policy and its engine session.
//!
//! Settings come from three places, later ones winning: built-in defaults,
//! `CHESS_AI_*` environment variables, and UCI-style
//! `setoption name <name> value <value>` lines.

use std::path::PathBuf;
use std::time::Duration;

use log::{debug, warn};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::limits::DifficultyTier;

/// Default engine binary, resolved through `PATH`.
pub const DEFAULT_ENGINE_PATH: &str = "stockfish";

pub const ENV_ENGINE: &str = "CHESS_AI_ENGINE";
pub const ENV_DIFFICULTY: &str = "CHESS_AI_DIFFICULTY";
pub const ENV_NO_ENGINE: &str = "CHESS_AI_NO_ENGINE";

/// How to launch and talk to the external engine.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineConfig {
    pub path: PathBuf,
    pub args: Vec<String>,
    /// Engine options sent as `setoption` during the handshake, in order
    pub options: Vec<(String, Option<String>)>,
    /// Deadline for each of `uciok` and `readyok`
    pub handshake_timeout: Duration,
    /// Slack added to a `movetime` budget before giving up on `bestmove`
    pub response_grace: Duration,
    /// Deadline for a depth-bounded search
    pub depth_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            path: PathBuf::from(DEFAULT_ENGINE_PATH),
            args: Vec::new(),
            options: Vec::new(),
            handshake_timeout: Duration::from_secs(5),
            response_grace: Duration::from_secs(1),
            depth_timeout: Duration::from_secs(30),
        }
    }
}

impl EngineConfig {
    /// Record an engine option, replacing an earlier value for the same name.
    pub fn set_option(&mut self, name: &str, value: Option<&str>) {
        let value = value.map(str::to_string);
        match self
            .options
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value,
            None => self.options.push((name.to_string(), value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AiConfig {
    pub difficulty: DifficultyTier,
    /// When false the engine is never launched
    pub use_engine: bool,
    /// Report a material count when the engine has no score
    pub evaluation_fallback: bool,
    pub engine: EngineConfig,
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig {
            difficulty: DifficultyTier::default(),
            use_engine: true,
            evaluation_fallback: true,
            engine: EngineConfig::default(),
        }
    }
}

/// What a `setoption` line changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliedOption {
    /// Only the difficulty tier
    Difficulty(DifficultyTier),
    /// Policy behavior; the engine session is unaffected
    Policy,
    /// Anything that needs a fresh engine session to take effect
    Engine,
}

impl AiConfig {
    /// Defaults overlaid with the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with variables looked up through `var`.
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AiConfig::default();
        if let Some(path) = var(ENV_ENGINE).filter(|p| !p.trim().is_empty()) {
            config.engine.path = PathBuf::from(path.trim());
        }
        if let Some(name) = var(ENV_DIFFICULTY) {
            config.difficulty = DifficultyTier::parse_lossy(&name);
        }
        if let Some(flag) = var(ENV_NO_ENGINE) {
            // Presence disables the engine unless explicitly falsy.
            config.use_engine = parse_bool(&flag) == Some(false);
        }
        config
    }

    /// Apply one option. Names are case-insensitive; unknown names are
    /// forwarded to the engine on its next handshake.
    pub fn apply_setoption(&mut self, name: &str, value: Option<&str>) -> AppliedOption {
        let normalized = name.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "difficulty" | "skill" => {
                self.difficulty = DifficultyTier::parse_lossy(value.unwrap_or_default());
                AppliedOption::Difficulty(self.difficulty)
            }
            "useengine" | "use engine" => {
                self.use_engine = bool_or(value, self.use_engine, name);
                AppliedOption::Policy
            }
            "evaluation fallback" => {
                self.evaluation_fallback = bool_or(value, self.evaluation_fallback, name);
                AppliedOption::Policy
            }
            "enginepath" | "engine path" => {
                if let Some(path) = value.map(str::trim).filter(|p| !p.is_empty()) {
                    self.engine.path = PathBuf::from(path);
                }
                AppliedOption::Engine
            }
            "handshake timeout" => {
                millis_into(value, &mut self.engine.handshake_timeout, name);
                AppliedOption::Engine
            }
            "response grace" => {
                millis_into(value, &mut self.engine.response_grace, name);
                AppliedOption::Engine
            }
            "depth timeout" => {
                millis_into(value, &mut self.engine.depth_timeout, name);
                AppliedOption::Engine
            }
            _ => {
                debug!("forwarding option '{}' to the engine", name.trim());
                self.engine.set_option(name.trim(), value);
                AppliedOption::Engine
            }
        }
    }
}

/// Split a `setoption name <name> [value <value>]` line into its parts.
///
/// Names and values may span several words. The first `value` token after
/// the name ends it; an empty value is reported as `None`.
#[must_use]
pub fn parse_setoption(parts: &[&str]) -> Option<(String, Option<String>)> {
    let ["setoption", "name", rest @ ..] = parts else {
        return None;
    };
    let (name, value) = match rest.iter().position(|&word| word == "value") {
        Some(at) => (&rest[..at], &rest[at + 1..]),
        None => (rest, &[][..]),
    };
    if name.is_empty() {
        return None;
    }
    let value = (!value.is_empty()).then(|| value.join(" "));
    Some((name.join(" "), value))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn bool_or(value: Option<&str>, current: bool, name: &str) -> bool {
    match value.and_then(parse_bool) {
        Some(flag) => flag,
        None => {
            warn!("option '{name}' expects true or false, keeping {current}");
            current
        }
    }
}

fn millis_into(value: Option<&str>, slot: &mut Duration, name: &str) {
    match value.and_then(|v| v.trim().parse::<u64>().ok()) {
        Some(ms) => *slot = Duration::from_millis(ms),
        None => warn!("option '{name}' expects milliseconds, keeping {slot:?}"),
    }
}
