//! Difficulty tiers and the search budgets they map to.
//!
//! | Difficulty | Depth | Time  |
//! |------------|-------|-------|
//! | easy       | 5     | 0.2s  |
//! | medium     | 12    | 0.8s  |
//! | hard       | 20    | 2.0s  |

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use log::warn;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::InvalidDifficulty;

/// Named difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DifficultyTier {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 3] = [
        DifficultyTier::Easy,
        DifficultyTier::Medium,
        DifficultyTier::Hard,
    ];

    /// Resolve a tier name, falling back to `Medium` for anything unknown.
    #[must_use]
    pub fn parse_lossy(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            warn!("unknown difficulty '{name}', using medium");
            DifficultyTier::Medium
        })
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            DifficultyTier::Easy => "easy",
            DifficultyTier::Medium => "medium",
            DifficultyTier::Hard => "hard",
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DifficultyTier {
    type Err = InvalidDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(DifficultyTier::Easy),
            "medium" => Ok(DifficultyTier::Medium),
            "hard" => Ok(DifficultyTier::Hard),
            _ => Err(InvalidDifficulty(s.to_string())),
        }
    }
}

/// Budget for one engine request.
///
/// When both are set, depth is the binding limit sent to the engine and the
/// time budget only bounds how long we wait on a time-limited request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchLimit {
    pub depth: Option<u32>,
    pub time_budget: Option<Duration>,
}

impl SearchLimit {
    #[must_use]
    pub const fn new(depth: u32, time_budget: Duration) -> Self {
        SearchLimit {
            depth: Some(depth),
            time_budget: Some(time_budget),
        }
    }

    #[must_use]
    pub const fn depth(depth: u32) -> Self {
        SearchLimit {
            depth: Some(depth),
            time_budget: None,
        }
    }

    #[must_use]
    pub const fn time(time_budget: Duration) -> Self {
        SearchLimit {
            depth: None,
            time_budget: Some(time_budget),
        }
    }

    /// The limit actually sent with `go`.
    #[must_use]
    pub fn bound(&self) -> SearchBound {
        match (self.depth, self.time_budget) {
            (Some(depth), _) if depth > 0 => SearchBound::Depth(depth),
            (_, Some(time)) if !time.is_zero() => SearchBound::MoveTime(time),
            _ => SearchBound::Depth(1),
        }
    }
}

/// Which budget governs a single `go` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchBound {
    Depth(u32),
    MoveTime(Duration),
}

/// Budget for a tier.
#[must_use]
pub const fn limit_for(tier: DifficultyTier) -> SearchLimit {
    match tier {
        DifficultyTier::Easy => SearchLimit::new(5, Duration::from_millis(200)),
        DifficultyTier::Medium => SearchLimit::new(12, Duration::from_millis(800)),
        DifficultyTier::Hard => SearchLimit::new(20, Duration::from_millis(2000)),
    }
}

/// Active difficulty and its cached limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitPolicy {
    tier: DifficultyTier,
    limit: SearchLimit,
}

impl Default for LimitPolicy {
    fn default() -> Self {
        LimitPolicy::new(DifficultyTier::default())
    }
}

impl LimitPolicy {
    #[must_use]
    pub const fn new(tier: DifficultyTier) -> Self {
        LimitPolicy {
            tier,
            limit: limit_for(tier),
        }
    }

    /// Switch tier by name. Unknown names select `medium`.
    pub fn set_difficulty(&mut self, name: &str) -> DifficultyTier {
        self.set_tier(DifficultyTier::parse_lossy(name));
        self.tier
    }

    pub fn set_tier(&mut self, tier: DifficultyTier) {
        self.tier = tier;
        self.limit = limit_for(tier);
    }

    #[must_use]
    pub const fn current_difficulty(&self) -> DifficultyTier {
        self.tier
    }

    #[must_use]
    pub const fn current_limit(&self) -> SearchLimit {
        self.limit
    }

    /// The limit for one call: the override if given, else the active tier's.
    #[must_use]
    pub fn resolve(&self, override_limit: Option<SearchLimit>) -> SearchLimit {
        override_limit.unwrap_or(self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_tiers() {
        assert_eq!(
            limit_for(DifficultyTier::Easy),
            SearchLimit::new(5, Duration::from_millis(200))
        );
        assert_eq!(
            limit_for(DifficultyTier::Medium),
            SearchLimit::new(12, Duration::from_millis(800))
        );
        assert_eq!(
            limit_for(DifficultyTier::Hard),
            SearchLimit::new(20, Duration::from_secs(2))
        );
    }

    #[test]
    fn budgets_increase_with_difficulty() {
        for pair in DifficultyTier::ALL.windows(2) {
            let (lower, higher) = (limit_for(pair[0]), limit_for(pair[1]));
            assert!(lower.depth < higher.depth);
            assert!(lower.time_budget < higher.time_budget);
        }
    }

    #[test]
    fn unknown_tier_coerces_to_medium() {
        let mut policy = LimitPolicy::new(DifficultyTier::Hard);
        assert_eq!(policy.set_difficulty("nonsense"), DifficultyTier::Medium);
        assert_eq!(policy.current_difficulty().to_string(), "medium");
        assert_eq!(policy.current_limit(), limit_for(DifficultyTier::Medium));
        let err = "nonsense".parse::<DifficultyTier>().unwrap_err();
        assert_eq!(err, InvalidDifficulty("nonsense".to_string()));
        assert_eq!(err.to_string(), "Unknown difficulty 'nonsense'");
    }

    #[test]
    fn set_difficulty_updates_cached_limit() {
        let mut policy = LimitPolicy::default();
        policy.set_difficulty("HARD");
        assert_eq!(policy.current_difficulty(), DifficultyTier::Hard);
        assert_eq!(
            policy.current_limit(),
            SearchLimit {
                depth: Some(20),
                time_budget: Some(Duration::from_secs_f64(2.0)),
            }
        );
    }

    #[test]
    fn override_wins_for_one_call() {
        let policy = LimitPolicy::new(DifficultyTier::Easy);
        let quick = SearchLimit::time(Duration::from_millis(50));
        assert_eq!(policy.resolve(Some(quick)), quick);
        assert_eq!(policy.resolve(None), limit_for(DifficultyTier::Easy));
    }

    #[test]
    fn depth_takes_precedence_over_time() {
        assert_eq!(
            SearchLimit::new(8, Duration::from_secs(1)).bound(),
            SearchBound::Depth(8)
        );
        assert_eq!(
            SearchLimit::time(Duration::from_millis(300)).bound(),
            SearchBound::MoveTime(Duration::from_millis(300))
        );
    }
}
