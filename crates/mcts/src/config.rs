//! MCTS configuration parameters.
//!
//! Every tunable of the search lives here with a documented default. All
//! structs deserialize with `#[serde(default)]`, so a partial `[mcts]` table
//! in a TOML file overrides only the keys it names.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How to break ties between children with the same selection score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    /// Uniformly at random
    Uniform,
    /// Sampled proportionally to each child's simulation weight
    #[default]
    Weighted,
}

/// Relative weights used when sampling rollout plies and when breaking
/// selection ties in weighted mode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationWeights {
    /// Stepping onto level 3
    pub win: f64,
    /// Building on a cell the opponent could step onto to win
    pub block: f64,
    /// Building a level-3 cell next to a worker standing on level 2
    pub create: f64,
    /// Added per level of the destination for any other ply
    pub per_height: f64,
    /// Floor weight of any other ply
    pub base: f64,
}

impl Default for SimulationWeights {
    fn default() -> Self {
        Self {
            win: 1000.0,
            block: 100.0,
            create: 10.0,
            per_height: 1.0,
            base: 1.0,
        }
    }
}

/// Configuration for the Santorini tree search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// UCB1 exploration constant.
    pub exploration_factor: f64,

    /// Blend AMAF (RAVE) statistics into the selection score.
    pub use_rave: bool,

    /// RAVE equilibrium constant K in `sqrt(K / (3 * parent.N + K))`.
    /// Larger values keep the RAVE term influential for longer.
    pub rave_equilibrium: f64,

    /// Tie-break policy among maximal-score children.
    pub tie_break: TieBreak,

    /// Exploration bias applies while `turn <= early_game_turns`.
    pub early_game_turns: u32,

    /// Scale of the early-game exploration bias. 0 disables it.
    pub opening_bias_weight: f64,

    /// Rollout ply weights.
    pub simulation_weights: SimulationWeights,

    /// Rollouts run in parallel from each selected leaf.
    /// 1 keeps the search single-threaded.
    pub rollout_workers: usize,

    /// Stop a rollout after this many plies and let the evaluator decide.
    /// `None` plays every rollout to the end.
    pub rollout_cutoff: Option<u32>,

    /// Maximum number of positions memoised by the per-search move cache.
    pub move_cache_capacity: usize,

    /// Default rollout budget per move.
    pub max_rollouts: usize,

    /// Default wall-clock budget per move, in seconds.
    pub max_seconds: f64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            exploration_factor: 1.4,
            use_rave: true,
            rave_equilibrium: 1000.0,
            tie_break: TieBreak::Weighted,
            early_game_turns: 16,
            opening_bias_weight: 1.0,
            simulation_weights: SimulationWeights::default(),
            rollout_workers: 1,
            rollout_cutoff: None,
            move_cache_capacity: 200_000,
            max_rollouts: 5000,
            max_seconds: 30.0,
        }
    }
}

impl MctsConfig {
    /// Default config with the given rollout budget and no practical time cap.
    pub fn with_rollouts(max_rollouts: usize) -> Self {
        Self {
            max_rollouts,
            max_seconds: f64::INFINITY,
            ..Default::default()
        }
    }

    /// Plain UCB1: no RAVE, no opening bias, uniform tie-breaks.
    pub fn plain_ucb(max_rollouts: usize) -> Self {
        Self {
            use_rave: false,
            opening_bias_weight: 0.0,
            tie_break: TieBreak::Uniform,
            ..Self::with_rollouts(max_rollouts)
        }
    }

    pub fn with_exploration_factor(mut self, c: f64) -> Self {
        self.exploration_factor = c;
        self
    }

    pub fn with_rave(mut self, use_rave: bool) -> Self {
        self.use_rave = use_rave;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_rollout_workers(mut self, workers: usize) -> Self {
        self.rollout_workers = workers.max(1);
        self
    }

    pub fn with_rollout_cutoff(mut self, plies: Option<u32>) -> Self {
        self.rollout_cutoff = plies;
        self
    }

    pub fn with_time_budget(mut self, seconds: f64) -> Self {
        self.max_seconds = seconds;
        self
    }

    /// The budget implied by `max_rollouts` and `max_seconds`.
    pub fn limits(&self) -> SearchLimits {
        SearchLimits::new(self.max_rollouts, self.max_seconds)
    }
}

/// Stop condition of one `search` call: whichever budget runs out first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchLimits {
    pub max_rollouts: usize,
    pub max_time: Duration,
}

impl SearchLimits {
    /// Limits from a rollout cap and a time cap in seconds. Non-finite or
    /// negative seconds mean no time cap.
    pub fn new(max_rollouts: usize, max_seconds: f64) -> Self {
        let max_time = if max_seconds.is_finite() && max_seconds >= 0.0 {
            Duration::from_secs_f64(max_seconds)
        } else {
            Duration::MAX
        };
        Self {
            max_rollouts,
            max_time,
        }
    }

    /// Only a rollout cap.
    pub fn rollouts(max_rollouts: usize) -> Self {
        Self {
            max_rollouts,
            max_time: Duration::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert!((config.exploration_factor - 1.4).abs() < 1e-12);
        assert!(config.use_rave);
        assert_eq!(config.rave_equilibrium, 1000.0);
        assert_eq!(config.tie_break, TieBreak::Weighted);
        assert_eq!(config.early_game_turns, 16);
        assert_eq!(config.rollout_workers, 1);
        assert_eq!(config.rollout_cutoff, None);
        assert_eq!(config.max_rollouts, 5000);
        assert_eq!(config.simulation_weights.block, 100.0);
    }

    #[test]
    fn test_with_rollouts_has_no_time_cap() {
        let limits = MctsConfig::with_rollouts(100).limits();
        assert_eq!(limits.max_rollouts, 100);
        assert_eq!(limits.max_time, Duration::MAX);
    }

    #[test]
    fn test_plain_ucb() {
        let config = MctsConfig::plain_ucb(10);
        assert!(!config.use_rave);
        assert_eq!(config.tie_break, TieBreak::Uniform);
        assert_eq!(config.opening_bias_weight, 0.0);
    }

    #[test]
    fn test_workers_never_zero() {
        assert_eq!(MctsConfig::default().with_rollout_workers(0).rollout_workers, 1);
    }

    #[test]
    fn test_limits_from_seconds() {
        let limits = SearchLimits::new(5, 1.5);
        assert_eq!(limits.max_time, Duration::from_millis(1500));
        assert_eq!(SearchLimits::new(5, -1.0).max_time, Duration::MAX);
    }
}
