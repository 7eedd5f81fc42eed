//! Engine settings file.
//!
//! A TOML file with optional `[mcts]` and `[minimax]` tables. Missing keys
//! keep their defaults; command-line flags are applied on top.

use santorini_mcts::MctsConfig;
use santorini_minimax::MinimaxConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub mcts: MctsConfig,
    pub minimax: MinimaxConfig,
}

/// Command-line values that take precedence over the file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub rollouts: Option<usize>,
    pub seconds: Option<f64>,
    pub workers: Option<usize>,
    pub depth: Option<u32>,
}

impl EngineConfig {
    /// Load from `path`, falling back to defaults if it cannot be read or
    /// parsed.
    pub fn load_from_path(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    info!("Loaded engine config from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn apply(mut self, overrides: &Overrides) -> Self {
        if let Some(rollouts) = overrides.rollouts {
            self.mcts.max_rollouts = rollouts;
        }
        if let Some(seconds) = overrides.seconds {
            self.mcts = self.mcts.with_time_budget(seconds);
        }
        if let Some(workers) = overrides.workers {
            self.mcts = self.mcts.with_rollout_workers(workers);
        }
        if let Some(depth) = overrides.depth {
            self.minimax.depth = depth;
        }
        self
    }
}
