//! Configuration for the alpha-beta engine.

use serde::{Deserialize, Serialize};

/// Configuration for [`crate::AlphaBeta`] and [`crate::MinimaxMover`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimaxConfig {
    /// Plies searched from the root, the root ply included
    pub depth: u32,
    /// Sort interior children by their immediate score before recursing
    pub move_ordering: bool,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        Self {
            depth: 2,
            move_ordering: true,
        }
    }
}

impl MinimaxConfig {
    pub fn with_depth(depth: u32) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }

    pub fn with_move_ordering(mut self, enabled: bool) -> Self {
        self.move_ordering = enabled;
        self
    }
}
