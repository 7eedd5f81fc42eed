//! MCTS node types for tree storage.
//!
//! Nodes live in an arena and refer to each other by index.

use crate::config::MctsConfig;
use santorini_core::{BoardState, Color, Ply};

/// Index into the node arena.
///
/// This is a lightweight handle that references a node in the tree.
/// Parents are referenced by index only, never owned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// Visit and win counters of one node.
///
/// Wins are counted for the color whose ply produced the node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeStats {
    /// N
    pub visits: u32,
    /// Q
    pub wins: u32,
    /// RAVE_N
    pub rave_visits: u32,
    /// RAVE_Q
    pub rave_wins: u32,
}

impl NodeStats {
    /// Mean reward, 0.0 if never visited.
    pub fn mean(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.wins as f64 / self.visits as f64
        }
    }

    /// Selection score of this node as a child of a parent visited
    /// `parent_visits` times.
    ///
    /// `(Q/N) * mctsWeight + (RAVE_Q/RAVE_N) * raveWeight
    ///  + bias * c * sqrt(ln(parent.N) / N)`
    ///
    /// Unvisited nodes score `+inf`.
    pub fn score(&self, parent_visits: u32, exploration_bias: f64, config: &MctsConfig) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        let n = self.visits as f64;
        let parent_n = parent_visits.max(1) as f64;

        let rave_weight = if config.use_rave {
            let k = config.rave_equilibrium;
            (k / (3.0 * parent_n + k)).sqrt()
        } else {
            0.0
        };
        let mcts_weight = 1.0 - rave_weight;

        let mut score = self.wins as f64 / n * mcts_weight;
        if config.use_rave && self.rave_visits > 0 {
            score += self.rave_wins as f64 / self.rave_visits as f64 * rave_weight;
        }
        score + exploration_bias * config.exploration_factor * (parent_n.ln() / n).sqrt()
    }
}

/// A node in the MCTS tree.
#[derive(Clone, Debug)]
pub struct Node {
    /// Position after `ply`. Never mutated once stored, apart from the
    /// blocked-loss winner recorded on expansion.
    pub state: BoardState,

    /// Ply that led here (None for root).
    pub ply: Option<Ply>,

    /// Sibling group: children sharing a worker step share a group.
    pub group: u16,

    pub parent: Option<NodeId>,

    /// Children in generation order; empty until expanded.
    pub children: Vec<NodeId>,

    pub stats: NodeStats,

    /// Heuristic weight used by weighted tie-breaks.
    pub sim_weight: f64,

    /// Early-game multiplier of the exploration term, set on first visit.
    pub exploration_bias: f64,
}

impl Node {
    /// Create a new unexpanded node.
    pub fn new(
        state: BoardState,
        ply: Option<Ply>,
        group: u16,
        parent: Option<NodeId>,
        sim_weight: f64,
    ) -> Self {
        Self {
            state,
            ply,
            group,
            parent,
            children: Vec::new(),
            stats: NodeStats::default(),
            sim_weight,
            exploration_bias: 1.0,
        }
    }

    /// Create the root node.
    pub fn root(state: BoardState) -> Self {
        Self::new(state, None, 0, None, 1.0)
    }

    /// The color whose ply produced this node. Rewards are counted for it.
    #[inline]
    pub fn color(&self) -> Color {
        self.state.to_move().opposite()
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    #[inline]
    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }
}
