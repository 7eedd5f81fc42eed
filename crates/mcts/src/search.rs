//! Monte Carlo Tree Search implementation.
//!
//! UCB1 selection with optional RAVE blending, expansion through the move
//! generator, policy-weighted rollouts and win/loss backpropagation. The
//! search is anytime: it stops when the rollout or time budget runs out and
//! `best_move` always has an answer for an undecided root.

use crate::{
    cache::{restamp, MoveCache, MoveSource, Uncached},
    config::{MctsConfig, SearchLimits, TieBreak},
    node::{NodeId, NodeStats},
    policy::{exploration_bias, pick_weighted, simulation_weights},
    rollout::rollout,
    tree::Tree,
};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use santorini_core::{BoardState, Child, Color, Evaluator, Moves, Ply};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Counters of one `search` call.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SearchStats {
    /// Completed rollouts (each counted individually, also in parallel mode)
    pub rollouts: usize,
    /// Nodes in the tree, root included
    pub tree_size: usize,
    pub elapsed: Duration,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Positions held by the move cache when the search stopped
    pub cache_entries: usize,
    /// Deepest leaf reached by selection
    pub max_depth: usize,
}

impl SearchStats {
    /// Fraction of move-generation requests served from the cache.
    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }
}

/// Summary of one root child for display.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChildSummary {
    pub ply: Ply,
    /// Sibling group of the worker step
    pub group: u16,
    pub visits: u32,
    pub wins: u32,
    pub rave_visits: u32,
    pub rave_wins: u32,
    pub mean: f64,
}

/// Monte Carlo Tree Search over Santorini positions.
///
/// Generic over:
/// - `E`: the evaluator consulted for rollout cutoffs
/// - `R`: the random number generator driving tie-breaks and rollouts
///
/// One instance owns one tree for one root. The tree is discarded when a
/// new root is installed with [`MctsSearch::reset`].
pub struct MctsSearch<E: Evaluator, R: Rng> {
    config: MctsConfig,
    evaluator: E,
    rng: R,
    tree: Tree,
}

impl<E, R> MctsSearch<E, R>
where
    E: Evaluator,
    R: Rng,
{
    /// Create a search rooted at `root`.
    pub fn new(root: BoardState, config: MctsConfig, evaluator: E, rng: R) -> Self {
        Self {
            config,
            evaluator,
            rng,
            tree: Tree::new(root),
        }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    pub fn root_state(&self) -> &BoardState {
        &self.tree.root().state
    }

    /// Statistics of the root node.
    pub fn root_stats(&self) -> &NodeStats {
        &self.tree.root().stats
    }

    pub fn tree_size(&self) -> usize {
        self.tree.len()
    }

    /// Throw the tree away and search from `root` next.
    pub fn reset(&mut self, root: BoardState) {
        self.tree.reset(root);
    }

    /// Run select/expand/simulate/backpropagate until a budget runs out.
    ///
    /// Calling `search` again continues growing the same tree.
    pub fn search(&mut self, limits: SearchLimits) -> SearchStats {
        let start = Instant::now();
        let mut cache = MoveCache::new(self.config.move_cache_capacity);
        let mut stats = SearchStats::default();

        if self.tree.root().is_terminal() {
            stats.tree_size = self.tree.len();
            return stats;
        }

        while stats.rollouts < limits.max_rollouts && start.elapsed() < limits.max_time {
            let leaf = self.select_leaf(&mut cache);
            stats.max_depth = stats.max_depth.max(self.tree.depth(leaf));

            let budget = limits.max_rollouts - stats.rollouts;
            for winner in self.simulate(leaf, budget) {
                self.backpropagate(leaf, winner);
                stats.rollouts += 1;
            }
        }

        stats.tree_size = self.tree.len();
        stats.elapsed = start.elapsed();
        stats.cache_hits = cache.hits();
        stats.cache_misses = cache.misses();
        stats.cache_entries = cache.len();
        debug!(
            rollouts = stats.rollouts,
            tree_size = stats.tree_size,
            max_depth = stats.max_depth,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            cache_hit_rate = stats.cache_hit_rate(),
            "search finished"
        );
        stats
    }

    /// Walk down from the root to the node to simulate from.
    ///
    /// - a terminal node is returned as is;
    /// - an unvisited node (other than the root) is returned unexpanded;
    /// - a visited, childless node is expanded and one of its children is
    ///   picked with the tie-break policy;
    /// - otherwise descend to the best-scoring child.
    fn select_leaf(&mut self, cache: &mut MoveCache) -> NodeId {
        let mut id = NodeId::ROOT;
        loop {
            let node = self.tree.get(id);
            if node.is_terminal() {
                return id;
            }
            if !node.is_expanded() {
                if node.stats.visits == 0 && id != NodeId::ROOT {
                    return id;
                }
                if !self.expand(id, cache) {
                    return id;
                }
                let children = self.tree.get(id).children.clone();
                return self.break_tie(&children);
            }
            id = self.select_child(id);
        }
    }

    /// Add every legal child of `id`. Returns false if the mover turned out
    /// to be blocked, in which case the node is marked as a loss for it.
    fn expand(&mut self, id: NodeId, cache: &mut MoveCache) -> bool {
        let state = self.tree.get(id).state;
        let weights = &self.config.simulation_weights;
        let children: Vec<(Child, f64)> = cache.with_children(&state, |children| {
            let sim = simulation_weights(&state, children, weights);
            children
                .iter()
                .map(|c| restamp(c, &state))
                .zip(sim)
                .collect()
        });

        if children.is_empty() {
            trace!(node = id.index(), "mover blocked, marking loss");
            self.tree.get_mut(id).state = state.declare_blocked(state.to_move());
            return false;
        }

        trace!(node = id.index(), children = children.len(), "expanded");
        for (child, weight) in children {
            self.tree.add_child(id, child, weight);
        }
        true
    }

    /// Child of `id` with the highest selection score.
    fn select_child(&mut self, id: NodeId) -> NodeId {
        let node = self.tree.get(id);
        let parent_visits = node.stats.visits;

        let mut best: Vec<NodeId> = Vec::new();
        let mut best_score = f64::NEG_INFINITY;
        for &child_id in &node.children {
            let child = self.tree.get(child_id);
            let score = child
                .stats
                .score(parent_visits, child.exploration_bias, &self.config);
            if score > best_score {
                best_score = score;
                best.clear();
                best.push(child_id);
            } else if score == best_score {
                best.push(child_id);
            }
        }

        // INVARIANT: only called on expanded nodes
        assert!(!best.is_empty(), "BUG: select_child called on node without children");
        self.break_tie(&best)
    }

    /// Pick one of several equally good candidates.
    fn break_tie(&mut self, candidates: &[NodeId]) -> NodeId {
        if candidates.len() == 1 {
            return candidates[0];
        }
        match self.config.tie_break {
            TieBreak::Uniform => candidates[self.rng.gen_range(0..candidates.len())],
            TieBreak::Weighted => {
                let weights: Vec<f64> = candidates
                    .iter()
                    .map(|&c| self.tree.get(c).sim_weight)
                    .collect();
                candidates[pick_weighted(&mut self.rng, &weights)]
            }
        }
    }

    /// Run rollouts from `leaf`: one on the search thread, or up to
    /// `rollout_workers` on the rayon pool. Results come back in worker order.
    ///
    /// Rollout positions are almost never revisited, so rollouts generate
    /// plies afresh and only expansion goes through the move cache.
    fn simulate(&mut self, leaf: NodeId, budget: usize) -> Vec<Color> {
        let state = self.tree.get(leaf).state;
        if let Some(winner) = state.winner() {
            return vec![winner];
        }

        let workers = self.config.rollout_workers.max(1).min(budget.max(1));
        if workers == 1 {
            let result = rollout(
                &state,
                &self.config,
                &self.evaluator,
                &mut self.rng,
                &mut Uncached,
            );
            trace!(node = leaf.index(), plies = result.plies, winner = %result.winner, "rollout");
            return vec![result.winner];
        }

        let seeds: Vec<u64> = (0..workers).map(|_| self.rng.gen()).collect();
        let config = &self.config;
        let evaluator = &self.evaluator;
        seeds
            .par_iter()
            .map(|&seed| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                rollout(&state, config, evaluator, &mut rng, &mut Uncached).winner
            })
            .collect()
    }

    /// Credit one rollout result from `leaf` up to the root.
    ///
    /// Each node gains one visit and a win if its color won. With RAVE on,
    /// every sibling sharing the node's group (the node included) gets the
    /// same update in its RAVE counters.
    fn backpropagate(&mut self, leaf: NodeId, winner: Color) {
        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = self.tree.get(id);
            let color = node.color();
            let reward = u32::from(color == winner);
            let parent = node.parent;
            let group = node.group;

            if node.stats.visits == 0 {
                let bias = exploration_bias(&node.state, color, &self.config);
                self.tree.get_mut(id).exploration_bias = bias;
            }
            let stats = &mut self.tree.get_mut(id).stats;
            stats.visits += 1;
            stats.wins += reward;

            if self.config.use_rave {
                if let Some(parent) = parent {
                    let siblings = self.tree.get(parent).children.clone();
                    for sibling in siblings {
                        let node = self.tree.get_mut(sibling);
                        if node.group == group {
                            node.stats.rave_visits += 1;
                            node.stats.rave_wins += reward;
                        }
                    }
                }
            }
            current = parent;
        }
    }

    /// The most visited root child, ties broken uniformly at random.
    ///
    /// Falls back to the first generated child if the root was never
    /// expanded. Returns `None` only if the root is decided or its mover is
    /// blocked.
    pub fn best_move(&mut self) -> Option<Child> {
        let root = self.tree.root();
        if root.is_terminal() {
            return None;
        }
        if !root.is_expanded() {
            return match root.state.moves() {
                Moves::Available(children) => children.first().copied(),
                Moves::Blocked(_) | Moves::Decided(_) => None,
            };
        }

        let most = root
            .children
            .iter()
            .map(|&c| self.tree.get(c).stats.visits)
            .max()?;
        let top: Vec<NodeId> = root
            .children
            .iter()
            .copied()
            .filter(|&c| self.tree.get(c).stats.visits == most)
            .collect();
        let &pick = top.choose(&mut self.rng)?;

        let node = self.tree.get(pick);
        let ply = node
            .ply
            .expect("BUG: non-root node without the ply that produced it");
        Some(Child {
            ply,
            state: node.state,
            group: node.group,
        })
    }

    /// Statistics of every root child, in generation order.
    pub fn root_children(&self) -> Vec<ChildSummary> {
        self.tree
            .root()
            .children
            .iter()
            .filter_map(|&id| {
                let node = self.tree.get(id);
                node.ply.map(|ply| ChildSummary {
                    ply,
                    group: node.group,
                    visits: node.stats.visits,
                    wins: node.stats.wins,
                    rave_visits: node.stats.rave_visits,
                    rave_wins: node.stats.rave_wins,
                    mean: node.stats.mean(),
                })
            })
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn tree(&self) -> &Tree {
        &self.tree
    }
}
