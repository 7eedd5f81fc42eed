//! MCTS as a [`Mover`]: a fresh tree for every ply.

use rand::Rng;
use santorini_core::{BoardState, Child, Evaluator, Mover, Phase, Result, SantoriniError};
use tracing::debug;

use crate::config::MctsConfig;
use crate::search::MctsSearch;

/// Plays by running a full search from each position it is handed.
pub struct MctsMover<E: Evaluator, R: Rng + Send> {
    config: MctsConfig,
    evaluator: E,
    rng: R,
}

impl<E: Evaluator, R: Rng + Send> MctsMover<E, R> {
    pub fn new(config: MctsConfig, evaluator: E, rng: R) -> Self {
        Self {
            config,
            evaluator,
            rng,
        }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }
}

impl<E: Evaluator, R: Rng + Send> Mover for MctsMover<E, R> {
    fn name(&self) -> &str {
        "mcts"
    }

    fn select_move(&mut self, state: &BoardState) -> Result<Option<Child>> {
        if state.phase() == Phase::Placement {
            return Err(SantoriniError::NotInPlay(state.to_move()));
        }
        let mut search = MctsSearch::new(
            *state,
            self.config.clone(),
            &self.evaluator,
            &mut self.rng,
        );
        let stats = search.search(self.config.limits());
        let choice = search.best_move();
        debug!(
            turn = state.turn(),
            rollouts = stats.rollouts,
            tree_size = stats.tree_size,
            ply = ?choice.map(|c| c.ply),
            "mcts move"
        );
        Ok(choice)
    }
}
