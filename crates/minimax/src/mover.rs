//! Alpha-beta as a [`Mover`].

use santorini_core::{BoardState, Child, Evaluator, Mover, Phase, Result, SantoriniError};

use crate::alphabeta::AlphaBeta;
use crate::config::MinimaxConfig;

/// Searches `config.depth` plies for the color to move and scores from
/// that same color's point of view.
pub struct MinimaxMover<E: Evaluator> {
    config: MinimaxConfig,
    engine: AlphaBeta<E>,
}

impl<E: Evaluator> MinimaxMover<E> {
    pub fn new(config: MinimaxConfig, evaluator: E) -> Self {
        let engine = AlphaBeta::new(evaluator, &config);
        Self { config, engine }
    }

    pub fn config(&self) -> &MinimaxConfig {
        &self.config
    }
}

impl<E: Evaluator> Mover for MinimaxMover<E> {
    fn name(&self) -> &str {
        "minimax"
    }

    fn select_move(&mut self, state: &BoardState) -> Result<Option<Child>> {
        if state.phase() == Phase::Placement {
            return Err(SantoriniError::NotInPlay(state.to_move()));
        }
        let color = state.to_move();
        let outcome = self
            .engine
            .select_move(state, color, color, self.config.depth);
        Ok(outcome.best)
    }
}
