//! Building movers from command-line choices.

use anyhow::{Context, Result};
use clap::ValueEnum;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use santorini_core::{
    Evaluator, HeuristicEvaluator, LearnedEvaluator, LogisticModel, Mover, RandomMover,
};
use santorini_mcts::MctsMover;
use santorini_minimax::MinimaxMover;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::config::EngineConfig;

/// Which engine plays a color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MoverKind {
    Mcts,
    Minimax,
    Random,
}

impl fmt::Display for MoverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoverKind::Mcts => write!(f, "mcts"),
            MoverKind::Minimax => write!(f, "minimax"),
            MoverKind::Random => write!(f, "random"),
        }
    }
}

pub type SharedEvaluator = Arc<dyn Evaluator>;

/// The heuristic, or a logistic model loaded from `model` if given.
pub fn load_evaluator(model: Option<&Path>) -> Result<SharedEvaluator> {
    match model {
        Some(path) => {
            let model = LogisticModel::from_path(path)
                .with_context(|| format!("Failed to load model from {}", path.display()))?;
            Ok(Arc::new(LearnedEvaluator::new(model)))
        }
        None => Ok(Arc::new(HeuristicEvaluator::default())),
    }
}

pub fn build_mover(
    kind: MoverKind,
    config: &EngineConfig,
    evaluator: &SharedEvaluator,
    seed: u64,
) -> Box<dyn Mover> {
    let rng = ChaCha8Rng::seed_from_u64(seed);
    match kind {
        MoverKind::Mcts => Box::new(MctsMover::new(
            config.mcts.clone(),
            Arc::clone(evaluator),
            rng,
        )),
        MoverKind::Minimax => Box::new(MinimaxMover::new(
            config.minimax.clone(),
            Arc::clone(evaluator),
        )),
        MoverKind::Random => Box::new(RandomMover::new(rng)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movers_report_their_kind() {
        let evaluator = load_evaluator(None).unwrap();
        let config = EngineConfig::default();
        for kind in [MoverKind::Mcts, MoverKind::Minimax, MoverKind::Random] {
            let mover = build_mover(kind, &config, &evaluator, 1);
            assert_eq!(mover.name(), kind.to_string());
        }
    }

    #[test]
    fn test_missing_model_is_an_error() {
        let Err(err) = load_evaluator(Some(Path::new("/nonexistent/model.json"))) else {
            panic!("loading a missing model should fail");
        };
        assert!(err.to_string().contains("Failed to load model"));
    }
}
