//! Policy-weighted playouts.
//!
//! A rollout walks ephemeral states from a leaf to the end of the game,
//! sampling each ply by its simulation weight. Nothing it visits is stored
//! in the tree.

use rand::Rng;
use santorini_core::{BoardState, Color, Evaluator};

use crate::cache::{restamp, MoveSource};
use crate::config::MctsConfig;
use crate::policy::{pick_weighted, simulation_weights};

/// Outcome of one rollout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RolloutResult {
    pub winner: Color,
    /// Plies played before the game was decided
    pub plies: u32,
}

/// Play `start` out and report the winner.
///
/// With `config.rollout_cutoff = Some(n)`, a rollout still undecided after
/// `n` plies is settled by the evaluator: the color to move wins if its
/// score is non-negative.
pub fn rollout<E, R, S>(
    start: &BoardState,
    config: &MctsConfig,
    evaluator: &E,
    rng: &mut R,
    moves: &mut S,
) -> RolloutResult
where
    E: Evaluator + ?Sized,
    R: Rng + ?Sized,
    S: MoveSource,
{
    let mut state = *start;
    let mut plies = 0u32;

    loop {
        if let Some(winner) = evaluator.winner(&state) {
            return RolloutResult { winner, plies };
        }

        let mover = state.to_move();
        if config.rollout_cutoff.is_some_and(|cutoff| plies >= cutoff) {
            let winner = if evaluator.score(&state, mover) >= 0.0 {
                mover
            } else {
                mover.opposite()
            };
            return RolloutResult { winner, plies };
        }

        let next = moves.with_children(&state, |children| {
            if children.is_empty() {
                return None;
            }
            let weights = simulation_weights(&state, children, &config.simulation_weights);
            let pick = pick_weighted(&mut *rng, &weights);
            Some(restamp(&children[pick], &state))
        });

        match next {
            Some(child) => {
                state = child.state;
                plies += 1;
            }
            // Blocked mover loses
            None => {
                return RolloutResult {
                    winner: mover.opposite(),
                    plies,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{MoveCache, Uncached};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use santorini_core::HeuristicEvaluator;

    fn start() -> BoardState {
        BoardState::from_notation("0W0.0.0.0./0.0.0.0.0./0.0.0G0G0./0.0.0.0.0./0.0.0.0.0W w 4")
            .unwrap()
    }

    #[test]
    fn test_rollout_terminates() {
        let config = MctsConfig::default();
        let eval = HeuristicEvaluator::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..20 {
            let result = rollout(&start(), &config, &eval, &mut rng, &mut Uncached);
            assert!(result.plies > 0);
        }
    }

    #[test]
    fn test_rollout_is_seeded() {
        let config = MctsConfig::default();
        let eval = HeuristicEvaluator::default();
        let run = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rollout(&start(), &config, &eval, &mut rng, &mut Uncached)
        };
        assert_eq!(run(9), run(9));
    }

    #[test]
    fn test_cache_does_not_change_outcome() {
        let config = MctsConfig::default();
        let eval = HeuristicEvaluator::default();
        let mut cache = MoveCache::new(1000);
        for seed in 0..5 {
            let cached = rollout(
                &start(),
                &config,
                &eval,
                &mut ChaCha8Rng::seed_from_u64(seed),
                &mut cache,
            );
            let fresh = rollout(
                &start(),
                &config,
                &eval,
                &mut ChaCha8Rng::seed_from_u64(seed),
                &mut Uncached,
            );
            assert_eq!(cached, fresh);
        }
        assert!(cache.hits() > 0);
    }

    #[test]
    fn test_decided_start_returns_immediately() {
        let state = BoardState::from_notation(
            "3W0.0.0.0./0W0.0.0.0./0.0.0G0G0./0.0.0.0.0./0.0.0.0.0. g 11",
        )
        .unwrap();
        let config = MctsConfig::default();
        let eval = HeuristicEvaluator::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = rollout(&state, &config, &eval, &mut rng, &mut Uncached);
        assert_eq!(result, RolloutResult { winner: Color::White, plies: 0 });
    }

    #[test]
    fn test_blocked_mover_loses() {
        let state = BoardState::from_notation(
            "0G0G4X0.0W/4X4X4X0.0./0.0.0.0.0./0.0.0.0.0./0.0.0.0.0W g 9",
        )
        .unwrap();
        let config = MctsConfig::default();
        let eval = HeuristicEvaluator::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = rollout(&state, &config, &eval, &mut rng, &mut Uncached);
        assert_eq!(result.winner, Color::White);
    }

    #[test]
    fn test_cutoff_asks_evaluator() {
        let config = MctsConfig::default().with_rollout_cutoff(Some(0));
        let eval = HeuristicEvaluator::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = rollout(&start(), &config, &eval, &mut rng, &mut Uncached);
        assert_eq!(result.plies, 0);
        let expected = if eval.score(&start(), Color::White) >= 0.0 {
            Color::White
        } else {
            Color::Gray
        };
        assert_eq!(result.winner, expected);
    }
}
