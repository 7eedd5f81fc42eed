//! Heuristics steering the search: rollout ply weights, the early-game
//! exploration bias and weighted sampling.

use rand::Rng;
use santorini_core::{BoardState, Child, Color, Coord, HeuristicEvaluator, WINNING_HEIGHT};

use crate::config::{MctsConfig, SimulationWeights};

/// Weight of a generated child when sampling rollout plies.
///
/// `threats` are the cells the opponent of the mover could step onto to
/// win, as returned by [`BoardState::winning_cells`] on the parent.
pub fn simulation_weight(child: &Child, threats: &[Coord], weights: &SimulationWeights) -> f64 {
    let Some(build) = child.ply.build else {
        return weights.win;
    };
    if threats.contains(&build) {
        return weights.block;
    }

    let standing = child.state.height(child.ply.to);
    if standing == WINNING_HEIGHT - 1 && child.state.height(build) == WINNING_HEIGHT {
        return weights.create;
    }
    weights.base + weights.per_height * standing as f64
}

/// Weights for every child of `parent`, in order.
pub fn simulation_weights(
    parent: &BoardState,
    children: &[Child],
    weights: &SimulationWeights,
) -> Vec<f64> {
    let threats = parent.winning_cells(parent.to_move().opposite());
    children
        .iter()
        .map(|child| simulation_weight(child, &threats, weights))
        .collect()
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Multiplier of the exploration term for a node whose ply was made by
/// `mover`.
///
/// `1 + w * sigmoid(h + d)` while `turn <= early_game_turns`, where `h` is
/// the mover's worker height sum minus the opponent's and `d` is one minus
/// the normalised mean distance to the opponent's workers. `1` afterwards.
pub fn exploration_bias(state: &BoardState, mover: Color, config: &MctsConfig) -> f64 {
    if state.turn() > config.early_game_turns
        || state.is_terminal()
        || config.opening_bias_weight == 0.0
    {
        return 1.0;
    }
    let height_sum = |color: Color| -> f64 {
        state.workers(color).map(|c| state.height(c) as f64).sum()
    };
    let h = height_sum(mover) - height_sum(mover.opposite());
    let d = HeuristicEvaluator::proximity(state, mover);
    1.0 + config.opening_bias_weight * sigmoid(h + d)
}

/// Sample an index proportionally to `weights`.
///
/// Falls back to a uniform pick if the weights do not sum to a positive
/// finite value.
pub fn pick_weighted<R: Rng + ?Sized>(rng: &mut R, weights: &[f64]) -> usize {
    debug_assert!(!weights.is_empty(), "sampling from no candidates");
    let total: f64 = weights.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return rng.gen_range(0..weights.len());
    }

    let threshold = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }
    // Rounding left the threshold past the last bucket
    weights.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use santorini_core::Moves;

    fn children(state: &BoardState) -> Vec<Child> {
        match state.moves() {
            Moves::Available(children) => children,
            _ => unreachable!(),
        }
    }

    fn c(row: u8, col: u8) -> Coord {
        Coord::new(row, col).unwrap()
    }

    #[test]
    fn test_blocking_build_is_favoured() {
        // Gray on level 2 at (2,2) threatens the level-3 cell (2,3)
        let state = BoardState::from_notation(
            "0W0.0.0.0./0.0.0.0.0./0.0.2G3.0./0.0.0.0.0./0G0.0.0.0W w 9",
        )
        .unwrap();
        let weights = SimulationWeights::default();
        let all = children(&state);
        let scored = simulation_weights(&state, &all, &weights);
        for (child, w) in all.iter().zip(&scored) {
            if child.ply.build == Some(c(2, 3)) {
                assert_eq!(*w, weights.block);
            } else {
                assert!(*w < weights.block);
            }
        }
        assert!(all.iter().any(|child| child.ply.build == Some(c(2, 3))));
    }

    #[test]
    fn test_creating_a_threat_is_favoured() {
        // White can step onto the level-2 cell (1,1) and raise (1,2) to 3
        let state = BoardState::from_notation(
            "1W0.0.0.0./0.2.2.0.0./0.0.0.0.0./0.0.0.0.0./0G0G0.0.0W w 9",
        )
        .unwrap();
        let weights = SimulationWeights::default();
        let all = children(&state);
        let scored = simulation_weights(&state, &all, &weights);
        let creating = all
            .iter()
            .position(|ch| ch.ply.to == c(1, 1) && ch.ply.build == Some(c(1, 2)))
            .unwrap();
        assert_eq!(scored[creating], weights.create);
    }

    #[test]
    fn test_win_weight() {
        let state = BoardState::from_notation(
            "2W3.0.0.0./0.0.0.0.0./0.0.0G0G0./0.0.0.0.0./0.0.0.0.0W w 8",
        )
        .unwrap();
        let all = children(&state);
        let weights = SimulationWeights::default();
        assert_eq!(simulation_weights(&state, &all, &weights), vec![weights.win]);
    }

    #[test]
    fn test_bias_decays_after_opening() {
        let config = MctsConfig::default();
        let early = BoardState::from_notation(
            "0W0.0.0.0./0.0.0.0.0./0.0.0G0G0./0.0.0.0.0./0.0.0.0.0W g 5",
        )
        .unwrap();
        let bias = exploration_bias(&early, Color::White, &config);
        assert!(bias > 1.0 && bias < 2.0);
        let late = early.with_turn(17);
        assert_eq!(exploration_bias(&late, Color::White, &config), 1.0);
    }

    #[test]
    fn test_pick_weighted_respects_zero_weights() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..200 {
            let i = pick_weighted(&mut rng, &[0.0, 3.0, 0.0]);
            assert_eq!(i, 1);
        }
    }

    #[test]
    fn test_pick_weighted_prefers_heavy() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let heavy = (0..1000)
            .filter(|_| pick_weighted(&mut rng, &[1.0, 99.0]) == 1)
            .count();
        assert!(heavy > 900);
    }
}
