//! Static position evaluation.
//!
//! The `Evaluator` trait is the single seam between the search engines and
//! whatever scores positions: the built-in height/mobility/proximity
//! heuristic or a learned model (see [`crate::model`]).

use std::sync::Arc;

use crate::board::BoardState;
use crate::types::Color;

/// Magnitude returned for decided games. Also the alpha-beta window bound.
pub const WIN_SCORE: f64 = 100_000.0;

/// Scores positions from a chosen color's perspective.
///
/// Implementations must return a finite value for every undecided state and
/// `±WIN_SCORE` for decided ones.
pub trait Evaluator: Send + Sync {
    /// Score `state` for `perspective`; higher is better for that color.
    fn score(&self, state: &BoardState, perspective: Color) -> f64;

    fn is_terminal(&self, state: &BoardState) -> bool {
        state.is_terminal()
    }

    fn winner(&self, state: &BoardState) -> Option<Color> {
        state.winner()
    }
}

impl<E: Evaluator + ?Sized> Evaluator for &E {
    fn score(&self, state: &BoardState, perspective: Color) -> f64 {
        (**self).score(state, perspective)
    }
}

impl<E: Evaluator + ?Sized> Evaluator for Box<E> {
    fn score(&self, state: &BoardState, perspective: Color) -> f64 {
        (**self).score(state, perspective)
    }
}

impl<E: Evaluator + ?Sized> Evaluator for Arc<E> {
    fn score(&self, state: &BoardState, perspective: Color) -> f64 {
        (**self).score(state, perspective)
    }
}

/// Sentinel score of a decided state, or `None` if play continues.
pub fn terminal_score(state: &BoardState, perspective: Color) -> Option<f64> {
    state.winner().map(|winner| {
        if winner == perspective {
            WIN_SCORE
        } else {
            -WIN_SCORE
        }
    })
}

/// Hand-tuned heuristic.
///
/// Sum of `height_weights[level]` over own workers, minus a penalty per
/// opponent worker step, plus a bonus for standing close to the opponent.
#[derive(Clone, Debug)]
pub struct HeuristicEvaluator {
    /// Weight of a worker standing on level 0..=3
    pub height_weights: [f64; 4],
    /// Penalty per step available to the opponent
    pub mobility_penalty: f64,
    /// Weight of the normalised proximity term
    pub proximity_weight: f64,
}

impl Default for HeuristicEvaluator {
    fn default() -> Self {
        Self {
            height_weights: [1.0, 4.0, 16.0, 64.0],
            mobility_penalty: 0.25,
            proximity_weight: 1.0,
        }
    }
}

/// Largest distance between two cells on the board.
const MAX_DISTANCE: f64 = 5.656_854_249_492_381; // sqrt(32)

impl HeuristicEvaluator {
    /// One minus the mean own-to-opponent worker distance, normalised.
    pub fn proximity(state: &BoardState, perspective: Color) -> f64 {
        let mut total = 0.0;
        let mut pairs = 0usize;
        for own in state.workers(perspective) {
            for other in state.workers(perspective.opposite()) {
                total += own.distance(other);
                pairs += 1;
            }
        }
        if pairs == 0 {
            return 0.0;
        }
        1.0 - total / pairs as f64 / MAX_DISTANCE
    }
}

impl Evaluator for HeuristicEvaluator {
    fn score(&self, state: &BoardState, perspective: Color) -> f64 {
        if let Some(score) = terminal_score(state, perspective) {
            return score;
        }

        let heights: f64 = state
            .workers(perspective)
            .map(|c| self.height_weights[state.height(c).min(3) as usize])
            .sum();
        let opponent_steps = state.mobility(perspective.opposite()) as f64;

        heights - self.mobility_penalty * opponent_steps
            + self.proximity_weight * Self::proximity(state, perspective)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(notation: &str) -> BoardState {
        BoardState::from_notation(notation).unwrap()
    }

    #[test]
    fn test_terminal_uses_sentinel() {
        let state = board("3W0.0.0.0./0W0.0.0.0./0.0.0G0G0./0.0.0.0.0./0.0.0.0.0. g 11");
        let eval = HeuristicEvaluator::default();
        assert_eq!(eval.score(&state, Color::White), WIN_SCORE);
        assert_eq!(eval.score(&state, Color::Gray), -WIN_SCORE);
    }

    #[test]
    fn test_higher_ground_scores_better() {
        let low = board("1.0.0.0.0./0W0.0.0.0./0.0.0G0G0./0.0.0.0.0./0.0.0.0.0W g 5");
        let high = board("1W0.0.0.0./0.0.0.0.0./0.0.0G0G0./0.0.0.0.0./0.0.0.0.0W g 5");
        let eval = HeuristicEvaluator::default();
        assert!(eval.score(&high, Color::White) > eval.score(&low, Color::White));
    }

    #[test]
    fn test_score_is_finite_for_open_positions() {
        let state = board("0W0.0.0.0./0.0.0.0.0./0.0.0G0G0./0.0.0.0.0./0.0.0.0.0W w 4");
        let eval = HeuristicEvaluator::default();
        for color in Color::ALL {
            assert!(eval.score(&state, color).is_finite());
        }
    }

    #[test]
    fn test_proximity_range() {
        let state = board("0W0.0.0.0./0.0.0.0.0./0.0.0G0G0./0.0.0.0.0./0.0.0.0.0W w 4");
        let p = HeuristicEvaluator::proximity(&state, Color::White);
        assert!((0.0..=1.0).contains(&p));
    }
}
