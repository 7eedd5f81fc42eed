//! Depth-limited minimax with alpha-beta pruning.
//!
//! Scores are always from one fixed color's point of view (`eval_color`):
//! that color maximizes, its opponent minimizes. Decided positions score
//! `±WIN_SCORE`, which also bounds the search window, so every value stays
//! finite. Leaves at the depth cutoff are scored by the [`Evaluator`].

use santorini_core::evaluator::terminal_score;
use santorini_core::{BoardState, Child, Color, Evaluator, Moves, WIN_SCORE};
use tracing::debug;

use crate::config::MinimaxConfig;

/// Result of one root search.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchOutcome {
    /// Chosen child, `None` if the mover had no legal ply
    pub best: Option<Child>,
    /// Value of `best` for the evaluating color
    pub score: f64,
    /// Positions visited, root excluded
    pub nodes: u64,
}

/// Alpha-beta searcher over a static evaluator.
#[derive(Clone, Debug)]
pub struct AlphaBeta<E: Evaluator> {
    evaluator: E,
    move_ordering: bool,
}

impl<E: Evaluator> AlphaBeta<E> {
    pub fn new(evaluator: E, config: &MinimaxConfig) -> Self {
        Self {
            evaluator,
            move_ordering: config.move_ordering,
        }
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Pick a ply for `mover` looking `depth` plies ahead.
    ///
    /// The root children are tried in generation order and a later child
    /// replaces the current best only if it scores strictly better for
    /// `eval_color`, so the choice does not depend on interior ordering.
    /// A depth of 0 is treated as 1.
    pub fn select_move(
        &self,
        state: &BoardState,
        mover: Color,
        eval_color: Color,
        depth: u32,
    ) -> SearchOutcome {
        let maximizing = mover == eval_color;
        let mut nodes = 0u64;

        if let Some(score) = terminal_score(state, eval_color) {
            return SearchOutcome { best: None, score, nodes };
        }
        let children = state.legal_moves(mover);
        if children.is_empty() {
            let score = terminal_score(&state.declare_blocked(mover), eval_color)
                .expect("BUG: blocked state without a winner");
            return SearchOutcome { best: None, score, nodes };
        }

        let mut alpha = -WIN_SCORE;
        let mut beta = WIN_SCORE;
        let mut best: Option<(Child, f64)> = None;

        for child in children {
            let value = self.alphabeta(
                &child.state,
                depth.max(1) - 1,
                alpha,
                beta,
                !maximizing,
                eval_color,
                &mut nodes,
            );
            let improves = match best {
                None => true,
                Some((_, score)) if maximizing => value > score,
                Some((_, score)) => value < score,
            };
            if improves {
                best = Some((child, value));
                if maximizing {
                    alpha = alpha.max(value);
                } else {
                    beta = beta.min(value);
                }
            }
        }

        let (best, score) = best.expect("BUG: non-empty root produced no choice");
        debug!(
            mover = %mover,
            depth,
            nodes,
            score,
            ply = %best.ply,
            "alpha-beta move"
        );
        SearchOutcome {
            best: Some(best),
            score,
            nodes,
        }
    }

    /// Value of `state` for `eval_color`. The color to move in `state`
    /// maximizes iff `maximizing`.
    #[allow(clippy::too_many_arguments)]
    fn alphabeta(
        &self,
        state: &BoardState,
        depth: u32,
        mut alpha: f64,
        mut beta: f64,
        maximizing: bool,
        eval_color: Color,
        nodes: &mut u64,
    ) -> f64 {
        *nodes += 1;

        if let Some(score) = terminal_score(state, eval_color) {
            return score;
        }
        if depth == 0 {
            return self.evaluator.score(state, eval_color);
        }
        let mut children = match state.moves() {
            Moves::Available(children) => children,
            Moves::Blocked(lost) => {
                return terminal_score(&lost, eval_color)
                    .expect("BUG: blocked state without a winner")
            }
            Moves::Decided(winner) if winner == eval_color => return WIN_SCORE,
            Moves::Decided(_) => return -WIN_SCORE,
        };

        if self.move_ordering {
            self.order(&mut children, maximizing, eval_color);
        }

        if maximizing {
            let mut value = -WIN_SCORE;
            for child in &children {
                let eval =
                    self.alphabeta(&child.state, depth - 1, alpha, beta, false, eval_color, nodes);
                value = value.max(eval);
                alpha = alpha.max(eval);
                if beta <= alpha {
                    break; // Beta cutoff
                }
            }
            value
        } else {
            let mut value = WIN_SCORE;
            for child in &children {
                let eval =
                    self.alphabeta(&child.state, depth - 1, alpha, beta, true, eval_color, nodes);
                value = value.min(eval);
                beta = beta.min(eval);
                if beta <= alpha {
                    break; // Alpha cutoff
                }
            }
            value
        }
    }

    /// Most promising children first: highest immediate score for the
    /// maximizing side, lowest for the minimizing side. Stable, so equal
    /// scores keep generation order.
    fn order(&self, children: &mut [Child], maximizing: bool, eval_color: Color) {
        let mut keyed: Vec<(f64, Child)> = children
            .iter()
            .map(|c| (self.evaluator.score(&c.state, eval_color), *c))
            .collect();
        keyed.sort_by(|a, b| {
            if maximizing {
                b.0.total_cmp(&a.0)
            } else {
                a.0.total_cmp(&b.0)
            }
        });
        for (slot, (_, child)) in children.iter_mut().zip(keyed) {
            *slot = child;
        }
    }
}
