//! Property tests for the alpha-beta engine.

use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use santorini_core::{BoardState, Color, HeuristicEvaluator, Moves, WIN_SCORE};
use santorini_minimax::{AlphaBeta, MinimaxConfig};

/// A position after random placement and some random plies, still undecided
/// and with at least one legal ply for the color to move.
fn arb_open_position() -> impl Strategy<Value = BoardState> {
    (any::<u64>(), 0usize..16)
        .prop_map(|(seed, plies)| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut state = BoardState::new()
                .random_placement(&mut rng)
                .and_then(|s| s.random_placement(&mut rng))
                .expect("placement on an empty board");
            for _ in 0..plies {
                match state.moves() {
                    Moves::Available(children) => {
                        let next = children[rng.gen_range(0..children.len())];
                        if next.state.is_terminal() {
                            break;
                        }
                        state = next.state;
                    }
                    _ => break,
                }
            }
            state
        })
        .prop_filter("mover has a legal ply", |state| {
            matches!(state.moves(), Moves::Available(_))
        })
}

fn engine(ordering: bool) -> AlphaBeta<HeuristicEvaluator> {
    AlphaBeta::new(
        HeuristicEvaluator::default(),
        &MinimaxConfig::default().with_move_ordering(ordering),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Move ordering changes how much is pruned, never what is chosen.
    #[test]
    fn prop_ordering_does_not_change_choice(
        state in arb_open_position(),
        depth in 1u32..=2,
        eval_is_mover in any::<bool>(),
    ) {
        let mover = state.to_move();
        let eval_color = if eval_is_mover { mover } else { mover.opposite() };

        let ordered = engine(true).select_move(&state, mover, eval_color, depth);
        let plain = engine(false).select_move(&state, mover, eval_color, depth);

        prop_assert_eq!(ordered.best.map(|c| c.ply), plain.best.map(|c| c.ply));
        prop_assert_eq!(ordered.score, plain.score);
    }

    /// The chosen ply is legal and the score stays within the window.
    #[test]
    fn prop_choice_is_legal_and_bounded(state in arb_open_position(), depth in 1u32..=2) {
        let mover = state.to_move();
        let outcome = engine(true).select_move(&state, mover, mover, depth);
        let best = outcome.best.expect("open position has a move");

        prop_assert_eq!(state.apply(best.ply).unwrap(), best.state);
        prop_assert!(outcome.score.is_finite());
        prop_assert!(outcome.score.abs() <= WIN_SCORE);
    }

    /// A forced win or loss found for one color is the mirrored result
    /// when the same tree is scored for the other color.
    #[test]
    fn prop_forced_outcomes_flip_with_perspective(state in arb_open_position()) {
        let mover = state.to_move();
        let mine = engine(true).select_move(&state, mover, mover, 2);
        let theirs = engine(true).select_move(&state, mover, mover.opposite(), 2);
        if mine.score.abs() == WIN_SCORE {
            prop_assert_eq!(theirs.score, -mine.score);
        }
    }
}

#[test]
fn test_deeper_search_agrees_with_and_without_ordering() {
    let state = BoardState::from_notation(
        "0.1.2.0.0./2W1.3.0.0./2.0G0.0.0./0.0.0.0G0./0.0.4X0.0W w 14",
    )
    .unwrap();
    for eval_color in Color::ALL {
        let ordered = engine(true).select_move(&state, Color::White, eval_color, 3);
        let plain = engine(false).select_move(&state, Color::White, eval_color, 3);
        assert_eq!(ordered.best, plain.best);
        assert_eq!(ordered.score, plain.score);
    }
}

#[test]
fn test_immediate_win_ends_search() {
    // White on level 2 next to an open level-3 cell steps up at once.
    let state = BoardState::from_notation(
        "0.1.2.0.0./0.2W3.0.0./2.0G0.0.0./0.0.0.0G0./0.0.4X0.0W w 14",
    )
    .unwrap();
    let outcome = engine(true).select_move(&state, Color::White, Color::White, 3);
    assert!(outcome.best.unwrap().ply.is_win());
    assert_eq!(outcome.score, WIN_SCORE);
    assert_eq!(outcome.nodes, 1);
}
