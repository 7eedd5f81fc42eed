//! Fixed-depth alpha-beta search for Santorini.
//!
//! A faster, shallower alternative to MCTS over the same move generator
//! and [`Evaluator`](santorini_core::Evaluator) seam.
//!
//! # Example
//!
//! ```
//! use santorini_core::{BoardState, Color, HeuristicEvaluator};
//! use santorini_minimax::{AlphaBeta, MinimaxConfig};
//!
//! let state = BoardState::from_notation(
//!     "2W3.0.0.0./0.0.0.0.0./0.0.0G0G0./0.0.0.0.0./0.0.0.0.0W w 8",
//! )
//! .unwrap();
//! let engine = AlphaBeta::new(HeuristicEvaluator::default(), &MinimaxConfig::default());
//! let outcome = engine.select_move(&state, Color::White, Color::White, 2);
//! assert!(outcome.best.unwrap().ply.is_win());
//! ```

pub mod alphabeta;
pub mod config;
mod mover;

pub use alphabeta::{AlphaBeta, SearchOutcome};
pub use config::MinimaxConfig;
pub use mover::MinimaxMover;
