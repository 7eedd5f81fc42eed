//! Santorini rules, position evaluation and the mover interface.
//!
//! # Types
//!
//! - [`BoardState`] - Flat, `Copy` position: 25 cells, mover, turn, winner
//! - [`Ply`] / [`Child`] - A generated move and its resulting state
//! - [`Evaluator`] - Position scoring from one color's perspective
//! - [`Mover`] - A playing strategy (search engine, random, ...)
//!
//! # Example
//!
//! ```
//! use santorini_core::{BoardState, Moves};
//!
//! let state = BoardState::from_notation(
//!     "0W0.0.0.0./0.0.0.0.0./0.0.0G0G0./0.0.0.0.0./0.0.0.0.0W w 4",
//! )
//! .unwrap();
//! match state.moves() {
//!     Moves::Available(children) => assert_eq!(children.len(), 32),
//!     _ => unreachable!(),
//! }
//! ```

mod board;
mod error;
pub mod evaluator;
pub mod features;
pub mod model;
mod movegen;
mod mover;
mod types;

pub use board::{BoardState, Phase, StateKey};
pub use error::{Result, SantoriniError};
pub use evaluator::{Evaluator, HeuristicEvaluator, WIN_SCORE};
pub use features::{extract_features, NUM_FEATURES};
pub use model::{LearnedEvaluator, LogisticModel, WinProbabilityModel};
pub use movegen::{Child, Moves, Ply};
pub use mover::{Mover, RandomMover};
pub use types::{
    Cell, Color, Coord, Occupant, BOARD_SIZE, DOME_HEIGHT, NUM_CELLS, WINNING_HEIGHT,
    WORKERS_PER_COLOR,
};
