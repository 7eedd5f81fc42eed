//! Monte Carlo Tree Search for Santorini.
//!
//! # Features
//!
//! - **UCB1 Selection**: with optional RAVE (all-moves-as-first) blending
//! - **Early-game Bias**: inflated exploration while heuristics are unreliable
//! - **Weighted Rollouts**: plies sampled by win/block/create/height weights
//! - **Parallel Rollouts**: leaf-parallel playouts on the rayon pool
//! - **Move Cache**: per-search memo of generated plies
//!
//! # Example
//!
//! ```
//! use santorini_core::{BoardState, HeuristicEvaluator};
//! use santorini_mcts::{MctsConfig, MctsSearch, SearchLimits};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let state = BoardState::from_notation(
//!     "0W0.0.0.0./0.0.0.0.0./0.0.0G0G0./0.0.0.0.0./0.0.0.0.0W w 4",
//! )
//! .unwrap();
//!
//! let config = MctsConfig::with_rollouts(200);
//! let rng = ChaCha8Rng::seed_from_u64(42);
//! let mut mcts = MctsSearch::new(state, config, HeuristicEvaluator::default(), rng);
//!
//! let stats = mcts.search(SearchLimits::rollouts(200));
//! let best = mcts.best_move().expect("undecided root");
//! println!("{} after {} rollouts", best.ply, stats.rollouts);
//! ```

pub mod cache;
pub mod config;
mod mover;
mod node;
pub mod policy;
pub mod rollout;
pub mod search;
mod tree;

pub use config::{MctsConfig, SearchLimits, SimulationWeights, TieBreak};
pub use mover::MctsMover;
pub use node::{NodeId, NodeStats};
pub use search::{ChildSummary, MctsSearch, SearchStats};
