//! Turn-taking interface shared by every playing strategy.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{BoardState, Phase};
use crate::movegen::{Child, Moves};
use crate::{Result, SantoriniError};

/// A strategy that picks a ply for the color to move.
///
/// Implementations are chosen once at game setup and asked for a move on
/// each of their turns. A mover returns `Ok(None)` only when the state is
/// already decided or the color to move is blocked.
pub trait Mover: Send {
    /// Short name for logs and reports
    fn name(&self) -> &str;

    /// Pick a child of `state` for `state.to_move()`.
    fn select_move(&mut self, state: &BoardState) -> Result<Option<Child>>;
}

impl<M: Mover + ?Sized> Mover for Box<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn select_move(&mut self, state: &BoardState) -> Result<Option<Child>> {
        (**self).select_move(state)
    }
}

/// Plays a uniformly random legal ply.
pub struct RandomMover<R: Rng + Send> {
    rng: R,
}

impl<R: Rng + Send> RandomMover<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> Mover for RandomMover<R> {
    fn name(&self) -> &str {
        "random"
    }

    fn select_move(&mut self, state: &BoardState) -> Result<Option<Child>> {
        if state.phase() == Phase::Placement {
            return Err(SantoriniError::NotInPlay(state.to_move()));
        }
        match state.moves() {
            Moves::Available(children) => Ok(children.choose(&mut self.rng).copied()),
            Moves::Decided(_) | Moves::Blocked(_) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_placement_phase_is_rejected() {
        let mut mover = RandomMover::new(ChaCha8Rng::seed_from_u64(3));
        let err = mover.select_move(&BoardState::new()).unwrap_err();
        assert!(matches!(err, SantoriniError::NotInPlay(_)));
    }

    #[test]
    fn test_random_mover_plays_legal_plies() {
        let mut state = BoardState::from_notation(
            "0W0.0.0.0./0.0.0.0.0./0.0.0G0G0./0.0.0.0.0./0.0.0.0.0W w 4",
        )
        .unwrap();
        let mut mover = RandomMover::new(ChaCha8Rng::seed_from_u64(3));

        for _ in 0..10 {
            let Some(child) = mover.select_move(&state).unwrap() else {
                break;
            };
            assert_eq!(state.apply(child.ply).unwrap(), child.state);
            state = child.state;
        }
    }

    #[test]
    fn test_random_mover_on_decided_state() {
        let state = BoardState::from_notation(
            "3W0.0.0.0./0W0.0.0.0./0.0.0G0G0./0.0.0.0.0./0.0.0.0.0. g 11",
        )
        .unwrap();
        let mut mover = RandomMover::new(ChaCha8Rng::seed_from_u64(3));
        assert!(mover.select_move(&state).unwrap().is_none());
    }
}
