//! Playing games between two movers.

use anyhow::{bail, Context, Result};
use rand::Rng;
use santorini_core::{BoardState, Color, Mover, Ply};
use serde::Serialize;
use tracing::{debug, info};

use crate::players::MoverKind;

/// Guard against a mover that never finishes a game. Every non-winning ply
/// builds once, so real games end long before this.
pub const MAX_PLIES: usize = 400;

/// A finished game.
#[derive(Clone, Debug, Serialize)]
pub struct GameRecord {
    pub seed: u64,
    pub winner: Color,
    /// Position after random placement, in board notation
    pub start: String,
    pub plies: Vec<Ply>,
    /// Final position, in board notation
    pub end: String,
}

/// Place both colors at random, then alternate `white` and `gray` until
/// someone wins. `on_ply` sees every position after a ply.
pub fn play_game<R: Rng>(
    white: &mut dyn Mover,
    gray: &mut dyn Mover,
    rng: &mut R,
    seed: u64,
    mut on_ply: impl FnMut(&BoardState, &Ply),
) -> Result<GameRecord> {
    let start = BoardState::new()
        .random_placement(rng)
        .and_then(|state| state.random_placement(rng))
        .context("Random placement failed")?;

    let mut state = start;
    let mut plies = Vec::new();

    while state.winner().is_none() {
        if plies.len() >= MAX_PLIES {
            bail!("Game {seed} did not finish within {MAX_PLIES} plies");
        }
        let color = state.to_move();
        let mover: &mut dyn Mover = match color {
            Color::White => &mut *white,
            Color::Gray => &mut *gray,
        };

        let choice = mover
            .select_move(&state)
            .with_context(|| format!("{} failed to move at turn {}", mover.name(), state.turn()))?;
        match choice {
            Some(child) => {
                debug!(turn = state.turn(), color = %color, ply = %child.ply, "ply");
                on_ply(&child.state, &child.ply);
                plies.push(child.ply);
                state = child.state;
            }
            None => {
                info!(turn = state.turn(), color = %color, "no legal ply, game lost");
                state = state.declare_blocked(color);
            }
        }
    }

    let winner = state.winner().context("Game ended without a winner")?;
    Ok(GameRecord {
        seed,
        winner,
        start: start.to_notation(),
        plies,
        end: state.to_notation(),
    })
}

/// Totals of an arena run.
#[derive(Clone, Debug, Serialize)]
pub struct ArenaSummary {
    pub white: MoverKind,
    pub gray: MoverKind,
    pub games: usize,
    pub white_wins: usize,
    pub gray_wins: usize,
    pub mean_plies: f64,
    pub elapsed_secs: f64,
}

impl ArenaSummary {
    pub fn from_records(
        white: MoverKind,
        gray: MoverKind,
        records: &[GameRecord],
        elapsed_secs: f64,
    ) -> Self {
        let games = records.len();
        let white_wins = records.iter().filter(|r| r.winner == Color::White).count();
        let total_plies: usize = records.iter().map(|r| r.plies.len()).sum();
        Self {
            white,
            gray,
            games,
            white_wins,
            gray_wins: games - white_wins,
            mean_plies: if games == 0 {
                0.0
            } else {
                total_plies as f64 / games as f64
            },
            elapsed_secs,
        }
    }

    pub fn white_win_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.white_wins as f64 / self.games as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use santorini_core::{HeuristicEvaluator, RandomMover};
    use santorini_minimax::{MinimaxConfig, MinimaxMover};

    fn random_game(seed: u64) -> GameRecord {
        let mut white = RandomMover::new(ChaCha8Rng::seed_from_u64(seed + 1));
        let mut gray = RandomMover::new(ChaCha8Rng::seed_from_u64(seed + 2));
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        play_game(&mut white, &mut gray, &mut rng, seed, |_, _| {}).unwrap()
    }

    #[test]
    fn test_game_replays_from_record() {
        for seed in 0..10 {
            let record = random_game(seed);
            let mut state = BoardState::from_notation(&record.start).unwrap();
            for ply in &record.plies {
                state = state.apply(*ply).unwrap();
            }
            // A blocked final mover loses without a ply being played.
            let end = BoardState::from_notation(&record.end).unwrap();
            if state.winner().is_none() {
                state = state.declare_blocked(state.to_move());
            }
            assert_eq!(state.winner(), Some(record.winner));
            assert_eq!(state.to_notation(), end.to_notation());
        }
    }

    #[test]
    fn test_same_seed_same_game() {
        let a = random_game(7);
        let b = random_game(7);
        assert_eq!(a.plies, b.plies);
        assert_eq!(a.winner, b.winner);
    }

    #[test]
    fn test_on_ply_sees_every_ply() {
        let mut white =
            MinimaxMover::new(MinimaxConfig::with_depth(1), HeuristicEvaluator::default());
        let mut gray = RandomMover::new(ChaCha8Rng::seed_from_u64(3));
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut seen = 0;
        let record = play_game(&mut white, &mut gray, &mut rng, 3, |_, _| seen += 1).unwrap();
        assert_eq!(seen, record.plies.len());
    }

    #[test]
    fn test_summary_counts() {
        let records: Vec<GameRecord> = (0..6).map(random_game).collect();
        let summary =
            ArenaSummary::from_records(MoverKind::Random, MoverKind::Random, &records, 0.5);
        assert_eq!(summary.games, 6);
        assert_eq!(summary.white_wins + summary.gray_wins, 6);
        assert!(summary.mean_plies > 0.0);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["white"], "random");
    }
}
