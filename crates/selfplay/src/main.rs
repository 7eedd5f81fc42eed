//! Santorini driver: play single games or arenas between search engines.
//!
//! Each color is played by one of the movers (MCTS, alpha-beta or random).
//! Engine settings come from an optional TOML file with `[mcts]` and
//! `[minimax]` tables, overridden by command-line flags.

mod config;
mod game;
mod players;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use config::{EngineConfig, Overrides};
use game::{play_game, ArenaSummary, GameRecord};
use players::{build_mover, load_evaluator, MoverKind, SharedEvaluator};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use santorini_core::{BoardState, Color, Ply};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Santorini self-play and engine comparison tool.
#[derive(Parser)]
#[command(name = "santorini-selfplay")]
#[command(about = "Play Santorini games between MCTS, alpha-beta and random movers")]
struct Cli {
    /// Log level used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one game and print the board after every ply.
    Play {
        #[command(flatten)]
        engines: EngineArgs,
    },

    /// Play many games in parallel and report the results.
    Arena {
        #[command(flatten)]
        engines: EngineArgs,

        /// Number of games to play.
        #[arg(short, long, default_value = "10")]
        games: usize,

        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Clone, Debug)]
struct EngineArgs {
    /// Mover for White.
    #[arg(long, value_enum, default_value = "mcts")]
    white: MoverKind,

    /// Mover for Gray.
    #[arg(long, value_enum, default_value = "minimax")]
    gray: MoverKind,

    /// Random seed for reproducibility.
    #[arg(long, default_value = "42")]
    seed: u64,

    /// MCTS rollouts per move.
    #[arg(short, long)]
    rollouts: Option<usize>,

    /// MCTS time budget per move in seconds.
    #[arg(long)]
    seconds: Option<f64>,

    /// Parallel rollouts per MCTS iteration.
    #[arg(short, long)]
    workers: Option<usize>,

    /// Alpha-beta search depth in plies.
    #[arg(short, long)]
    depth: Option<u32>,

    /// TOML file with [mcts] and [minimax] tables.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON logistic model used instead of the built-in heuristic.
    #[arg(short, long)]
    model: Option<PathBuf>,
}

impl EngineArgs {
    fn engine_config(&self) -> EngineConfig {
        let base = match &self.config {
            Some(path) => EngineConfig::load_from_path(path),
            None => EngineConfig::default(),
        };
        base.apply(&Overrides {
            rollouts: self.rollouts,
            seconds: self.seconds,
            workers: self.workers,
            depth: self.depth,
        })
    }
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Play one seeded game. White's mover is seeded with `seed + 1`, Gray's
/// with `seed + 2`, placement with `seed`.
fn run_game(
    engines: &EngineArgs,
    config: &EngineConfig,
    evaluator: &SharedEvaluator,
    seed: u64,
    on_ply: impl FnMut(&BoardState, &Ply),
) -> Result<GameRecord> {
    let mut white = build_mover(engines.white, config, evaluator, seed.wrapping_add(1));
    let mut gray = build_mover(engines.gray, config, evaluator, seed.wrapping_add(2));
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    play_game(white.as_mut(), gray.as_mut(), &mut rng, seed, on_ply)
}

fn cmd_play(engines: EngineArgs) -> Result<()> {
    let config = engines.engine_config();
    let evaluator = load_evaluator(engines.model.as_deref())?;

    info!(
        white = %engines.white,
        gray = %engines.gray,
        seed = engines.seed,
        "starting game"
    );
    let start = Instant::now();
    let record = run_game(&engines, &config, &evaluator, engines.seed, |state, ply| {
        info!(turn = state.turn(), ply = %ply, "played");
        println!("{state}\n");
    })?;

    let kind = match record.winner {
        Color::White => engines.white,
        Color::Gray => engines.gray,
    };
    println!(
        "{} ({}) wins after {} plies in {:.2}s",
        record.winner,
        kind,
        record.plies.len(),
        start.elapsed().as_secs_f64()
    );
    println!("Start: {}", record.start);
    println!("End:   {}", record.end);
    Ok(())
}

fn cmd_arena(engines: EngineArgs, games: usize, json: bool) -> Result<()> {
    let config = engines.engine_config();
    let evaluator = load_evaluator(engines.model.as_deref())?;

    if !json {
        println!(
            "Playing {} games: {} (White) vs {} (Gray), seed {}",
            games, engines.white, engines.gray, engines.seed
        );
        println!("================================================");
    }

    let start = Instant::now();
    let records: Vec<GameRecord> = (0..games)
        .into_par_iter()
        .map(|i| {
            let game_seed = engines.seed.wrapping_add(i as u64 * 1000);
            run_game(&engines, &config, &evaluator, game_seed, |_, _| {})
                .with_context(|| format!("Game {i} (seed {game_seed}) failed"))
        })
        .collect::<Result<_>>()?;

    let summary = ArenaSummary::from_records(
        engines.white,
        engines.gray,
        &records,
        start.elapsed().as_secs_f64(),
    );

    if json {
        let out = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
        println!("{out}");
        return Ok(());
    }

    for record in &records {
        info!(
            seed = record.seed,
            winner = %record.winner,
            plies = record.plies.len(),
            "game finished"
        );
    }
    println!("White ({}) wins: {}", summary.white, summary.white_wins);
    println!("Gray ({}) wins:  {}", summary.gray, summary.gray_wins);
    println!("------------------------------------------------");
    println!("White win rate: {:.1}%", summary.white_win_rate() * 100.0);
    println!("Average game length: {:.1} plies", summary.mean_plies);
    println!("Completed in {:.2}s", summary.elapsed_secs);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Play { engines } => cmd_play(engines),
        Commands::Arena {
            engines,
            games,
            json,
        } => cmd_arena(engines, games, json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_arena() {
        let cli = Cli::try_parse_from([
            "santorini-selfplay",
            "arena",
            "--white",
            "random",
            "--gray",
            "minimax",
            "--games",
            "4",
            "--depth",
            "1",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Arena {
                engines,
                games,
                json,
            } => {
                assert_eq!(engines.white, MoverKind::Random);
                assert_eq!(engines.gray, MoverKind::Minimax);
                assert_eq!(engines.depth, Some(1));
                assert_eq!(games, 4);
                assert!(json);
            }
            Commands::Play { .. } => panic!("expected arena"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_mover() {
        assert!(Cli::try_parse_from(["santorini-selfplay", "play", "--white", "human"]).is_err());
    }

    #[test]
    fn test_flags_reach_engine_config() {
        let cli = Cli::try_parse_from([
            "santorini-selfplay",
            "play",
            "--rollouts",
            "64",
            "--workers",
            "2",
        ])
        .unwrap();
        let Commands::Play { engines } = cli.command else {
            panic!("expected play");
        };
        let config = engines.engine_config();
        assert_eq!(config.mcts.max_rollouts, 64);
        assert_eq!(config.mcts.rollout_workers, 2);
    }

    #[test]
    fn test_run_game_is_reproducible() {
        let cli = Cli::try_parse_from([
            "santorini-selfplay",
            "play",
            "--white",
            "mcts",
            "--gray",
            "random",
            "--rollouts",
            "30",
        ])
        .unwrap();
        let Commands::Play { engines } = cli.command else {
            panic!("expected play");
        };
        let config = engines.engine_config();
        let evaluator = load_evaluator(None).unwrap();
        let a = run_game(&engines, &config, &evaluator, 5, |_, _| {}).unwrap();
        let b = run_game(&engines, &config, &evaluator, 5, |_, _| {}).unwrap();
        assert_eq!(a.plies, b.plies);
        assert_eq!(a.winner, b.winner);
    }
}
