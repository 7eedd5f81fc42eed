//! Fixed-length feature vector consumed by learned win-probability models.
//!
//! Layout (38 values, perspective color first):
//!
//! | range  | content |
//! |--------|---------|
//! | 0      | turn / 60 |
//! | 1..33  | per worker, see below |
//! | 33..37 | the four own-to-opponent distances / sqrt(32), ascending |
//! | 37     | distance between own workers / sqrt(32) |
//!
//! Each worker block covers the own two workers, then the opponent two,
//! each in scan order: a one-hot of the worker's level 0..=2, then the
//! fraction of its 8 neighbours at levels 0, 1, 2, 3 and dome-or-off-board.

use crate::board::BoardState;
use crate::types::{Color, Coord, DOME_HEIGHT, WINNING_HEIGHT};

/// Number of features produced by [`extract_features`].
pub const NUM_FEATURES: usize = 38;

const PER_WORKER: usize = 8;
const MAX_DISTANCE: f64 = 5.656_854_249_492_381;

/// Build the feature vector for `state` as seen by `perspective`.
///
/// # Panics
/// Panics in debug builds if either color does not have two workers.
pub fn extract_features(state: &BoardState, perspective: Color) -> [f64; NUM_FEATURES] {
    let own: Vec<Coord> = state.workers(perspective).collect();
    let other: Vec<Coord> = state.workers(perspective.opposite()).collect();
    debug_assert!(
        own.len() == 2 && other.len() == 2,
        "features need two workers per color"
    );

    let mut features = [0.0; NUM_FEATURES];
    features[0] = state.turn() as f64 / 60.0;

    for (slot, &worker) in own.iter().chain(other.iter()).enumerate() {
        let base = 1 + slot * PER_WORKER;
        let level = state.height(worker);
        if level < WINNING_HEIGHT {
            features[base + level as usize] = 1.0;
        }
        write_neighbourhood(state, worker, &mut features[base + 3..base + PER_WORKER]);
    }

    let mut distances: Vec<f64> = own
        .iter()
        .flat_map(|a| other.iter().map(move |b| a.distance(*b) / MAX_DISTANCE))
        .collect();
    distances.sort_by(f64::total_cmp);
    for (i, d) in distances.iter().take(4).enumerate() {
        features[33 + i] = *d;
    }

    if let [a, b] = own.as_slice() {
        features[37] = a.distance(*b) / MAX_DISTANCE;
    }

    features
}

fn write_neighbourhood(state: &BoardState, at: Coord, out: &mut [f64]) {
    let on_board = at.neighbors().count();
    for neighbour in at.neighbors() {
        let h = state.height(neighbour).min(DOME_HEIGHT) as usize;
        out[h] += 1.0 / 8.0;
    }
    // Off-board neighbours count as blocked, like domes
    out[DOME_HEIGHT as usize] += (8 - on_board) as f64 / 8.0;
}
