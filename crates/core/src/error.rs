use thiserror::Error;

use crate::types::{Color, Coord};

/// Errors that can occur while setting up or playing a Santorini game
#[derive(Error, Debug)]
pub enum SantoriniError {
    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Invalid board notation: {0}")]
    InvalidNotation(String),

    #[error("Cell {0} is already occupied")]
    CellOccupied(Coord),

    #[error("All workers have already been placed")]
    PlacementOver,

    #[error("Workers must be placed before {0} can move")]
    NotInPlay(Color),

    #[error("Game is already over: {0} won")]
    GameOver(Color),

    #[error("Invalid win-probability model: {0}")]
    InvalidModel(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Convenience Result type for Santorini operations
pub type Result<T> = std::result::Result<T, SantoriniError>;
