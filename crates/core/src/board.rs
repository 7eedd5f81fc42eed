//! Santorini board state.
//!
//! The board is a flat array of 25 cells plus a handful of scalars, so a
//! state is `Copy` and cloning it is a plain memcpy. Search code clones a
//! state for every simulated ply and never mutates a state once it is stored.

use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

use crate::types::{
    Cell, Color, Coord, Occupant, BOARD_SIZE, DOME_HEIGHT, NUM_CELLS, WINNING_HEIGHT,
    WORKERS_PER_COLOR,
};
use crate::{Result, SantoriniError};

/// Stage of the game a state belongs to
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    /// Workers are still being placed
    Placement,
    /// Both colors have two workers on the board and nobody has won
    Play,
    /// A winner has been decided
    Finished(Color),
}

/// A complete Santorini position
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardState {
    pub(crate) cells: [Cell; NUM_CELLS],
    pub(crate) to_move: Color,
    pub(crate) turn: u32,
    pub(crate) winner: Option<Color>,
}

/// Packed canonical fingerprint of a state: board contents, mover and
/// terminal flag. The turn counter is deliberately not part of the key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct StateKey(u128);

impl StateKey {
    /// Raw packed value
    pub fn raw(self) -> u128 {
        self.0
    }
}

impl BoardState {
    /// Empty board at the start of the placement phase, White to place.
    pub fn new() -> Self {
        Self {
            cells: [Cell::EMPTY; NUM_CELLS],
            to_move: Color::White,
            turn: 0,
            winner: None,
        }
    }

    /// Get the cell at a coordinate
    #[inline]
    pub fn cell(&self, coord: Coord) -> Cell {
        self.cells[coord.index()]
    }

    /// Get the tower height at a coordinate
    #[inline]
    pub fn height(&self, coord: Coord) -> u8 {
        self.cells[coord.index()].height
    }

    /// Color whose turn it is
    #[inline]
    pub fn to_move(&self) -> Color {
        self.to_move
    }

    /// Turn counter: one tick per placement and per ply
    #[inline]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Winner, if the game is decided
    #[inline]
    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    /// True once a winner is known
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.winner.is_some()
    }

    /// Current phase of the game
    pub fn phase(&self) -> Phase {
        if let Some(winner) = self.winner {
            Phase::Finished(winner)
        } else if self.placement_complete() {
            Phase::Play
        } else {
            Phase::Placement
        }
    }

    /// Cells occupied by `color`'s workers, in scan order.
    pub fn workers(&self, color: Color) -> impl Iterator<Item = Coord> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(move |(_, cell)| cell.worker() == Some(color))
            .map(|(i, _)| Coord::from_index(i))
    }

    /// Number of `color` workers on the board
    pub fn worker_count(&self, color: Color) -> usize {
        self.workers(color).count()
    }

    fn placement_complete(&self) -> bool {
        Color::ALL
            .iter()
            .all(|&color| self.worker_count(color) == WORKERS_PER_COLOR)
    }

    /// Place a worker for the color to move.
    ///
    /// Each color places two workers, White first. After a color's second
    /// worker the turn passes to the other color.
    pub fn place_worker(&self, coord: Coord) -> Result<BoardState> {
        if self.placement_complete() {
            return Err(SantoriniError::PlacementOver);
        }
        if !self.cell(coord).occupant.is_empty() {
            return Err(SantoriniError::CellOccupied(coord));
        }

        let mut next = *self;
        next.cells[coord.index()].occupant = Occupant::Worker(self.to_move);
        next.turn += 1;
        if next.worker_count(self.to_move) == WORKERS_PER_COLOR {
            next.to_move = self.to_move.opposite();
        }
        Ok(next)
    }

    /// Place both workers of the color to move on a uniformly chosen pair of
    /// adjacent empty cells.
    pub fn random_placement<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<BoardState> {
        if self.placement_complete() || self.worker_count(self.to_move) != 0 {
            return Err(SantoriniError::PlacementOver);
        }

        let pairs: Vec<(Coord, Coord)> = Coord::all()
            .filter(|&a| self.cell(a).occupant.is_empty())
            .flat_map(|a| a.neighbors().map(move |b| (a, b)))
            .filter(|&(_, b)| self.cell(b).occupant.is_empty())
            .collect();

        let &(first, second) = pairs
            .choose(rng)
            .ok_or(SantoriniError::PlacementOver)?;

        self.place_worker(first)?.place_worker(second)
    }

    /// The state after `color` found itself without a legal ply: the
    /// opponent is declared the winner.
    pub fn declare_blocked(mut self, color: Color) -> BoardState {
        self.winner = Some(color.opposite());
        self
    }

    /// Same position with a different turn counter.
    pub fn with_turn(mut self, turn: u32) -> BoardState {
        self.turn = turn;
        self
    }

    /// Canonical fingerprint (cells, mover, terminal flag).
    pub fn key(&self) -> StateKey {
        let mut packed: u128 = 0;
        for (i, cell) in self.cells.iter().enumerate() {
            let occupant = match cell.occupant {
                Occupant::Empty => 0u128,
                Occupant::Worker(Color::White) => 1,
                Occupant::Worker(Color::Gray) => 2,
                Occupant::Dome => 3,
            };
            packed |= ((cell.height as u128) | (occupant << 3)) << (i * 5);
        }
        packed |= (self.to_move.index() as u128) << 125;
        packed |= (self.winner.is_some() as u128) << 126;
        StateKey(packed)
    }

    /// Parse a board from notation.
    ///
    /// Format: five `/`-separated rows of five `<height><occupant>` cells
    /// (occupant one of `.`, `W`, `G`, `X`), then the color to move (`w` or
    /// `g`) and the turn counter, e.g.
    /// `0W0.0.0.0./0.0.0.0.0./0.0G0G0.0./0.0.0.0.0./0.0.0.0.0W w 4`.
    pub fn from_notation(notation: &str) -> Result<Self> {
        let invalid = |msg: String| SantoriniError::InvalidNotation(msg);
        let parts: Vec<&str> = notation.split_whitespace().collect();
        if parts.len() != 3 {
            return Err(invalid(format!(
                "expected 3 fields (board, mover, turn), found {}",
                parts.len()
            )));
        }

        let rows: Vec<&str> = parts[0].split('/').collect();
        if rows.len() != BOARD_SIZE {
            return Err(invalid(format!("expected 5 rows, found {}", rows.len())));
        }

        let mut state = BoardState::new();
        for (row, text) in rows.iter().enumerate() {
            let chars: Vec<char> = text.chars().collect();
            if chars.len() != BOARD_SIZE * 2 {
                return Err(invalid(format!("row {row} must have 10 characters: {text:?}")));
            }
            for (col, pair) in chars.chunks(2).enumerate() {
                let height = pair[0]
                    .to_digit(10)
                    .filter(|&h| h <= DOME_HEIGHT as u32)
                    .ok_or_else(|| invalid(format!("bad height {:?}", pair[0])))?
                    as u8;
                let occupant = match pair[1] {
                    '.' => Occupant::Empty,
                    'W' => Occupant::Worker(Color::White),
                    'G' => Occupant::Worker(Color::Gray),
                    'X' => Occupant::Dome,
                    other => return Err(invalid(format!("bad occupant {other:?}"))),
                };
                if (occupant == Occupant::Dome) != (height == DOME_HEIGHT) {
                    return Err(invalid(format!(
                        "cell r{row}c{col}: a dome must sit exactly at height 4"
                    )));
                }
                state.cells[row * BOARD_SIZE + col] = Cell { height, occupant };
            }
        }

        state.to_move = match parts[1] {
            "w" => Color::White,
            "g" => Color::Gray,
            other => return Err(invalid(format!("bad side to move {other:?}"))),
        };
        state.turn = parts[2]
            .parse()
            .map_err(|_| invalid(format!("bad turn counter {:?}", parts[2])))?;

        for color in Color::ALL {
            if state.worker_count(color) > WORKERS_PER_COLOR {
                return Err(invalid(format!("{color} has more than two workers")));
            }
        }

        let on_top: Vec<Color> = Color::ALL
            .into_iter()
            .filter(|&color| state.workers(color).any(|c| state.height(c) == WINNING_HEIGHT))
            .collect();
        match on_top.as_slice() {
            [] => {}
            [color] => state.winner = Some(*color),
            _ => return Err(invalid("both colors stand on level 3".to_string())),
        }

        Ok(state)
    }

    /// Render the state in the notation accepted by [`BoardState::from_notation`].
    pub fn to_notation(&self) -> String {
        let mut s = String::with_capacity(64);
        for row in 0..BOARD_SIZE {
            if row > 0 {
                s.push('/');
            }
            for col in 0..BOARD_SIZE {
                let cell = self.cells[row * BOARD_SIZE + col];
                s.push(char::from(b'0' + cell.height));
                s.push(cell.occupant.symbol());
            }
        }
        s.push(' ');
        s.push(match self.to_move {
            Color::White => 'w',
            Color::Gray => 'g',
        });
        s.push(' ');
        s.push_str(&self.turn.to_string());
        s
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "    c0 c1 c2 c3 c4")?;
        writeln!(f, "    --------------")?;
        for row in 0..BOARD_SIZE {
            write!(f, "r{row}| ")?;
            for col in 0..BOARD_SIZE {
                let cell = self.cells[row * BOARD_SIZE + col];
                write!(f, "{}{} ", cell.height, cell.occupant.symbol())?;
            }
            writeln!(f)?;
        }
        match self.winner {
            Some(winner) => write!(f, "turn {}: {} wins", self.turn, winner),
            None => write!(f, "turn {}: {} to move", self.turn, self.to_move),
        }
    }
}

impl fmt::Debug for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoardState({})", self.to_notation())
    }
}
