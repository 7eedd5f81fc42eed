//! Primitive board types: colors, coordinates and cells.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Side length of the board.
pub const BOARD_SIZE: usize = 5;

/// Number of cells on the board.
pub const NUM_CELLS: usize = BOARD_SIZE * BOARD_SIZE;

/// Height of a dome. A cell at this height can never be entered or built on.
pub const DOME_HEIGHT: u8 = 4;

/// Standing on this height wins the game.
pub const WINNING_HEIGHT: u8 = 3;

/// Workers each color places before play starts.
pub const WORKERS_PER_COLOR: usize = 2;

/// Neighbour offsets as (row delta, col delta), in the fixed adjacency order
/// used by the move generator.
const NEIGHBOR_OFFSETS: [(i8, i8); 8] = [
    (1, -1),
    (1, 0),
    (1, 1),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// A player color. White places and moves first.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Gray = 1,
}

impl Color {
    /// Both colors in turn order.
    pub const ALL: [Color; 2] = [Color::White, Color::Gray];

    /// Returns the opposite color
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Gray,
            Color::Gray => Color::White,
        }
    }

    /// Returns the index (0 for White, 1 for Gray)
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Single-letter symbol used on the board
    #[inline]
    pub const fn symbol(self) -> char {
        match self {
            Color::White => 'W',
            Color::Gray => 'G',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Gray => write!(f, "Gray"),
        }
    }
}

/// A board coordinate. Cells are indexed row-major: `row * 5 + col`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    row: u8,
    col: u8,
}

impl Coord {
    /// Create a coordinate, returning None if it lies off the board.
    #[inline]
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if (row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Create a coordinate from a row-major cell index.
    ///
    /// # Panics
    /// Panics in debug builds if the index is off the board.
    #[inline]
    pub fn from_index(index: usize) -> Self {
        debug_assert!(index < NUM_CELLS, "cell index {index} off the board");
        Self {
            row: (index / BOARD_SIZE) as u8,
            col: (index % BOARD_SIZE) as u8,
        }
    }

    #[inline]
    pub const fn row(self) -> u8 {
        self.row
    }

    #[inline]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Row-major index into the cell array
    #[inline]
    pub const fn index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    /// All 25 coordinates in scan order.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..NUM_CELLS).map(Coord::from_index)
    }

    /// The 8-neighbourhood of this cell clipped to the board, in the fixed
    /// adjacency order.
    pub fn neighbors(self) -> impl Iterator<Item = Coord> {
        NEIGHBOR_OFFSETS.iter().filter_map(move |&(dr, dc)| {
            let row = self.row as i8 + dr;
            let col = self.col as i8 + dc;
            if row < 0 || col < 0 {
                None
            } else {
                Coord::new(row as u8, col as u8)
            }
        })
    }

    /// True if the two cells touch (including diagonally).
    #[inline]
    pub fn is_adjacent(self, other: Coord) -> bool {
        self != other && self.row.abs_diff(other.row) <= 1 && self.col.abs_diff(other.col) <= 1
    }

    /// Euclidean distance between cell centres.
    #[inline]
    pub fn distance(self, other: Coord) -> f64 {
        let dr = self.row as f64 - other.row as f64;
        let dc = self.col as f64 - other.col as f64;
        (dr * dr + dc * dc).sqrt()
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}c{}", self.row, self.col)
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({}, {})", self.row, self.col)
    }
}

/// What stands on a cell
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Occupant {
    #[default]
    Empty,
    Worker(Color),
    Dome,
}

impl Occupant {
    #[inline]
    pub const fn symbol(self) -> char {
        match self {
            Occupant::Empty => '.',
            Occupant::Worker(color) => color.symbol(),
            Occupant::Dome => 'X',
        }
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        matches!(self, Occupant::Empty)
    }
}

/// A single cell: tower height plus occupant.
///
/// Invariant: the occupant is `Dome` iff the height is 4.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Cell {
    pub height: u8,
    pub occupant: Occupant,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        height: 0,
        occupant: Occupant::Empty,
    };

    /// The worker standing here, if any
    #[inline]
    pub const fn worker(self) -> Option<Color> {
        match self.occupant {
            Occupant::Worker(color) => Some(color),
            _ => None,
        }
    }

    /// True if a builder may add a level here (unoccupied, not domed).
    #[inline]
    pub const fn is_buildable(self) -> bool {
        self.occupant.is_empty() && self.height < DOME_HEIGHT
    }

    /// True if a worker standing at `from_height` may step onto this cell.
    #[inline]
    pub const fn is_climbable_from(self, from_height: u8) -> bool {
        self.occupant.is_empty() && self.height < DOME_HEIGHT && self.height <= from_height + 1
    }

    /// Add one level, capping with a dome at height 4.
    #[inline]
    pub fn build(&mut self) {
        debug_assert!(self.is_buildable(), "building on a blocked cell");
        self.height += 1;
        if self.height == DOME_HEIGHT {
            self.occupant = Occupant::Dome;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(row: u8, col: u8) -> Coord {
        Coord::new(row, col).unwrap()
    }

    #[test]
    fn test_color_opposite() {
        assert_eq!(Color::White.opposite(), Color::Gray);
        assert_eq!(Color::Gray.opposite(), Color::White);
    }

    #[test]
    fn test_coord_bounds() {
        assert!(Coord::new(4, 4).is_some());
        assert!(Coord::new(5, 0).is_none());
        assert!(Coord::new(0, 5).is_none());
    }

    #[test]
    fn test_coord_index_roundtrip() {
        for coord in Coord::all() {
            assert_eq!(Coord::from_index(coord.index()), coord);
        }
        assert_eq!(Coord::all().count(), NUM_CELLS);
    }

    #[test]
    fn test_corner_has_three_neighbors() {
        assert_eq!(c(0, 0).neighbors().count(), 3);
        assert_eq!(c(4, 4).neighbors().count(), 3);
    }

    #[test]
    fn test_edge_and_center_neighbors() {
        assert_eq!(c(0, 2).neighbors().count(), 5);
        assert_eq!(c(2, 2).neighbors().count(), 8);
    }

    #[test]
    fn test_neighbor_order_is_stable() {
        let neighbors: Vec<_> = c(2, 2).neighbors().collect();
        assert_eq!(neighbors[0], c(3, 1));
        assert_eq!(neighbors[1], c(3, 2));
        assert_eq!(neighbors[7], c(1, 3));
    }

    #[test]
    fn test_is_adjacent() {
        assert!(c(1, 1).is_adjacent(c(2, 2)));
        assert!(!c(1, 1).is_adjacent(c(1, 1)));
        assert!(!c(1, 1).is_adjacent(c(3, 1)));
    }

    #[test]
    fn test_cell_build_caps_with_dome() {
        let mut cell = Cell::EMPTY;
        for _ in 0..3 {
            cell.build();
        }
        assert_eq!(cell.height, 3);
        assert!(cell.is_buildable());
        cell.build();
        assert_eq!(cell.height, DOME_HEIGHT);
        assert_eq!(cell.occupant, Occupant::Dome);
        assert!(!cell.is_buildable());
    }

    #[test]
    fn test_climbable() {
        let cell = Cell {
            height: 2,
            occupant: Occupant::Empty,
        };
        assert!(cell.is_climbable_from(1));
        assert!(!cell.is_climbable_from(0));
        // Stepping down any number of levels is allowed
        let low = Cell::EMPTY;
        assert!(low.is_climbable_from(3));
    }
}
