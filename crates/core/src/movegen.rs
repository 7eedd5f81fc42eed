//! Legal ply generation.
//!
//! A ply is a worker step followed by a build next to the destination.
//! Generation order is deterministic: workers in scan order, destinations in
//! the fixed adjacency order, then builds in adjacency order around the
//! destination. Search tie-breaks and seeded runs depend on this order.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board::BoardState;
use crate::types::{Color, Coord, Occupant, WINNING_HEIGHT, WORKERS_PER_COLOR};

/// One full turn: move a worker from `from` to `to`, then build on `build`.
///
/// `build` is `None` only for a winning step onto level 3, which ends the
/// game before any build happens.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Ply {
    pub from: Coord,
    pub to: Coord,
    pub build: Option<Coord>,
}

impl Ply {
    /// True if this ply steps onto level 3
    pub fn is_win(&self) -> bool {
        self.build.is_none()
    }
}

impl fmt::Display for Ply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.build {
            Some(build) => write!(f, "{}->{} build {}", self.from, self.to, build),
            None => write!(f, "{}->{} wins", self.from, self.to),
        }
    }
}

/// A generated successor: the ply, the resulting state and the sibling
/// group id shared by every child with the same worker step.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Child {
    pub ply: Ply,
    pub state: BoardState,
    pub group: u16,
}

/// Outcome of asking a state for its successors.
#[derive(Clone, Debug)]
pub enum Moves {
    /// The game already has a winner.
    Decided(Color),
    /// The mover has no legal ply. Carries the state with the opponent
    /// declared the winner.
    Blocked(BoardState),
    /// At least one legal ply exists.
    Available(Vec<Child>),
}

impl BoardState {
    /// Generate every legal ply for `color`.
    ///
    /// If any step reaches level 3, only that winning child is returned.
    /// Children have the opposite color to move and the turn counter
    /// advanced by one. A decided state has no children.
    pub fn legal_moves(&self, color: Color) -> Vec<Child> {
        debug_assert_eq!(
            self.worker_count(color),
            WORKERS_PER_COLOR,
            "move generation before placement is complete"
        );
        if self.winner.is_some() {
            return Vec::new();
        }

        let mut children = Vec::with_capacity(64);
        let mut group: u16 = 0;

        for from in self.workers(color) {
            let from_height = self.height(from);
            for to in from.neighbors() {
                if !self.cell(to).is_climbable_from(from_height) {
                    continue;
                }

                let mut moved = *self;
                moved.cells[from.index()].occupant = Occupant::Empty;
                moved.cells[to.index()].occupant = Occupant::Worker(color);
                moved.to_move = color.opposite();
                moved.turn = self.turn + 1;

                if moved.height(to) == WINNING_HEIGHT {
                    moved.winner = Some(color);
                    return vec![Child {
                        ply: Ply {
                            from,
                            to,
                            build: None,
                        },
                        state: moved,
                        group,
                    }];
                }

                // The vacated origin is always buildable, so every step
                // yields at least one child.
                for build in to.neighbors() {
                    if !moved.cell(build).is_buildable() {
                        continue;
                    }
                    let mut built = moved;
                    built.cells[build.index()].build();
                    children.push(Child {
                        ply: Ply {
                            from,
                            to,
                            build: Some(build),
                        },
                        state: built,
                        group,
                    });
                }
                group += 1;
            }
        }

        children
    }

    /// Successors for the color to move, classified.
    pub fn moves(&self) -> Moves {
        if let Some(winner) = self.winner {
            return Moves::Decided(winner);
        }
        let children = self.legal_moves(self.to_move);
        if children.is_empty() {
            Moves::Blocked(self.declare_blocked(self.to_move))
        } else {
            Moves::Available(children)
        }
    }

    /// Number of distinct worker steps available to `color`, ignoring builds.
    pub fn mobility(&self, color: Color) -> usize {
        self.workers(color)
            .map(|from| {
                let h = self.height(from);
                from.neighbors()
                    .filter(|&to| self.cell(to).is_climbable_from(h))
                    .count()
            })
            .sum()
    }

    /// Empty level-3 cells that `color` could step onto on its next ply.
    pub fn winning_cells(&self, color: Color) -> Vec<Coord> {
        let mut cells: Vec<Coord> = self
            .workers(color)
            .filter(|&from| self.height(from) + 1 >= WINNING_HEIGHT)
            .flat_map(|from| from.neighbors())
            .filter(|&to| {
                let cell = self.cell(to);
                cell.height == WINNING_HEIGHT && cell.occupant.is_empty()
            })
            .collect();
        cells.sort_unstable();
        cells.dedup();
        cells
    }

    /// Play a ply for the color to move.
    ///
    /// Only plies the generator would produce are accepted.
    pub fn apply(&self, ply: Ply) -> crate::Result<BoardState> {
        if let Some(winner) = self.winner {
            return Err(crate::SantoriniError::GameOver(winner));
        }
        if self.worker_count(self.to_move) != WORKERS_PER_COLOR
            || self.worker_count(self.to_move.opposite()) != WORKERS_PER_COLOR
        {
            return Err(crate::SantoriniError::NotInPlay(self.to_move));
        }
        self.legal_moves(self.to_move)
            .into_iter()
            .find(|child| child.ply == ply)
            .map(|child| child.state)
            .ok_or_else(|| {
                crate::SantoriniError::IllegalMove(format!("{ply} for {}", self.to_move))
            })
    }
}
