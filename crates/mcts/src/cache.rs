//! Per-search memo table of generated plies.
//!
//! Filled on tree expansion only, so it holds at most one entry per
//! expanded node.
//!
//! Keyed by [`StateKey`], which ignores the turn counter: cached children
//! carry the turn of whichever parent first filled the entry, so callers
//! re-stamp the turn of the child they actually use.

use santorini_core::{BoardState, Child, StateKey};
use std::collections::HashMap;

/// Anything that can hand out the children of a state.
pub trait MoveSource {
    /// Run `f` over the children of `state` for its color to move.
    fn with_children<T>(&mut self, state: &BoardState, f: impl FnOnce(&[Child]) -> T) -> T;
}

/// Generates children afresh on every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct Uncached;

impl MoveSource for Uncached {
    fn with_children<T>(&mut self, state: &BoardState, f: impl FnOnce(&[Child]) -> T) -> T {
        f(&state.legal_moves(state.to_move()))
    }
}

/// Bounded memo table. Once full, new positions are generated but not stored.
#[derive(Debug)]
pub struct MoveCache {
    entries: HashMap<StateKey, Box<[Child]>>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl MoveCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MoveSource for MoveCache {
    fn with_children<T>(&mut self, state: &BoardState, f: impl FnOnce(&[Child]) -> T) -> T {
        let key = state.key();
        if let Some(children) = self.entries.get(&key) {
            self.hits += 1;
            return f(children);
        }

        self.misses += 1;
        let children: Box<[Child]> = state.legal_moves(state.to_move()).into_boxed_slice();
        let out = f(&children);
        if self.entries.len() < self.capacity {
            self.entries.insert(key, children);
        }
        out
    }
}

/// `child` as reached from `parent`, with the turn counter re-stamped.
#[inline]
pub fn restamp(child: &Child, parent: &BoardState) -> Child {
    Child {
        state: child.state.with_turn(parent.turn() + 1),
        ..*child
    }
}
