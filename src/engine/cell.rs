//! Per-cell state: liveness, pending transition, alive-neighbour set.

use std::collections::HashSet;

/// A decided-but-uncommitted state change.
///
/// Reviving and killing are mutually exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pending {
    #[default]
    None,
    Reviving,
    Killing,
}

/// Cell state as seen by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Alive,
    Dead,
    Reviving,
    Killing,
}

/// One square of the board.
///
/// `neighbours` holds the coordinates of currently-alive neighbours rather
/// than a count: set insertion and removal are idempotent, so repeated
/// propagation from the grid cannot drift the tally.
#[derive(Debug, Clone)]
pub struct Cell {
    x: usize,
    y: usize,
    alive: bool,
    pending: Pending,
    neighbours: HashSet<(usize, usize)>,
}

impl Cell {
    pub(crate) fn new(x: usize, y: usize) -> Self {
        Self {
            x,
            y,
            alive: false,
            pending: Pending::None,
            neighbours: HashSet::new(),
        }
    }

    /// X coordinate on the board.
    #[inline]
    pub fn x(&self) -> usize {
        self.x
    }

    /// Y coordinate on the board.
    #[inline]
    pub fn y(&self) -> usize {
        self.y
    }

    /// Whether the cell is currently alive.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Number of currently-alive neighbours.
    #[inline]
    pub fn alive_neighbours(&self) -> usize {
        self.neighbours.len()
    }

    /// Pending transition, if any.
    #[inline]
    pub fn pending(&self) -> Pending {
        self.pending
    }

    /// State for the presentation layer. A pending transition wins over
    /// plain alive/dead.
    pub fn state(&self) -> CellState {
        match self.pending {
            Pending::Reviving => CellState::Reviving,
            Pending::Killing => CellState::Killing,
            Pending::None if self.alive => CellState::Alive,
            Pending::None => CellState::Dead,
        }
    }

    /// Decide this cell's fate from its neighbour count without committing.
    ///
    /// Alive with fewer than 2 or more than 3 alive neighbours is marked
    /// killing; dead with exactly 3 is marked reviving; anything else is
    /// stable and stays unmarked. Idempotent until the next `commit`.
    pub(crate) fn apply_rules(&mut self) -> Pending {
        let n = self.neighbours.len();
        if self.alive {
            if !(2..=3).contains(&n) {
                self.pending = Pending::Killing;
            }
        } else if n == 3 {
            self.pending = Pending::Reviving;
        }
        self.pending
    }

    /// Commit the pending transition and return the resulting liveness.
    ///
    /// With nothing pending, liveness is left untouched.
    pub(crate) fn commit(&mut self) -> bool {
        match self.pending {
            Pending::Reviving => self.alive = true,
            Pending::Killing => self.alive = false,
            Pending::None => {}
        }
        self.pending = Pending::None;
        self.alive
    }

    /// Force liveness outside the rule cycle, discarding any pending
    /// transition. The grid pairs every call with neighbour propagation.
    pub(crate) fn set_alive(&mut self, alive: bool) {
        self.alive = alive;
        self.pending = Pending::None;
    }

    pub(crate) fn insert_neighbour(&mut self, at: (usize, usize)) {
        self.neighbours.insert(at);
    }

    pub(crate) fn remove_neighbour(&mut self, at: (usize, usize)) {
        self.neighbours.remove(&at);
    }
}
