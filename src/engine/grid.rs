//! Toroidal board with sparse active-set tracking.

use std::collections::HashSet;

use log::{debug, trace};

use crate::schema::{ConfigError, Seed, SimulationConfig};

use super::{Cell, CellState, Pending, Renderer};

/// Errors from bounds-checked board access.
///
/// Toroidal wrapping is an internal affair of neighbour enumeration; a
/// caller handing in an out-of-range coordinate is a bug and is rejected
/// rather than silently wrapped.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("Coordinate ({x}, {y}) outside {cols}x{rows} board")]
    OutOfBounds {
        x: usize,
        y: usize,
        cols: usize,
        rows: usize,
    },
}

/// The board: a dense toroidal array of cells plus the sparse set of cells
/// that still need rule evaluation.
///
/// The active set ("track") holds every cell that is alive, has a pending
/// transition, or has 3 or more alive neighbours — everything that could
/// matter next generation. Cells outside it are dead, quiet, and skipped
/// entirely, which bounds per-generation work at the living region plus its
/// one-cell halo instead of the whole board.
pub struct Grid {
    cols: usize,
    rows: usize,
    /// Row-major cell storage, `y * cols + x`.
    cells: Vec<Cell>,
    /// Flat indices of tracked cells.
    track: HashSet<usize>,
}

/// Toroidal wrap on one axis. Callers only ever step one cell past an edge.
#[inline]
fn wrap(n: i64, max: usize) -> usize {
    if n < 0 {
        max - 1
    } else if n as usize > max - 1 {
        0
    } else {
        n as usize
    }
}

impl Grid {
    /// Create a board from a validated configuration. Every cell starts
    /// dead and tracked; the first `refresh` prunes the quiet ones.
    pub fn new(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut grid = Self {
            cols: config.cols,
            rows: config.rows,
            cells: Vec::new(),
            track: HashSet::new(),
        };
        grid.allocate();
        grid.track_all();
        Ok(grid)
    }

    /// Rebuild every cell, track the full board, announce the geometry to
    /// the presentation layer, and run the initial refresh.
    pub fn initialize(&mut self, renderer: &mut dyn Renderer) {
        self.allocate();
        self.track_all();
        renderer.board_resized(self.cols, self.rows);
        self.refresh(renderer);
    }

    fn allocate(&mut self) {
        self.cells = Vec::with_capacity(self.cols * self.rows);
        for y in 0..self.rows {
            for x in 0..self.cols {
                self.cells.push(Cell::new(x, y));
            }
        }
    }

    /// Track every cell: until the first refresh prunes, all of them are
    /// mutual candidates.
    fn track_all(&mut self) {
        self.track = (0..self.cells.len()).collect();
    }

    /// Board width in cells.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Board height in cells.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        y * self.cols + x
    }

    /// Stable membership snapshot for a pass: insertions and removals made
    /// while the pass runs must not affect which cells it visits. Sorted so
    /// passes are deterministic.
    fn snapshot(&self) -> Vec<usize> {
        let mut snapshot: Vec<usize> = self.track.iter().copied().collect();
        snapshot.sort_unstable();
        snapshot
    }

    /// Rule-decision pass over the active set.
    ///
    /// No liveness changes here; cells that acquire a pending mark are
    /// rendered immediately so the "about to change" state is visible in
    /// inspect and debug modes.
    pub fn apply_rules(&mut self, renderer: &mut dyn Renderer) {
        for idx in self.snapshot() {
            let cell = &mut self.cells[idx];
            if cell.apply_rules() != Pending::None {
                renderer.render_cell(cell.x(), cell.y(), cell.state());
            }
        }
    }

    /// Commit pass: apply every pending transition and propagate the new
    /// liveness into each neighbour's alive-set.
    ///
    /// Propagation tracks every touched neighbour — a previously quiet dead
    /// cell next to a change becomes a candidate next round. This is the
    /// mechanism by which tracking expands outward from live regions.
    pub fn transition(&mut self) {
        for idx in self.snapshot() {
            let alive = self.cells[idx].commit();
            self.notify_neighbours(idx, alive);
        }
    }

    /// Visualization sync and pruning pass.
    ///
    /// Every tracked cell is re-rendered with its committed liveness, then
    /// cells that are dead with fewer than 3 alive neighbours are dropped
    /// from tracking. A dead cell with exactly 3 stays: the next rule pass
    /// would revive it. Idempotent — a second refresh re-renders the same
    /// stable set and removes nothing further.
    pub fn refresh(&mut self, renderer: &mut dyn Renderer) {
        let before = self.track.len();
        for idx in self.snapshot() {
            let cell = &self.cells[idx];
            let state = if cell.is_alive() {
                CellState::Alive
            } else {
                CellState::Dead
            };
            renderer.render_cell(cell.x(), cell.y(), state);
            if !cell.is_alive() && cell.alive_neighbours() < 3 {
                self.track.remove(&idx);
            }
        }
        trace!(
            "refresh: {} tracked after prune (was {})",
            self.track.len(),
            before
        );
    }

    /// Force a cell alive, outside the rule cycle.
    pub fn mark_alive(&mut self, x: usize, y: usize) -> Result<(), GridError> {
        self.check_bounds(x, y)?;
        self.force_alive(self.idx(x, y), true);
        Ok(())
    }

    /// Force a cell dead, outside the rule cycle.
    pub fn mark_dead(&mut self, x: usize, y: usize) -> Result<(), GridError> {
        self.check_bounds(x, y)?;
        self.force_alive(self.idx(x, y), false);
        Ok(())
    }

    /// Flip a cell (`explicit` = None) or force it (`Some`). Returns the
    /// new liveness.
    pub fn toggle_alive(
        &mut self,
        x: usize,
        y: usize,
        explicit: Option<bool>,
    ) -> Result<bool, GridError> {
        self.check_bounds(x, y)?;
        let idx = self.idx(x, y);
        let alive = explicit.unwrap_or(!self.cells[idx].is_alive());
        self.force_alive(idx, alive);
        Ok(alive)
    }

    /// Set liveness, propagate to neighbours, and keep the cell tracked, so
    /// a manual edit stays visible for at least one pass even when it would
    /// otherwise be pruned straight away.
    fn force_alive(&mut self, idx: usize, alive: bool) {
        self.cells[idx].set_alive(alive);
        self.notify_neighbours(idx, alive);
        self.track.insert(idx);
    }

    /// Seed the board: every cell has its liveness forced per the seed's
    /// decision, rebuilding neighbour sets and the active set as it goes.
    pub fn apply_seed(&mut self, seed: &Seed) {
        let board = seed.generate(self.cols, self.rows);
        for (idx, &alive) in board.iter().enumerate() {
            self.force_alive(idx, alive);
        }
        debug!("seeded board: {} cells alive", self.alive_cells());
    }

    /// Drop every cell back to dead with nothing tracked. Board geometry is
    /// untouched.
    pub fn clear(&mut self) {
        self.allocate();
        self.track.clear();
    }

    /// Read access to a cell.
    pub fn cell(&self, x: usize, y: usize) -> Result<&Cell, GridError> {
        self.check_bounds(x, y)?;
        Ok(&self.cells[self.idx(x, y)])
    }

    /// Propagate liveness at `idx` into the neighbour-sets of its 8
    /// toroidal neighbours, tracking each one as it is visited.
    fn notify_neighbours(&mut self, idx: usize, alive: bool) {
        let (x, y) = (self.cells[idx].x(), self.cells[idx].y());
        self.for_each_neighbour(x, y, |cell| {
            if alive {
                cell.insert_neighbour((x, y));
            } else {
                cell.remove_neighbour((x, y));
            }
        });
    }

    /// Visit the 8 toroidal neighbours of (x, y), wrapping each axis
    /// independently and never visiting (x, y) itself. Every visited
    /// neighbour is inserted into the active set: enumeration always means
    /// "this neighbour now matters".
    pub(crate) fn for_each_neighbour(
        &mut self,
        x: usize,
        y: usize,
        mut visit: impl FnMut(&mut Cell),
    ) {
        let centre = self.idx(x, y);
        for dy in [-1i64, 0, 1] {
            for dx in [-1i64, 0, 1] {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = wrap(x as i64 + dx, self.cols);
                let ny = wrap(y as i64 + dy, self.rows);
                let nidx = self.idx(nx, ny);
                // On 1-wide boards wrapping can land back on the centre.
                if nidx == centre {
                    continue;
                }
                self.track.insert(nidx);
                visit(&mut self.cells[nidx]);
            }
        }
    }

    /// Whether the cell at (x, y) is alive.
    pub fn is_alive(&self, x: usize, y: usize) -> Result<bool, GridError> {
        self.check_bounds(x, y)?;
        Ok(self.cells[self.idx(x, y)].is_alive())
    }

    /// Presentation-facing state of the cell at (x, y).
    pub fn cell_state(&self, x: usize, y: usize) -> Result<CellState, GridError> {
        self.check_bounds(x, y)?;
        Ok(self.cells[self.idx(x, y)].state())
    }

    /// Number of cells currently tracked for evaluation.
    #[inline]
    pub fn tracked_cells(&self) -> usize {
        self.track.len()
    }

    /// Number of alive cells. Every alive cell is tracked, so counting over
    /// the active set is exact.
    pub fn alive_cells(&self) -> usize {
        self.track
            .iter()
            .filter(|&&idx| self.cells[idx].is_alive())
            .count()
    }

    fn check_bounds(&self, x: usize, y: usize) -> Result<(), GridError> {
        if x >= self.cols || y >= self.rows {
            return Err(GridError::OutOfBounds {
                x,
                y,
                cols: self.cols,
                rows: self.rows,
            });
        }
        Ok(())
    }
}
