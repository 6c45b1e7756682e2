//! Simulation controller: generation counting, update modes, scheduling.

use std::time::{Duration, Instant};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::schema::{ConfigError, SimulationConfig};

use super::{Grid, GridError, Renderer, TickTimer};

/// What a scheduled tick does.
///
/// Normal play runs in `Single`. Debug mode alternates `Apply` and
/// `Transition`, splitting each generation into a human-visible two-beat
/// rhythm: "which cells are about to change", then "commit".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Apply + transition + refresh in one tick; bumps the generation.
    Single,
    /// Rule decisions only: pending marks become visible, nothing commits,
    /// the generation does not advance.
    Apply,
    /// Commit + refresh; bumps the generation.
    Transition,
}

/// Point-in-time readout of a running simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationStats {
    pub generation: u64,
    pub alive_cells: usize,
    pub tracked_cells: usize,
}

/// Drives one [`Grid`] through timed generations.
///
/// Owns the board, the tick scheduler, and the mode state machine. All time
/// enters through caller-supplied [`Instant`]s (see [`TickTimer`]); a driver
/// loop arms the timer with [`Simulation::start`] and calls
/// [`Simulation::poll`] whenever it wakes up.
pub struct Simulation {
    config: SimulationConfig,
    grid: Grid,
    timer: TickTimer,
    generation: u64,
    mode: Mode,
    is_resuming: bool,
    is_showing_intermediate: bool,
}

impl Simulation {
    /// Create a simulation, announce the board to the presentation layer,
    /// and seed it per the configuration.
    pub fn new_game(
        config: SimulationConfig,
        renderer: &mut dyn Renderer,
    ) -> Result<Self, ConfigError> {
        let grid = Grid::new(&config)?;
        let timer = TickTimer::new(Duration::from_millis(config.interval_ms));
        let mut sim = Self {
            grid,
            timer,
            generation: 0,
            mode: Mode::Single,
            is_resuming: false,
            is_showing_intermediate: false,
            config,
        };
        sim.grid.initialize(renderer);
        sim.reset(renderer);
        Ok(sim)
    }

    /// One full generation: decide, commit, sync, count.
    fn run_generation(&mut self, renderer: &mut dyn Renderer) {
        self.grid.apply_rules(renderer);
        self.grid.transition();
        self.grid.refresh(renderer);
        self.generation += 1;
    }

    /// One scheduler beat; its effect depends on the current mode.
    pub fn tick(&mut self, renderer: &mut dyn Renderer) {
        match self.mode {
            Mode::Single => self.run_generation(renderer),
            Mode::Apply => {
                self.grid.apply_rules(renderer);
                self.mode = Mode::Transition;
            }
            Mode::Transition => {
                self.grid.transition();
                self.grid.refresh(renderer);
                self.generation += 1;
                self.mode = Mode::Apply;
            }
        }
    }

    /// Run the given number of full generations immediately, bypassing the
    /// scheduler and the mode machine.
    pub fn run(&mut self, generations: u64, renderer: &mut dyn Renderer) {
        for _ in 0..generations {
            self.run_generation(renderer);
        }
    }

    /// Arm the scheduler for a full interval from `now`.
    pub fn start(&mut self, now: Instant) {
        self.timer.start(now);
        self.is_resuming = true;
    }

    /// Cancel the pending tick, keeping the unelapsed remainder of the
    /// interval for [`Simulation::resume`].
    pub fn stop(&mut self, now: Instant) {
        self.timer.pause(now);
        self.is_resuming = false;
    }

    /// Continue from where [`Simulation::stop`] left off: the next tick
    /// fires after the stored remainder, not a fresh interval.
    pub fn resume(&mut self, now: Instant) {
        self.timer.resume(now);
        self.is_resuming = true;
    }

    /// Flip between running and paused.
    pub fn toggle_resume(&mut self, now: Instant) {
        self.is_showing_intermediate = false;
        if self.is_resuming {
            self.stop(now);
        } else {
            self.resume(now);
        }
    }

    /// Poll the scheduler, running at most one tick per call. Returns true
    /// when a tick fired.
    pub fn poll(&mut self, now: Instant, renderer: &mut dyn Renderer) -> bool {
        if self.timer.poll(now) {
            self.tick(renderer);
            true
        } else {
            false
        }
    }

    /// Stop the scheduler and run exactly one full generation, regardless
    /// of the current mode. The scheduler stays stopped afterwards; debug
    /// alternation restarts at the apply beat.
    pub fn step(&mut self, now: Instant, renderer: &mut dyn Renderer) {
        self.stop(now);
        self.is_showing_intermediate = false;
        if self.mode != Mode::Single {
            self.mode = Mode::Apply;
        }
        self.run_generation(renderer);
    }

    /// Switch between normal play and the slow two-beat debug rhythm.
    ///
    /// Entering debug starts at the apply beat on the debug interval;
    /// leaving restores single-tick play on the normal interval. A running
    /// scheduler is re-armed so the new cadence takes effect immediately.
    pub fn toggle_debug_mode(&mut self, now: Instant) {
        match self.mode {
            Mode::Single => {
                self.mode = Mode::Apply;
                self.timer
                    .set_interval(Duration::from_millis(self.config.debug_interval_ms));
            }
            _ => {
                self.mode = Mode::Single;
                self.timer
                    .set_interval(Duration::from_millis(self.config.interval_ms));
            }
        }
        debug!("update mode switched to {:?}", self.mode);
        if self.is_resuming {
            self.timer.start(now);
        }
    }

    /// Stop and flip between previewing the pending marks and settling the
    /// board view back to its committed state.
    pub fn toggle_inspect(&mut self, now: Instant, renderer: &mut dyn Renderer) {
        self.stop(now);
        if self.is_showing_intermediate {
            self.grid.refresh(renderer);
        } else {
            self.grid.apply_rules(renderer);
        }
        self.is_showing_intermediate = !self.is_showing_intermediate;
    }

    /// Stop everything and start over: fresh board, generation 0, normal
    /// interval, single-tick mode, freshly seeded cells.
    pub fn reset(&mut self, renderer: &mut dyn Renderer) {
        self.timer.stop();
        self.timer
            .set_interval(Duration::from_millis(self.config.interval_ms));
        self.is_resuming = false;
        self.is_showing_intermediate = false;
        self.mode = Mode::Single;
        self.generation = 0;
        self.grid.clear();
        self.grid.apply_seed(&self.config.seed);
        self.grid.refresh(renderer);
        debug!(
            "reset: {} alive, {} tracked",
            self.grid.alive_cells(),
            self.grid.tracked_cells()
        );
    }

    /// Re-seed the board. Same as [`Simulation::reset`], the way a driver's
    /// "seed" control behaves.
    pub fn seed(&mut self, renderer: &mut dyn Renderer) {
        self.reset(renderer);
    }

    /// Inbound user toggle from the presentation layer.
    pub fn on_cell_activated(&mut self, x: usize, y: usize) -> Result<bool, GridError> {
        self.grid.toggle_alive(x, y, None)
    }

    /// Completed generations since the last reset.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current update mode.
    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether the scheduler is armed.
    pub fn is_running(&self) -> bool {
        self.is_resuming
    }

    /// Whether the board currently shows uncommitted pending marks.
    pub fn is_showing_intermediate(&self) -> bool {
        self.is_showing_intermediate
    }

    /// Number of cells the engine will visit next pass.
    pub fn active_cell_count(&self) -> usize {
        self.grid.tracked_cells()
    }

    /// Number of alive cells on the board.
    pub fn alive_cell_count(&self) -> usize {
        self.grid.alive_cells()
    }

    /// Read access to the board.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Get configuration reference.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Snapshot the current counters.
    pub fn stats(&self) -> SimulationStats {
        SimulationStats {
            generation: self.generation,
            alive_cells: self.grid.alive_cells(),
            tracked_cells: self.grid.tracked_cells(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::NullRenderer;
    use crate::schema::{Pattern, Seed};
    use std::collections::BTreeSet;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn cells_config(cols: usize, rows: usize, cells: Vec<(usize, usize)>) -> SimulationConfig {
        SimulationConfig {
            cols,
            rows,
            interval_ms: 100,
            debug_interval_ms: 400,
            seed: Seed {
                pattern: Pattern::Cells { cells },
            },
        }
    }

    fn alive_set(sim: &Simulation) -> BTreeSet<(usize, usize)> {
        let mut alive = BTreeSet::new();
        for y in 0..sim.grid().rows() {
            for x in 0..sim.grid().cols() {
                if sim.grid().is_alive(x, y).unwrap() {
                    alive.insert((x, y));
                }
            }
        }
        alive
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let config = SimulationConfig {
            cols: 0,
            ..Default::default()
        };
        assert!(Simulation::new_game(config, &mut NullRenderer).is_err());
    }

    #[test]
    fn test_full_row_on_3x3_torus_fills_the_board() {
        // Each cell on a 3x3 torus neighbours all 8 others: the alive row
        // gives every live cell 2 alive neighbours (survives) and every
        // dead cell 3 (revives).
        let config = cells_config(3, 3, vec![(0, 0), (1, 0), (2, 0)]);
        let mut sim = Simulation::new_game(config, &mut NullRenderer).unwrap();
        assert_eq!(sim.alive_cell_count(), 3);

        sim.tick(&mut NullRenderer);
        assert_eq!(sim.generation(), 1);
        assert_eq!(alive_set(&sim).len(), 9);

        // And the saturated torus starves completely next generation.
        sim.tick(&mut NullRenderer);
        assert_eq!(sim.alive_cell_count(), 0);
    }

    #[test]
    fn test_glider_translates_by_one_after_four_generations() {
        let glider = vec![(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];
        let config = cells_config(10, 10, glider.clone());
        let mut sim = Simulation::new_game(config, &mut NullRenderer).unwrap();

        sim.run(4, &mut NullRenderer);
        assert_eq!(sim.generation(), 4);

        let expected: BTreeSet<(usize, usize)> =
            glider.iter().map(|&(x, y)| (x + 1, y + 1)).collect();
        assert_eq!(alive_set(&sim), expected);
    }

    #[test]
    fn test_glider_wraps_around_the_torus() {
        let glider = vec![(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];
        let config = cells_config(10, 10, glider.clone());
        let mut sim = Simulation::new_game(config, &mut NullRenderer).unwrap();

        // 40 generations translate by (10, 10): back to the start cells.
        sim.run(40, &mut NullRenderer);
        let expected: BTreeSet<(usize, usize)> = glider.into_iter().collect();
        assert_eq!(alive_set(&sim), expected);
    }

    #[test]
    fn test_debug_mode_alternates_apply_and_transition() {
        let config = cells_config(5, 5, vec![(1, 1), (2, 1), (3, 1)]);
        let mut sim = Simulation::new_game(config, &mut NullRenderer).unwrap();
        let t0 = Instant::now();

        sim.toggle_debug_mode(t0);
        assert_eq!(sim.mode(), Mode::Apply);
        assert_eq!(sim.timer.interval(), ms(400));

        sim.tick(&mut NullRenderer);
        assert_eq!(sim.mode(), Mode::Transition);
        assert_eq!(sim.generation(), 0);

        sim.tick(&mut NullRenderer);
        assert_eq!(sim.mode(), Mode::Apply);
        assert_eq!(sim.generation(), 1);

        sim.toggle_debug_mode(t0);
        assert_eq!(sim.mode(), Mode::Single);
        assert_eq!(sim.timer.interval(), ms(100));
    }

    #[test]
    fn test_two_debug_beats_equal_one_single_tick() {
        let cells = vec![(1, 1), (2, 1), (3, 1), (5, 4), (5, 5)];
        let single = cells_config(8, 8, cells.clone());
        let debug = cells_config(8, 8, cells);

        let mut reference = Simulation::new_game(single, &mut NullRenderer).unwrap();
        reference.tick(&mut NullRenderer);

        let mut split = Simulation::new_game(debug, &mut NullRenderer).unwrap();
        split.toggle_debug_mode(Instant::now());
        split.tick(&mut NullRenderer);
        split.tick(&mut NullRenderer);

        assert_eq!(alive_set(&reference), alive_set(&split));
        assert_eq!(reference.generation(), split.generation());
    }

    #[test]
    fn test_step_runs_one_generation_and_leaves_scheduler_stopped() {
        let config = cells_config(5, 5, vec![(1, 1), (2, 1), (3, 1)]);
        let mut sim = Simulation::new_game(config, &mut NullRenderer).unwrap();
        let t0 = Instant::now();

        sim.start(t0);
        assert!(sim.is_running());

        sim.step(t0 + ms(10), &mut NullRenderer);
        assert_eq!(sim.generation(), 1);
        assert!(!sim.is_running());
        assert!(!sim.poll(t0 + ms(1000), &mut NullRenderer));
    }

    #[test]
    fn test_step_in_debug_mode_runs_a_full_generation() {
        let config = cells_config(5, 5, vec![(1, 1), (2, 1), (3, 1)]);
        let mut sim = Simulation::new_game(config, &mut NullRenderer).unwrap();
        let t0 = Instant::now();

        sim.toggle_debug_mode(t0);
        sim.tick(&mut NullRenderer); // half a generation: marks only
        sim.step(t0, &mut NullRenderer);
        assert_eq!(sim.generation(), 1);
        // The alternation restarts cleanly at the apply beat.
        assert_eq!(sim.mode(), Mode::Apply);
    }

    #[test]
    fn test_pause_resume_preserves_tick_phase() {
        let config = cells_config(5, 5, vec![(1, 1), (2, 1), (3, 1)]);
        let mut sim = Simulation::new_game(config, &mut NullRenderer).unwrap();
        let t0 = Instant::now();

        sim.start(t0);
        assert!(!sim.poll(t0 + ms(40), &mut NullRenderer));
        sim.stop(t0 + ms(40));

        let t1 = t0 + ms(700);
        sim.resume(t1);
        assert!(!sim.poll(t1 + ms(59), &mut NullRenderer));
        assert!(sim.poll(t1 + ms(60), &mut NullRenderer));
        assert_eq!(sim.generation(), 1);
    }

    #[test]
    fn test_toggle_resume_flips_running_state() {
        let config = cells_config(5, 5, vec![]);
        let mut sim = Simulation::new_game(config, &mut NullRenderer).unwrap();
        let t0 = Instant::now();

        assert!(!sim.is_running());
        sim.toggle_resume(t0);
        assert!(sim.is_running());
        sim.toggle_resume(t0 + ms(10));
        assert!(!sim.is_running());
    }

    #[test]
    fn test_toggle_inspect_previews_and_settles() {
        let config = cells_config(5, 5, vec![(1, 1), (2, 1), (3, 1)]);
        let mut sim = Simulation::new_game(config, &mut NullRenderer).unwrap();
        let t0 = Instant::now();

        sim.toggle_inspect(t0, &mut NullRenderer);
        assert!(sim.is_showing_intermediate());
        assert!(!sim.is_running());
        // Marks are visible but nothing has committed.
        assert_eq!(sim.generation(), 0);
        assert_eq!(
            sim.grid().cell_state(2, 0).unwrap(),
            crate::engine::CellState::Reviving
        );

        sim.toggle_inspect(t0, &mut NullRenderer);
        assert!(!sim.is_showing_intermediate());
    }

    #[test]
    fn test_reset_returns_to_generation_zero() {
        let config = cells_config(6, 6, vec![(1, 1), (2, 1), (3, 1)]);
        let mut sim = Simulation::new_game(config, &mut NullRenderer).unwrap();
        let t0 = Instant::now();

        sim.run(3, &mut NullRenderer);
        sim.toggle_debug_mode(t0);
        sim.start(t0);

        sim.reset(&mut NullRenderer);
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.mode(), Mode::Single);
        assert!(!sim.is_running());
        assert_eq!(sim.timer.interval(), ms(100));
        assert_eq!(sim.alive_cell_count(), 3);
    }

    #[test]
    fn test_random_seed_is_reproducible_across_games() {
        let config = SimulationConfig {
            cols: 12,
            rows: 12,
            seed: Seed {
                pattern: Pattern::Random {
                    probability: 0.3,
                    seed: Some(42),
                },
            },
            ..Default::default()
        };

        let a = Simulation::new_game(config.clone(), &mut NullRenderer).unwrap();
        let b = Simulation::new_game(config, &mut NullRenderer).unwrap();
        assert_eq!(alive_set(&a), alive_set(&b));
    }

    #[test]
    fn test_on_cell_activated_toggles_and_bounds_checks() {
        let config = cells_config(4, 4, vec![]);
        let mut sim = Simulation::new_game(config, &mut NullRenderer).unwrap();

        assert!(sim.on_cell_activated(1, 1).unwrap());
        assert!(!sim.on_cell_activated(1, 1).unwrap());
        assert!(sim.on_cell_activated(4, 4).is_err());
    }

    #[test]
    fn test_stats_snapshot() {
        let config = cells_config(5, 5, vec![(1, 1), (2, 1), (3, 1)]);
        let mut sim = Simulation::new_game(config, &mut NullRenderer).unwrap();
        sim.run(1, &mut NullRenderer);

        let stats = sim.stats();
        assert_eq!(stats.generation, 1);
        assert_eq!(stats.alive_cells, 3);
        assert_eq!(stats.tracked_cells, sim.active_cell_count());
    }
}
