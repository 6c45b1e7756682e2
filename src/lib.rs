//! Incremental Game of Life engine with sparse active-set tracking.
//!
//! This crate implements a toroidal (wrap-around) variant of Conway's Game
//! of Life that only visits cells whose state could plausibly change,
//! instead of scanning the full board every generation. The working set is
//! bounded by the living region plus its one-cell halo, so per-generation
//! cost is proportional to the active population rather than board area.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration types and seeding for simulations
//! - `engine`: The simulation core (cells, grid, scheduler, controller)
//!
//! Rendering is out of scope: the engine reports state changes through the
//! [`engine::Renderer`] trait and a presentation layer draws them.
//!
//! # Example
//!
//! ```rust
//! use sparse_life::{
//!     engine::{NullRenderer, Simulation},
//!     schema::SimulationConfig,
//! };
//!
//! let config = SimulationConfig {
//!     cols: 32,
//!     rows: 32,
//!     ..Default::default()
//! };
//!
//! let mut renderer = NullRenderer;
//! let mut sim = Simulation::new_game(config, &mut renderer).unwrap();
//!
//! // Advance one full generation.
//! sim.run(1, &mut renderer);
//! assert_eq!(sim.generation(), 1);
//! ```

pub mod engine;
pub mod schema;

// Re-export commonly used types
pub use engine::{
    CellState, Grid, GridError, Mode, NullRenderer, Renderer, Simulation, SimulationStats,
    TickTimer,
};
pub use schema::{Pattern, Seed, SimulationConfig};
