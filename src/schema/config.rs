//! Configuration types for the simulation engine.

use serde::{Deserialize, Serialize};

use super::Seed;

/// Default tick period for normal play, in milliseconds.
fn default_interval_ms() -> u64 {
    50
}

/// Default tick period for the slow debug rhythm, in milliseconds.
fn default_debug_interval_ms() -> u64 {
    200
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Board width in cells.
    pub cols: usize,
    /// Board height in cells.
    pub rows: usize,
    /// Tick period in milliseconds for normal play.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Tick period in milliseconds while debug mode is active.
    #[serde(default = "default_debug_interval_ms")]
    pub debug_interval_ms: u64,
    /// Initial board contents.
    #[serde(default)]
    pub seed: Seed,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            cols: 64,
            rows: 48,
            interval_ms: 50,
            debug_interval_ms: 200,
            seed: Seed::default(),
        }
    }
}

impl SimulationConfig {
    /// Get total number of cells on the board.
    #[inline]
    pub fn board_size(&self) -> usize {
        self.cols * self.rows
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cols == 0 || self.rows == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.interval_ms == 0 || self.debug_interval_ms == 0 {
            return Err(ConfigError::InvalidInterval);
        }
        self.seed.validate(self.cols, self.rows)
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Board dimensions (cols, rows) must be non-zero")]
    InvalidDimensions,
    #[error("Tick intervals must be non-zero")]
    InvalidInterval,
    #[error("Seed probability {0} outside [0, 1]")]
    InvalidProbability(f64),
    #[error("Seed cell ({x}, {y}) outside {cols}x{rows} board")]
    SeedCellOutOfRange {
        x: usize,
        y: usize,
        cols: usize,
        rows: usize,
    },
}
