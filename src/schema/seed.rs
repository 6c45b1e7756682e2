//! Seed types for initializing the board.

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Complete seed specification for board initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seed {
    /// Pattern to use for seeding.
    pub pattern: Pattern,
}

impl Default for Seed {
    fn default() -> Self {
        Self {
            pattern: Pattern::Random {
                probability: 0.2,
                seed: None,
            },
        }
    }
}

/// Predefined patterns for initialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pattern {
    /// Independent random draw per cell.
    Random {
        /// Chance in [0, 1] that a cell starts alive.
        probability: f64,
        /// Fixed RNG seed for reproducible boards (None = entropy).
        seed: Option<u64>,
    },
    /// Explicit list of alive cells (sparse representation).
    Cells {
        /// List of (x, y) entries.
        cells: Vec<(usize, usize)>,
    },
}

impl Seed {
    /// Check pattern parameters against the board dimensions.
    pub(crate) fn validate(&self, cols: usize, rows: usize) -> Result<(), ConfigError> {
        match &self.pattern {
            Pattern::Random { probability, .. } => {
                if !(0.0..=1.0).contains(probability) {
                    return Err(ConfigError::InvalidProbability(*probability));
                }
            }
            Pattern::Cells { cells } => {
                for &(x, y) in cells {
                    if x >= cols || y >= rows {
                        return Err(ConfigError::SeedCellOutOfRange { x, y, cols, rows });
                    }
                }
            }
        }
        Ok(())
    }

    /// Decide liveness for every cell of a cols x rows board.
    ///
    /// Returned row-major, `y * cols + x` indexing.
    pub(crate) fn generate(&self, cols: usize, rows: usize) -> Vec<bool> {
        let mut board = vec![false; cols * rows];
        match &self.pattern {
            Pattern::Random { probability, seed } => {
                let mut rng = match seed {
                    Some(s) => StdRng::seed_from_u64(*s),
                    None => StdRng::from_entropy(),
                };
                for cell in board.iter_mut() {
                    *cell = rng.gen_bool(*probability);
                }
            }
            Pattern::Cells { cells } => {
                for &(x, y) in cells {
                    board[y * cols + x] = true;
                }
            }
        }
        board
    }
}
