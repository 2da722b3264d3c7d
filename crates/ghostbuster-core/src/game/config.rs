use crate::belief::LikelihoodModel;
use crate::error::ConfigError;
use crate::ghost::{DEFAULT_MOVEMENT_THRESHOLD, RelocationPolicy};
use crate::model::cell::Cell;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

pub const DEFAULT_GRID_SIZE: usize = 10;
pub const DEFAULT_MIN_PROB: f64 = 1e-5;
pub const DEFAULT_GHOST_MOVES: u32 = 3;
/// Largest accepted side length; the belief holds `MAX_GRID_SIZE²` floats.
pub const MAX_GRID_SIZE: usize = 1024;

/// Parameters fixed for the lifetime of one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid_size: usize,
    pub likelihood_table: LikelihoodModel,
    /// Probability floor every cell is held at or above.
    pub min_prob: f64,
    /// Share of the ghost's neighbourhood that must be inquired before it moves.
    pub movement_threshold: f64,
    /// Relocation budget.
    pub moves_left: u32,
    pub relocation: RelocationPolicy,
    pub rng_seed: Option<u64>,
    /// Fixed starting cell; drawn from the RNG when absent.
    pub ghost_start: Option<Cell>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            likelihood_table: LikelihoodModel::default(),
            min_prob: DEFAULT_MIN_PROB,
            movement_threshold: DEFAULT_MOVEMENT_THRESHOLD,
            moves_left: DEFAULT_GHOST_MOVES,
            relocation: RelocationPolicy::default(),
            rng_seed: None,
            ghost_start: None,
        }
    }
}

impl GameConfig {
    /// Defaults overlaid with `GHOSTBUSTER_*` environment variables.
    pub fn from_env() -> Self {
        let base = Self::default();
        Self {
            grid_size: parse_env("GHOSTBUSTER_GRID_SIZE", base.grid_size),
            min_prob: parse_env("GHOSTBUSTER_MIN_PROB", base.min_prob),
            movement_threshold: parse_env("GHOSTBUSTER_MOVE_THRESHOLD", base.movement_threshold),
            moves_left: parse_env("GHOSTBUSTER_MOVES", base.moves_left),
            ..base
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < 2 {
            return Err(ConfigError::GridTooSmall {
                size: self.grid_size,
            });
        }

        if self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge {
                size: self.grid_size,
                max: MAX_GRID_SIZE,
            });
        }

        let cells = self.grid_size * self.grid_size;
        if !(self.min_prob > 0.0 && self.min_prob * (cells as f64) < 1.0) {
            return Err(ConfigError::FloorUnsatisfiable {
                min_prob: self.min_prob,
                cells,
            });
        }

        if !(self.movement_threshold > 0.0 && self.movement_threshold <= 1.0) {
            return Err(ConfigError::Threshold {
                value: self.movement_threshold,
            });
        }

        if let Some(start) = self.ghost_start
            && (start.row >= self.grid_size || start.col >= self.grid_size)
        {
            return Err(ConfigError::GhostOutOfBounds {
                row: start.row,
                col: start.col,
                grid_size: self.grid_size,
            });
        }

        // Re-run table validation in case the table was edited after deserialization.
        LikelihoodModel::new(*self.likelihood_table.table())?;
        Ok(())
    }
}

fn parse_env<T: FromStr>(key: &str, fallback: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<T>().ok())
        .unwrap_or(fallback)
}
