//! Error taxonomy for the engine.

use thiserror::Error;

/// Malformed game configuration. Raised at construction and never recovered locally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("likelihood row {row} sums to {sum}, expected 1")]
    RowSum { row: usize, sum: f64 },
    #[error("likelihood entry at row {row}, column {column} must be positive (found {value})")]
    NonPositiveEntry { row: usize, column: usize, value: f64 },
    #[error("grid size {size} is too small; at least 2 is required")]
    GridTooSmall { size: usize },
    #[error("grid size {size} exceeds the supported maximum of {max}")]
    GridTooLarge { size: usize, max: usize },
    #[error("probability floor {min_prob} cannot hold on {cells} cells")]
    FloorUnsatisfiable { min_prob: f64, cells: usize },
    #[error("movement threshold {value} must lie in (0, 1]")]
    Threshold { value: f64 },
    #[error("starting ghost cell ({row}, {col}) lies outside the {grid_size}x{grid_size} grid")]
    GhostOutOfBounds {
        row: usize,
        col: usize,
        grid_size: usize,
    },
}

/// Errors surfaced by turn operations. A failed call never mutates the game.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("cell ({row}, {col}) lies outside the {grid_size}x{grid_size} grid")]
    InvalidCell {
        row: usize,
        col: usize,
        grid_size: usize,
    },
    #[error("the game has already concluded")]
    InvalidState,
}

/// Failures while loading a persisted game.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to decode snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot carries an invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("belief has {found} entries, expected {expected}")]
    BeliefLength { expected: usize, found: usize },
    #[error("belief entry {index} is not a valid probability ({value})")]
    InvalidBelief { index: usize, value: f64 },
    #[error("belief entry {index} ({value}) sits below the probability floor {floor}")]
    BeliefBelowFloor { index: usize, value: f64, floor: f64 },
    #[error("belief sums to {sum}, expected 1")]
    BeliefSum { sum: f64 },
    #[error("ghost position ({row}, {col}) lies outside the grid")]
    GhostOutOfBounds { row: usize, col: usize },
    #[error("inquired cell ({row}, {col}) lies outside the grid")]
    CellOutOfBounds { row: usize, col: usize },
    #[error("observed colour recorded for ({row}, {col}), which was never inquired")]
    UninquiredObservation { row: usize, col: usize },
}
