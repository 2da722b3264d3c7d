use super::config::GameConfig;
use super::game_state::{GamePhase, GameState};
use crate::belief::{BeliefGrid, NORMALIZATION_TOLERANCE};
use crate::error::SnapshotError;
use crate::ghost::InquiredSet;
use crate::model::cell::Cell;
use crate::model::color::ObservedColor;
use crate::model::grid::Grid;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Persisted form of a game. Belief values are stored and restored verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub grid_size: usize,
    pub belief: Vec<f64>,
    pub ghost_position: Cell,
    pub moves_left: u32,
    pub inquired_cells: Vec<Cell>,
    /// Inquiries made since the ghost last moved; defaults to every inquired cell.
    #[serde(default)]
    pub adjacency_cells: Option<Vec<Cell>>,
    #[serde(default)]
    pub observed_colors: Vec<CellObservation>,
    #[serde(default)]
    pub inquiries: u32,
    #[serde(default)]
    pub phase: GamePhase,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub config: Option<GameConfig>,
}

/// Latest colour seen at an inquired cell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CellObservation {
    pub cell: Cell,
    pub color: ObservedColor,
}

impl GameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        GameSnapshot {
            grid_size: state.grid().size(),
            belief: state.belief().to_vec(),
            ghost_position: state.ghost_position(),
            moves_left: state.moves_left(),
            inquired_cells: state.inquired().iter().collect(),
            adjacency_cells: Some(state.inquired().since_move().collect()),
            observed_colors: state
                .observed_colors()
                .iter()
                .map(|(&cell, &color)| CellObservation { cell, color })
                .collect(),
            inquiries: state.inquiries(),
            phase: state.phase(),
            seed: Some(state.seed()),
            config: Some(state.config().clone()),
        }
    }

    /// Rebuilds the game. The RNG is reseeded from the stored seed; its stream
    /// position is not persisted.
    pub fn restore(self) -> Result<GameState, SnapshotError> {
        let mut config = self.config.unwrap_or_default();
        config.grid_size = self.grid_size;
        config.validate()?;

        let grid = Grid::new(self.grid_size);
        if self.belief.len() != grid.cell_count() {
            return Err(SnapshotError::BeliefLength {
                expected: grid.cell_count(),
                found: self.belief.len(),
            });
        }
        if let Some((index, value)) = self
            .belief
            .iter()
            .copied()
            .enumerate()
            .find(|(_, value)| !(value.is_finite() && *value > 0.0 && *value <= 1.0))
        {
            return Err(SnapshotError::InvalidBelief { index, value });
        }
        // Floor-pinned cells are stored exactly at the floor.
        if let Some((index, value)) = self
            .belief
            .iter()
            .copied()
            .enumerate()
            .find(|(_, value)| *value < config.min_prob)
        {
            return Err(SnapshotError::BeliefBelowFloor {
                index,
                value,
                floor: config.min_prob,
            });
        }
        let sum: f64 = self.belief.iter().sum();
        if (sum - 1.0).abs() > NORMALIZATION_TOLERANCE {
            return Err(SnapshotError::BeliefSum { sum });
        }
        if !grid.contains(self.ghost_position) {
            return Err(SnapshotError::GhostOutOfBounds {
                row: self.ghost_position.row,
                col: self.ghost_position.col,
            });
        }

        let history = collect_cells(grid, self.inquired_cells.iter().copied())?;
        let since_move = match self.adjacency_cells {
            Some(cells) => collect_cells(grid, cells.into_iter())?,
            None => history.clone(),
        };
        let mut colors = BTreeMap::new();
        for CellObservation { cell, color } in self.observed_colors {
            if !history.contains(&cell) {
                return Err(SnapshotError::UninquiredObservation {
                    row: cell.row,
                    col: cell.col,
                });
            }
            colors.insert(cell, color);
        }

        let seed = self.seed.unwrap_or_else(rand::random);
        let belief = BeliefGrid::from_raw(grid, config.min_prob, self.belief);

        GameState::assemble(
            config,
            seed,
            StdRng::seed_from_u64(seed),
            belief,
            self.ghost_position,
            Some(self.moves_left),
            InquiredSet::from_parts(history, since_move),
            colors,
            self.phase,
            self.inquiries,
        )
        .map_err(SnapshotError::from)
    }

    pub fn to_json(state: &GameState) -> serde_json::Result<String> {
        let snapshot = Self::capture(state);
        serde_json::to_string_pretty(&snapshot)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl GameState {
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(self)
    }

    pub fn from_snapshot(snapshot: GameSnapshot) -> Result<Self, SnapshotError> {
        snapshot.restore()
    }

    pub fn load_json(json: &str) -> Result<Self, SnapshotError> {
        Self::from_snapshot(GameSnapshot::from_json(json)?)
    }
}

fn collect_cells(
    grid: Grid,
    cells: impl Iterator<Item = Cell>,
) -> Result<BTreeSet<Cell>, SnapshotError> {
    let mut set = BTreeSet::new();
    for cell in cells {
        if !grid.contains(cell) {
            return Err(SnapshotError::CellOutOfBounds {
                row: cell.row,
                col: cell.col,
            });
        }
        set.insert(cell);
    }
    Ok(set)
}
