use crate::model::cell::Cell;
use crate::model::grid::Grid;
use std::collections::BTreeSet;

/// Cells probed so far.
///
/// `history` keeps every inquiry for the whole game. `since_move` only holds
/// inquiries made after the ghost last relocated and is what the movement
/// rule counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InquiredSet {
    history: BTreeSet<Cell>,
    since_move: BTreeSet<Cell>,
}

impl InquiredSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(history: BTreeSet<Cell>, since_move: BTreeSet<Cell>) -> Self {
        Self {
            history,
            since_move,
        }
    }

    pub fn record(&mut self, cell: Cell) {
        self.history.insert(cell);
        self.since_move.insert(cell);
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.history.contains(&cell)
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.history.iter().copied()
    }

    pub fn since_move(&self) -> impl Iterator<Item = Cell> + '_ {
        self.since_move.iter().copied()
    }

    /// Fraction of `center`'s neighbours inquired since the last relocation.
    pub fn neighbor_fraction(&self, grid: Grid, center: Cell) -> f64 {
        let neighbors = grid.neighbors(center);
        if neighbors.is_empty() {
            return 0.0;
        }
        let probed = neighbors
            .iter()
            .filter(|cell| self.since_move.contains(*cell))
            .count();
        probed as f64 / neighbors.len() as f64
    }

    /// True when `cell` or any of its neighbours has ever been inquired.
    pub fn touches(&self, grid: Grid, cell: Cell) -> bool {
        self.contains(cell)
            || grid
                .neighbors(cell)
                .into_iter()
                .any(|neighbor| self.contains(neighbor))
    }

    pub(crate) fn clear_adjacency(&mut self) {
        self.since_move.clear();
    }
}
