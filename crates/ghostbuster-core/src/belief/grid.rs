//! Per-cell distribution over the ghost's location and its Bayesian update.

use super::LikelihoodModel;
use crate::model::bucket::DistanceBucket;
use crate::model::cell::Cell;
use crate::model::color::ObservedColor;
use crate::model::grid::Grid;

/// Tolerance used when asserting that the distribution sums to one.
pub const NORMALIZATION_TOLERANCE: f64 = 1e-9;

/// Probability that the ghost occupies each cell.
///
/// Invariants after construction and after every update: every entry is at
/// least `floor`, and the entries sum to one.
#[derive(Debug, Clone, PartialEq)]
pub struct BeliefGrid {
    grid: Grid,
    floor: f64,
    probs: Vec<f64>,
}

impl BeliefGrid {
    /// Uniform `1 / N²` over every cell.
    pub fn uniform(grid: Grid, floor: f64) -> Self {
        let mut belief = Self {
            grid,
            floor,
            probs: Vec::new(),
        };
        belief.uniform_init();
        belief
    }

    /// Rebuilds a belief from persisted values without renormalizing.
    pub(crate) fn from_raw(grid: Grid, floor: f64, probs: Vec<f64>) -> Self {
        Self { grid, floor, probs }
    }

    /// Resets every cell to `1 / N²`.
    pub fn uniform_init(&mut self) {
        let count = self.grid.cell_count();
        self.probs = vec![1.0 / count as f64; count];
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn floor(&self) -> f64 {
        self.floor
    }

    /// Probability mass at `cell`. Off-grid cells carry none.
    pub fn probability(&self, cell: Cell) -> f64 {
        self.grid
            .index_of(cell)
            .map(|index| self.probs[index])
            .unwrap_or(0.0)
    }

    /// Row-major probabilities.
    pub fn as_slice(&self) -> &[f64] {
        &self.probs
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.probs.clone()
    }

    pub fn total(&self) -> f64 {
        self.probs.iter().sum()
    }

    pub fn min(&self) -> f64 {
        self.probs.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Arg-max; ties resolve to the first cell in row-major order.
    pub fn most_likely_cell(&self) -> Cell {
        let mut best_index = 0;
        for (index, prob) in self.probs.iter().enumerate() {
            if *prob > self.probs[best_index] {
                best_index = index;
            }
        }
        self.grid.cell_at(best_index).unwrap_or(Cell::new(0, 0))
    }

    /// Folds one observation into the distribution.
    ///
    /// Every cell is reweighted by the likelihood of `color` at its distance
    /// from `clicked`, so mass can flow back into cells earlier evidence had
    /// pushed down to the floor.
    pub fn update(&mut self, clicked: Cell, color: ObservedColor, model: &LikelihoodModel) {
        for (cell, prob) in self.grid.cells().zip(self.probs.iter_mut()) {
            let bucket = DistanceBucket::from_distance(cell.chebyshev(clicked));
            *prob *= model.likelihood(bucket, color);
        }
        self.normalize();
        self.enforce_floor();
    }

    /// Probability of each colour if `probe` were inquired now.
    pub fn color_distribution(&self, probe: Cell, model: &LikelihoodModel) -> [f64; 4] {
        let mut result = [0.0; 4];
        for (cell, prob) in self.grid.cells().zip(self.probs.iter()) {
            let row = model.row(DistanceBucket::from_distance(cell.chebyshev(probe)));
            for (slot, likelihood) in result.iter_mut().zip(row.iter()) {
                *slot += prob * likelihood;
            }
        }
        result
    }

    fn normalize(&mut self) {
        // Entries are >= floor > 0 and likelihoods are positive, so the total is too.
        let total: f64 = self.probs.iter().sum();
        for prob in &mut self.probs {
            *prob /= total;
        }
    }

    /// Raises sub-floor cells to the floor and rescales the rest so the total
    /// stays one. Rescaling can drag further cells under the floor, so the
    /// pinned set grows until it is stable; it can never cover every cell
    /// because `floor * N² < 1`.
    fn enforce_floor(&mut self) {
        let floor = self.floor;
        let mut pinned: Vec<bool> = self.probs.iter().map(|prob| *prob < floor).collect();
        if !pinned.iter().any(|p| *p) {
            return;
        }

        loop {
            let pinned_count = pinned.iter().filter(|p| **p).count();
            let free_mass: f64 = self
                .probs
                .iter()
                .zip(&pinned)
                .filter(|(_, p)| !**p)
                .map(|(prob, _)| *prob)
                .sum();
            debug_assert!(free_mass > 0.0);
            let scale = (1.0 - pinned_count as f64 * floor) / free_mass;

            let mut grew = false;
            for (prob, p) in self.probs.iter().zip(pinned.iter_mut()) {
                if !*p && prob * scale < floor {
                    *p = true;
                    grew = true;
                }
            }
            if grew {
                continue;
            }

            for (prob, p) in self.probs.iter_mut().zip(&pinned) {
                *prob = if *p { floor } else { *prob * scale };
            }
            return;
        }
    }
}
