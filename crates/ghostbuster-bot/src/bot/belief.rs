use ghostbuster_core::belief::telemetry::entropy;
use ghostbuster_core::{BeliefGrid, Cell, InquiredSet, LikelihoodModel, ObservedColor};

/// Lightweight view over a [`BeliefGrid`] used by heuristic planners.
#[derive(Debug, Clone, Copy)]
pub struct BeliefView<'a> {
    belief: &'a BeliefGrid,
    likelihood: &'a LikelihoodModel,
    inquired: &'a InquiredSet,
}

impl<'a> BeliefView<'a> {
    pub fn new(
        belief: &'a BeliefGrid,
        likelihood: &'a LikelihoodModel,
        inquired: &'a InquiredSet,
    ) -> Self {
        Self {
            belief,
            likelihood,
            inquired,
        }
    }

    pub fn belief(&self) -> &'a BeliefGrid {
        self.belief
    }

    pub fn peak(&self) -> (Cell, f64) {
        let cell = self.belief.most_likely_cell();
        (cell, self.belief.probability(cell))
    }

    pub fn uninquired(&self) -> Vec<Cell> {
        self.belief
            .grid()
            .cells()
            .filter(|cell| !self.inquired.contains(*cell))
            .collect()
    }

    /// Most probable cell nobody has probed yet; the overall peak once every cell was probed.
    pub fn best_uninquired(&self) -> Cell {
        let mut best: Option<(Cell, f64)> = None;
        for cell in self.uninquired() {
            let prob = self.belief.probability(cell);
            if best.is_none_or(|(_, top)| prob > top) {
                best = Some((cell, prob));
            }
        }
        best.map(|(cell, _)| cell)
            .unwrap_or_else(|| self.belief.most_likely_cell())
    }

    pub fn entropy(&self) -> f64 {
        entropy(self.belief.as_slice())
    }

    /// Posterior entropy averaged over the colours a probe at `cell` could return.
    pub fn expected_entropy_after(&self, cell: Cell) -> f64 {
        let distribution = self.belief.color_distribution(cell, self.likelihood);
        ObservedColor::ALL
            .iter()
            .zip(distribution)
            .filter(|(_, weight)| *weight > 0.0)
            .map(|(color, weight)| {
                let mut posterior = self.belief.clone();
                posterior.update(cell, *color, self.likelihood);
                weight * entropy(posterior.as_slice())
            })
            .sum()
    }

    /// Cell whose probe is expected to remove the most uncertainty. Ties keep row-major order.
    pub fn most_informative_probe(&self) -> Cell {
        let current = self.entropy();
        let mut best = (self.belief.most_likely_cell(), f64::NEG_INFINITY);
        for cell in self.belief.grid().cells() {
            let gain = current - self.expected_entropy_after(cell);
            if gain > best.1 {
                best = (cell, gain);
            }
        }
        best.0
    }
}
