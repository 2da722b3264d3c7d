use super::BeliefGrid;
use crate::model::cell::Cell;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeliefMetrics {
    /// Shannon entropy in nats.
    pub entropy: f64,
    pub peak_cell: Cell,
    pub peak_probability: f64,
    pub cells: usize,
}

impl BeliefMetrics {
    pub fn from_belief(belief: &BeliefGrid) -> Self {
        let peak_cell = belief.most_likely_cell();
        Self {
            entropy: entropy(belief.as_slice()),
            peak_cell,
            peak_probability: belief.probability(peak_cell),
            cells: belief.as_slice().len(),
        }
    }

    /// Entropy of the uniform distribution over the same board.
    pub fn max_entropy(&self) -> f64 {
        (self.cells as f64).ln()
    }
}

pub fn entropy(probs: &[f64]) -> f64 {
    probs
        .iter()
        .filter(|prob| **prob > 0.0)
        .map(|prob| -prob * prob.ln())
        .sum()
}
