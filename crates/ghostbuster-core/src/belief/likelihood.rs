//! Conditional observation table P(colour | distance bucket).

use crate::error::ConfigError;
use crate::model::bucket::DistanceBucket;
use crate::model::color::ObservedColor;
use serde::{Deserialize, Serialize};

/// Maximum deviation from 1 tolerated when checking a table row.
pub const LIKELIHOOD_TOLERANCE: f64 = 1e-6;

/// Rows are indexed by [`DistanceBucket`], columns by [`ObservedColor`].
pub type LikelihoodTable = [[f64; 4]; 4];

const DEFAULT_TABLE: LikelihoodTable = [
    [0.80, 0.10, 0.05, 0.05],
    [0.10, 0.70, 0.10, 0.10],
    [0.05, 0.10, 0.70, 0.15],
    [0.05, 0.05, 0.10, 0.80],
];

/// Fuzzy observation model. Every entry is strictly positive so no single
/// probe can rule a cell out entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LikelihoodTable", into = "LikelihoodTable")]
pub struct LikelihoodModel {
    table: LikelihoodTable,
}

impl LikelihoodModel {
    /// Validates and wraps `table`.
    pub fn new(table: LikelihoodTable) -> Result<Self, ConfigError> {
        for (row, entries) in table.iter().enumerate() {
            for (column, value) in entries.iter().enumerate() {
                if !value.is_finite() || *value <= 0.0 {
                    return Err(ConfigError::NonPositiveEntry {
                        row,
                        column,
                        value: *value,
                    });
                }
            }
            let sum: f64 = entries.iter().sum();
            if (sum - 1.0).abs() > LIKELIHOOD_TOLERANCE {
                return Err(ConfigError::RowSum { row, sum });
            }
        }
        Ok(Self { table })
    }

    pub fn likelihood(&self, bucket: DistanceBucket, color: ObservedColor) -> f64 {
        self.table[bucket.index()][color.index()]
    }

    pub fn row(&self, bucket: DistanceBucket) -> &[f64; 4] {
        &self.table[bucket.index()]
    }

    pub fn table(&self) -> &LikelihoodTable {
        &self.table
    }

    /// Colour a sensor at `bucket` reports most often. Ties keep the earlier colour.
    pub fn most_likely_color(&self, bucket: DistanceBucket) -> ObservedColor {
        let row = self.row(bucket);
        let mut best = ObservedColor::Red;
        for color in ObservedColor::ALL {
            if row[color.index()] > row[best.index()] {
                best = color;
            }
        }
        best
    }
}

impl Default for LikelihoodModel {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE,
        }
    }
}

impl TryFrom<LikelihoodTable> for LikelihoodModel {
    type Error = ConfigError;

    fn try_from(table: LikelihoodTable) -> Result<Self, Self::Error> {
        Self::new(table)
    }
}

impl From<LikelihoodModel> for LikelihoodTable {
    fn from(model: LikelihoodModel) -> Self {
        model.table
    }
}
