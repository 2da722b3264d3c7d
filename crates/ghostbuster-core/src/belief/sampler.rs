//! Noisy sensor draws consuming the likelihood table.

use super::LikelihoodModel;
use crate::error::ConfigError;
use crate::model::bucket::DistanceBucket;
use crate::model::color::ObservedColor;
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

/// Draws the colour a probe reports, given the true distance bucket.
///
/// The row of the table selected by the *true* bucket is the categorical
/// distribution sampled from, so a probe on the ghost itself still reports
/// orange with that row's configured probability.
#[derive(Debug, Clone)]
pub struct ObservationSampler {
    rows: Vec<WeightedIndex<f64>>,
}

impl ObservationSampler {
    pub fn new(model: &LikelihoodModel) -> Result<Self, ConfigError> {
        let mut rows = Vec::with_capacity(DistanceBucket::ALL.len());
        for bucket in DistanceBucket::ALL {
            let row = model.row(bucket);
            let weights = WeightedIndex::new(row.iter()).map_err(|_| ConfigError::RowSum {
                row: bucket.index(),
                sum: row.iter().sum(),
            })?;
            rows.push(weights);
        }
        Ok(Self { rows })
    }

    /// Pure function of `(bucket, rng state)`.
    pub fn observe<R: Rng + ?Sized>(&self, bucket: DistanceBucket, rng: &mut R) -> ObservedColor {
        // Each row holds one weight per colour.
        ObservedColor::ALL[self.rows[bucket.index()].sample(rng)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn frequencies(bucket: DistanceBucket, draws: usize, seed: u64) -> [f64; 4] {
        let sampler = ObservationSampler::new(&LikelihoodModel::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut counts = [0usize; 4];
        for _ in 0..draws {
            counts[sampler.observe(bucket, &mut rng).index()] += 1;
        }
        counts.map(|count| count as f64 / draws as f64)
    }

    #[test]
    fn same_seed_yields_same_sequence() {
        let sampler = ObservationSampler::new(&LikelihoodModel::default()).unwrap();
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        for bucket in DistanceBucket::ALL.iter().cycle().take(64) {
            assert_eq!(sampler.observe(*bucket, &mut a), sampler.observe(*bucket, &mut b));
        }
    }

    #[test]
    fn empirical_rates_track_table_rows() {
        let model = LikelihoodModel::default();
        for bucket in DistanceBucket::ALL {
            let observed = frequencies(bucket, 20_000, 11 + bucket.index() as u64);
            for color in ObservedColor::ALL {
                let expected = model.likelihood(bucket, color);
                assert!(
                    (observed[color.index()] - expected).abs() < 0.02,
                    "bucket {bucket} colour {color}: observed {} expected {expected}",
                    observed[color.index()]
                );
            }
        }
    }

    #[test]
    fn ghost_cell_occasionally_reports_orange() {
        let observed = frequencies(DistanceBucket::Zero, 5_000, 3);
        assert!(observed[ObservedColor::Orange.index()] > 0.0);
        assert!(observed[ObservedColor::Red.index()] > observed[ObservedColor::Orange.index()]);
    }

    #[test]
    fn sampled_index_maps_to_the_matching_colour() {
        let mut table = [[0.01; 4]; 4];
        for (index, row) in table.iter_mut().enumerate() {
            row[index] = 0.97;
        }
        let sampler = ObservationSampler::new(&LikelihoodModel::new(table).unwrap()).unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        for bucket in DistanceBucket::ALL {
            let mut counts = [0usize; 4];
            for _ in 0..400 {
                counts[sampler.observe(bucket, &mut rng).index()] += 1;
            }
            let dominant = ObservedColor::ALL[bucket.index()];
            assert!(counts[dominant.index()] > 300, "bucket {bucket}: {counts:?}");
        }
    }
}
