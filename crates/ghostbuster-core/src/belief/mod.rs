//! Probabilistic belief over the ghost's hidden location.
//!
//! This module is composed of:
//! - `likelihood`: the validated observation table P(colour | distance bucket).
//! - `sampler`: noisy colour draws from the table given the true distance.
//! - `grid`: the per-cell distribution and its Bayesian update.
//! - `telemetry`: summary metrics computed from a belief snapshot.

mod grid;
mod likelihood;
mod sampler;
pub mod telemetry;

pub use grid::{BeliefGrid, NORMALIZATION_TOLERANCE};
pub use likelihood::{LIKELIHOOD_TOLERANCE, LikelihoodModel, LikelihoodTable};
pub use sampler::ObservationSampler;
