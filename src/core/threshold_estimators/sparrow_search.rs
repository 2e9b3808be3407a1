//! Sparrow search estimator.

use rand::prelude::*;
use rand_pcg::Pcg64;

use crate::core::error::InvalidHistoryError;
use crate::core::threshold_estimator::{median, ThresholdEstimator};

const STEP_SIZE: f64 = 0.1;

/// Sparrow-inspired estimator, which perturbs the history median downwards.
///
/// The leader starts at the median of the full history and is updated once
/// per history entry with a random step drawn from
/// `[-STEP_SIZE / 2, STEP_SIZE / 2)`, always keeping the smallest value seen.
/// The result therefore never exceeds the median. Randomness comes from an
/// explicitly seeded generator, so runs with equal seeds and equal histories
/// are reproducible, while repeated calls on one instance advance the
/// generator and produce fresh perturbations.
#[derive(Clone)]
pub struct SparrowSearch {
    rng: Pcg64,
}

impl SparrowSearch {
    /// Creates the estimator with the specified random seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed),
        }
    }
}

impl ThresholdEstimator for SparrowSearch {
    fn estimate(&mut self, history: &[f64]) -> Result<f64, InvalidHistoryError> {
        if history.is_empty() {
            return Err(InvalidHistoryError::Empty);
        }
        let mut leader = median(history);
        for _ in 0..history.len() {
            let rand_factor = self.rng.gen::<f64>() - 0.5;
            let candidate = leader + STEP_SIZE * rand_factor;
            leader = leader.min(candidate);
        }
        Ok(leader)
    }
}
