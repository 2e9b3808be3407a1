//! Mean-based estimator.

use crate::core::error::InvalidHistoryError;
use crate::core::threshold_estimator::{mean, ThresholdEstimator};

/// The simplest estimator, the mean of positive history entries.
///
/// Histories without positive entries (including the empty one) produce a
/// zero estimate, so this estimator never fails.
#[derive(Clone)]
pub struct MeanEstimator;

impl MeanEstimator {
    pub fn new() -> Self {
        Self {}
    }
}

impl ThresholdEstimator for MeanEstimator {
    fn estimate(&mut self, history: &[f64]) -> Result<f64, InvalidHistoryError> {
        Ok(mean(history))
    }
}
