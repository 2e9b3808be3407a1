//! Whale optimization search estimator.

use crate::core::error::{ConfigurationError, InvalidHistoryError};
use crate::core::threshold_estimator::ThresholdEstimator;

/// Whale-inspired estimator, which scales the history minimum by the
/// exploration factor.
///
/// The best solution is the smallest observed sample, taken over the entire
/// history including zeros, and the estimate is
/// `best * (1 - exploration_factor)`. A factor of 0 keeps the minimum
/// unchanged, a factor of 1 collapses the estimate to zero. This is a
/// single-step search without an iterative population, kept as is.
#[derive(Clone)]
pub struct WhaleSearch {
    exploration_factor: f64,
}

impl WhaleSearch {
    pub fn new(exploration_factor: f64) -> Result<Self, ConfigurationError> {
        if exploration_factor < 0. || exploration_factor > 1. {
            return Err(ConfigurationError::ExplorationFactorOutOfRange(exploration_factor));
        }
        Ok(Self { exploration_factor })
    }
}

impl ThresholdEstimator for WhaleSearch {
    fn estimate(&mut self, history: &[f64]) -> Result<f64, InvalidHistoryError> {
        if history.is_empty() {
            return Err(InvalidHistoryError::Empty);
        }
        let mut best_solution = f64::INFINITY;
        for &value in history {
            best_solution = best_solution.min(value);
        }
        Ok(best_solution * (1. - self.exploration_factor))
    }
}
