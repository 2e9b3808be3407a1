//! Utilization threshold estimators.

use dyn_clone::{clone_trait_object, DynClone};

use crate::core::error::InvalidHistoryError;

/// Trait for implementation of threshold estimators.
///
/// An estimator converts a host utilization history into a single scalar in
/// `[0, max(history)]`, which the decision policy turns into a dynamic
/// overload threshold. Estimators owning a random source take `&mut self` so
/// that repeated calls advance the generator.
pub trait ThresholdEstimator: DynClone {
    fn estimate(&mut self, history: &[f64]) -> Result<f64, InvalidHistoryError>;
}

clone_trait_object!(ThresholdEstimator);

/// Computes the arithmetic mean of strictly positive entries.
/// Zero and negative entries are excluded from both the sum and the count.
/// Returns 0 if there are no positive entries.
pub fn mean(data: &[f64]) -> f64 {
    let mut sum = 0.;
    let mut count = 0;
    for &value in data {
        if value > 0. {
            sum += value;
            count += 1;
        }
    }
    if count == 0 {
        return 0.;
    }
    sum / count as f64
}

/// Computes the median over a sorted copy of the full data, zeros included.
/// For even lengths the two middle elements are averaged.
/// The data must be non-empty.
pub fn median(data: &[f64]) -> f64 {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let middle = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[middle - 1] + sorted[middle]) / 2.
    } else {
        sorted[middle]
    }
}

/// Counts the number of non-zero values at the beginning of the data.
/// Stops at the first zero, even if non-zero values follow it.
pub fn count_non_zero_beginning(data: &[f64]) -> usize {
    let mut count = 0;
    for &value in data {
        if value == 0. {
            break;
        }
        count += 1;
    }
    count
}
