//! Host overload detection policies.

use std::cell::RefCell;
use std::rc::Rc;

use dyn_clone::{clone_trait_object, DynClone};
use log::{debug, warn};
use sugars::{rc, refcell};

use crate::core::common::DecisionRecord;
use crate::core::config::{optional_option, parse_config_value, parse_options, require_option, ConsolidationConfig};
use crate::core::error::{ConfigurationError, InvalidHistoryError};
use crate::core::host::HostInfo;
use crate::core::threshold_estimator::{count_non_zero_beginning, mean, ThresholdEstimator};
use crate::core::threshold_estimators::mean::MeanEstimator;
use crate::core::threshold_estimators::sparrow_search::SparrowSearch;
use crate::core::threshold_estimators::whale_search::WhaleSearch;
use crate::core::threshold_history::ThresholdHistory;

/// Minimum length of the leading non-zero run in the utilization history
/// required to apply a search-based estimator instead of the mean.
pub const MIN_VALID_HISTORY_LENGTH: usize = 12;

/// Random seed used by SparrowSearch when the config does not specify one.
const DEFAULT_SEED: u64 = 123;

/// Trait for implementation of overload detection policies.
///
/// The consolidation controller queries the policy once per host per
/// monitoring tick. Policies are composable: any policy can serve as the
/// fallback of another one, forming a delegation chain of arbitrary depth.
pub trait OverloadDetectionPolicy: DynClone {
    fn is_over_utilized(&mut self, host: &dyn HostInfo) -> bool;
}

clone_trait_object!(OverloadDetectionPolicy);

////////////////////////////////////////////////////////////////////////////////

/// Adaptive policy, which compares the current host utilization against a
/// threshold derived from the utilization history.
///
/// The threshold is computed as `1 - sensitivity * estimate`, so a larger
/// sensitivity or a larger estimate lowers the threshold and makes detection
/// more aggressive. The estimate comes from the configured estimator once the
/// history has at least [`MIN_VALID_HISTORY_LENGTH`] leading non-zero
/// samples, and from the mean of positive samples before that. Hosts without
/// utilization history, and histories the estimator cannot process, are
/// delegated to the fallback policy.
#[derive(Clone)]
pub struct DynamicThresholdPolicy {
    sensitivity: f64,
    estimator: Box<dyn ThresholdEstimator>,
    fallback: Rc<RefCell<dyn OverloadDetectionPolicy>>,
    threshold_history: Rc<RefCell<ThresholdHistory>>,
}

impl DynamicThresholdPolicy {
    pub fn new(
        sensitivity: f64,
        estimator: Box<dyn ThresholdEstimator>,
        fallback: Rc<RefCell<dyn OverloadDetectionPolicy>>,
        threshold_history: Rc<RefCell<ThresholdHistory>>,
    ) -> Result<Self, ConfigurationError> {
        if sensitivity < 0. {
            return Err(ConfigurationError::NegativeSensitivity(sensitivity));
        }
        Ok(Self {
            sensitivity,
            estimator,
            fallback,
            threshold_history,
        })
    }

    /// Estimates the safe utilization level from the history.
    /// Search-based estimators apply only to sufficiently warmed up
    /// histories, colder ones fall back to the mean of positive samples.
    fn estimate(&mut self, history: &[f64]) -> Result<f64, InvalidHistoryError> {
        if count_non_zero_beginning(history) >= MIN_VALID_HISTORY_LENGTH {
            self.estimator.estimate(history)
        } else {
            Ok(mean(history))
        }
    }

    /// Evaluates the host and returns the full decision record, or `None` if
    /// the decision must be delegated to the fallback policy.
    pub fn evaluate(&mut self, host: &dyn HostInfo) -> Option<DecisionRecord> {
        let history = host.utilization_history()?;
        let estimate = match self.estimate(&history) {
            Ok(estimate) => estimate,
            Err(e) => {
                warn!("cannot estimate safe utilization for host #{}: {}", host.id(), e);
                return None;
            }
        };
        let threshold = 1. - self.sensitivity * estimate;
        self.threshold_history.borrow_mut().record(host.id(), threshold);

        let mut total_requested = 0.;
        for vm in host.vms() {
            total_requested += vm.current_requested_capacity();
        }
        let utilization = total_requested / host.total_capacity();
        debug!(
            "host #{}: utilization {:.3}, threshold {:.3}",
            host.id(),
            utilization,
            threshold
        );
        Some(DecisionRecord {
            host_id: host.id(),
            threshold,
            utilization,
            is_over_utilized: utilization > threshold,
        })
    }
}

impl OverloadDetectionPolicy for DynamicThresholdPolicy {
    fn is_over_utilized(&mut self, host: &dyn HostInfo) -> bool {
        match self.evaluate(host) {
            Some(record) => record.is_over_utilized,
            None => self.fallback.borrow_mut().is_over_utilized(host),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Baseline policy with a fixed utilization threshold.
/// Commonly used as the terminal element of a fallback chain.
#[derive(Clone)]
pub struct StaticThresholdPolicy {
    threshold: f64,
}

impl StaticThresholdPolicy {
    pub fn new(threshold: f64) -> Result<Self, ConfigurationError> {
        if threshold <= 0. || threshold > 1. {
            return Err(ConfigurationError::StaticThresholdOutOfRange(threshold));
        }
        Ok(Self { threshold })
    }
}

impl OverloadDetectionPolicy for StaticThresholdPolicy {
    fn is_over_utilized(&mut self, host: &dyn HostInfo) -> bool {
        let mut total_requested = 0.;
        for vm in host.vms() {
            total_requested += vm.current_requested_capacity();
        }
        total_requested / host.total_capacity() > self.threshold
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Creates an overload detection policy based on the config string.
///
/// Dynamic policies require a fallback, the static one ignores it. Unknown
/// names and malformed options are configuration errors.
pub fn overload_policy_resolver(
    config_str: &str,
    fallback: Option<Rc<RefCell<dyn OverloadDetectionPolicy>>>,
    threshold_history: Rc<RefCell<ThresholdHistory>>,
) -> Result<Rc<RefCell<dyn OverloadDetectionPolicy>>, ConfigurationError> {
    let (policy_name, options_str) = parse_config_value(config_str);
    let options = parse_options(&options_str.unwrap_or_default());

    let estimator: Box<dyn ThresholdEstimator> = match policy_name.as_str() {
        "Mean" => Box::new(MeanEstimator::new()),
        "WhaleSearch" => {
            let exploration = require_option::<f64>(&policy_name, &options, "exploration")?;
            Box::new(WhaleSearch::new(exploration)?)
        }
        "SparrowSearch" => {
            let seed = optional_option::<u64>(&options, "seed")?.unwrap_or(DEFAULT_SEED);
            Box::new(SparrowSearch::new(seed))
        }
        "StaticThreshold" => {
            let threshold = require_option::<f64>(&policy_name, &options, "threshold")?;
            return Ok(rc!(refcell!(StaticThresholdPolicy::new(threshold)?)));
        }
        _ => return Err(ConfigurationError::UnknownPolicy(policy_name)),
    };

    let sensitivity = require_option::<f64>(&policy_name, &options, "sensitivity")?;
    let fallback = fallback.ok_or(ConfigurationError::MissingFallback(policy_name))?;
    Ok(rc!(refcell!(DynamicThresholdPolicy::new(
        sensitivity,
        estimator,
        fallback,
        threshold_history,
    )?)))
}

/// Builds the policy chain described by the config: the fallback policy is
/// resolved first and attached to the primary one.
pub fn policy_from_config(
    config: &ConsolidationConfig,
    threshold_history: Rc<RefCell<ThresholdHistory>>,
) -> Result<Rc<RefCell<dyn OverloadDetectionPolicy>>, ConfigurationError> {
    let fallback = overload_policy_resolver(&config.fallback_policy, None, threshold_history.clone())?;
    overload_policy_resolver(&config.overload_policy, Some(fallback), threshold_history)
}
