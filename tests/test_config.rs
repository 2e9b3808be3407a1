use std::rc::Rc;

use sugars::{rc, refcell};

use vm_consolidation::core::config::{parse_config_value, parse_options, ConsolidationConfig};
use vm_consolidation::core::error::ConfigurationError;
use vm_consolidation::core::host::{HostInfo, VmLoad};
use vm_consolidation::core::monitoring::VmDemand;
use vm_consolidation::core::overload_policy::{
    overload_policy_resolver, policy_from_config, OverloadDetectionPolicy, StaticThresholdPolicy,
};
use vm_consolidation::core::threshold_history::ThresholdHistory;

fn name_wrapper(file_name: &str) -> String {
    format!("test-configs/{}", file_name)
}

struct TestHost {
    id: u32,
    total_capacity: f64,
    vms: Vec<Rc<dyn VmLoad>>,
    history: Option<Vec<f64>>,
}

impl HostInfo for TestHost {
    fn id(&self) -> u32 {
        self.id
    }

    fn total_capacity(&self) -> f64 {
        self.total_capacity
    }

    fn vms(&self) -> Vec<Rc<dyn VmLoad>> {
        self.vms.clone()
    }

    fn utilization_history(&self) -> Option<Vec<f64>> {
        self.history.clone()
    }
}

#[test]
fn test_parse_config_value() {
    let (name, options) = parse_config_value("WhaleSearch[sensitivity=0.25,exploration=0.5]");
    assert_eq!(name, "WhaleSearch");
    assert_eq!(options.unwrap(), "sensitivity=0.25,exploration=0.5");

    let (name, options) = parse_config_value("Mean");
    assert_eq!(name, "Mean");
    assert_eq!(options, None);
}

#[test]
fn test_parse_options() {
    let options = parse_options("sensitivity=0.25,exploration=0.5");
    assert_eq!(options.get("sensitivity").unwrap(), "0.25");
    assert_eq!(options.get("exploration").unwrap(), "0.5");
    assert_eq!(options.get("seed"), None);
}

#[test]
fn test_config_from_file() {
    let config = ConsolidationConfig::from_file(&name_wrapper("config.yaml"));
    assert_eq!(config.overload_policy, "WhaleSearch[sensitivity=0.25,exploration=0.5]");
    assert_eq!(config.fallback_policy, "StaticThreshold[threshold=0.8]");
    assert_eq!(config.history_window, 24);
}

#[test]
// Absent parameters are filled with default values.
fn test_config_defaults() {
    let config = ConsolidationConfig::from_file(&name_wrapper("minimal.yaml"));
    assert_eq!(config.overload_policy, "Mean[sensitivity=0.3]");
    assert_eq!(config.fallback_policy, "StaticThreshold[threshold=0.8]");
    assert_eq!(config.history_window, 30);
}

#[test]
// The resolved chain behaves like a hand-built whale policy.
fn test_policy_from_config() {
    let config = ConsolidationConfig::from_file(&name_wrapper("config.yaml"));
    let threshold_history = rc!(refcell!(ThresholdHistory::new()));
    let policy = policy_from_config(&config, threshold_history.clone()).unwrap();

    // estimate = 0.6 * 0.5 = 0.3, threshold = 1 - 0.25 * 0.3 = 0.925
    let host = TestHost {
        id: 1,
        total_capacity: 100.,
        vms: vec![Rc::new(VmDemand::new(95.))],
        history: Some(vec![0.6; 15]),
    };
    assert!(policy.borrow_mut().is_over_utilized(&host));
    let recorded = threshold_history.borrow().host_thresholds(1).to_vec();
    assert!((recorded[0] - 0.925).abs() < 1e-10);

    // hosts without history end up at the static fallback with threshold 0.8
    let no_history = TestHost {
        id: 2,
        total_capacity: 100.,
        vms: vec![Rc::new(VmDemand::new(95.))],
        history: None,
    };
    assert!(policy.borrow_mut().is_over_utilized(&no_history));
    assert!(threshold_history.borrow().host_thresholds(2).is_empty());
}

#[test]
// Sparrow policies resolved from the same config are seeded identically and
// reproduce the same thresholds.
fn test_sparrow_resolution_is_reproducible() {
    let history = vec![0.5; 20];
    let mut recorded = Vec::new();
    for _ in 0..2 {
        let threshold_history = rc!(refcell!(ThresholdHistory::new()));
        let policy = overload_policy_resolver(
            "SparrowSearch[sensitivity=0.2,seed=7]",
            Some(rc!(refcell!(StaticThresholdPolicy::new(0.8).unwrap()))),
            threshold_history.clone(),
        )
        .unwrap();
        let host = TestHost {
            id: 1,
            total_capacity: 100.,
            vms: vec![Rc::new(VmDemand::new(50.))],
            history: Some(history.clone()),
        };
        policy.borrow_mut().is_over_utilized(&host);
        recorded.push(threshold_history.borrow().host_thresholds(1)[0]);
    }
    assert_eq!(recorded[0], recorded[1]);
}

#[test]
fn test_resolver_rejects_unknown_policy() {
    let threshold_history = rc!(refcell!(ThresholdHistory::new()));
    let result = overload_policy_resolver("LocalRegression[sensitivity=1.2]", None, threshold_history);
    assert!(matches!(result, Err(ConfigurationError::UnknownPolicy(_))));
}

#[test]
fn test_resolver_rejects_missing_option() {
    let threshold_history = rc!(refcell!(ThresholdHistory::new()));
    let result = overload_policy_resolver("StaticThreshold", None, threshold_history.clone());
    assert!(matches!(result, Err(ConfigurationError::MissingOption { .. })));

    let result = overload_policy_resolver("WhaleSearch[sensitivity=0.25]", None, threshold_history);
    assert!(matches!(result, Err(ConfigurationError::MissingOption { .. })));
}

#[test]
fn test_resolver_rejects_malformed_option() {
    let threshold_history = rc!(refcell!(ThresholdHistory::new()));
    let result = overload_policy_resolver("StaticThreshold[threshold=high]", None, threshold_history);
    assert!(matches!(result, Err(ConfigurationError::InvalidOption { .. })));
}

#[test]
// A dynamic policy cannot terminate the chain.
fn test_resolver_requires_fallback_for_dynamic_policy() {
    let threshold_history = rc!(refcell!(ThresholdHistory::new()));
    let result = overload_policy_resolver("Mean[sensitivity=0.3]", None, threshold_history);
    assert!(matches!(result, Err(ConfigurationError::MissingFallback(_))));
}

#[test]
// Out-of-range parameter values surface as configuration errors through the resolver.
fn test_resolver_propagates_validation_errors() {
    let threshold_history = rc!(refcell!(ThresholdHistory::new()));
    let fallback = overload_policy_resolver("StaticThreshold[threshold=0.8]", None, threshold_history.clone()).unwrap();

    let result = overload_policy_resolver(
        "WhaleSearch[sensitivity=0.25,exploration=1.5]",
        Some(fallback.clone()),
        threshold_history.clone(),
    );
    assert!(matches!(result, Err(ConfigurationError::ExplorationFactorOutOfRange(_))));

    let result = overload_policy_resolver(
        "Mean[sensitivity=-1]",
        Some(fallback),
        threshold_history,
    );
    assert!(matches!(result, Err(ConfigurationError::NegativeSensitivity(_))));
}
