//! Error types for policy construction and threshold estimation.

use thiserror::Error;

/// Invalid construction parameter.
///
/// Returned instead of constructing the policy or estimator, so a
/// misconfigured object is never observable in a partially valid state.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("sensitivity parameter cannot be less than zero, the passed value is: {0}")]
    NegativeSensitivity(f64),
    #[error("exploration factor must be between 0 and 1, the passed value is: {0}")]
    ExplorationFactorOutOfRange(f64),
    #[error("static threshold must be in (0, 1], the passed value is: {0}")]
    StaticThresholdOutOfRange(f64),
    #[error("unknown overload policy: {0}")]
    UnknownPolicy(String),
    #[error("policy {0} requires a fallback policy")]
    MissingFallback(String),
    #[error("missing option {option} for policy {policy}")]
    MissingOption { policy: String, option: String },
    #[error("invalid value for option {option}: {value}")]
    InvalidOption { option: String, value: String },
}

/// The utilization history cannot be used to compute an estimate.
///
/// Recovered inside the decision operation by delegating to the fallback
/// policy, never propagated to the caller.
#[derive(Debug, Error, PartialEq)]
pub enum InvalidHistoryError {
    #[error("utilization history is empty")]
    Empty,
}
