//! Consolidation configuration.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::ConfigurationError;
use crate::core::monitoring::DEFAULT_HISTORY_WINDOW;

/// Holds raw config parsed from YAML file.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
struct RawConsolidationConfig {
    pub overload_policy: Option<String>,
    pub fallback_policy: Option<String>,
    pub history_window: Option<usize>,
}

/// Represents overload detection configuration.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct ConsolidationConfig {
    /// Primary overload detection policy.
    pub overload_policy: String,
    /// Policy used when the primary one cannot produce a decision.
    pub fallback_policy: String,
    /// Length of the per-host utilization history window.
    pub history_window: usize,
}

impl ConsolidationConfig {
    /// Creates config by reading parameter values from YAML file
    /// (uses default values if some parameters are absent).
    pub fn from_file(file_name: &str) -> Self {
        let raw: RawConsolidationConfig = serde_yaml::from_str(
            &std::fs::read_to_string(file_name).unwrap_or_else(|_| panic!("Can't read file {}", file_name)),
        )
        .unwrap_or_else(|_| panic!("Can't parse YAML from file {}", file_name));

        Self {
            overload_policy: raw
                .overload_policy
                .unwrap_or_else(|| "StaticThreshold[threshold=0.8]".to_string()),
            fallback_policy: raw
                .fallback_policy
                .unwrap_or_else(|| "StaticThreshold[threshold=0.8]".to_string()),
            history_window: raw.history_window.unwrap_or(DEFAULT_HISTORY_WINDOW),
        }
    }
}

/// Parses config value string, which consists of two parts - name and options.
/// Example: WhaleSearch[sensitivity=0.25,exploration=0.5] parts are name WhaleSearch
/// and options string "sensitivity=0.25,exploration=0.5".
pub fn parse_config_value(config_str: &str) -> (String, Option<String>) {
    match config_str.split_once('[') {
        Some((l, r)) => (l.to_string(), Some(r.to_string().replace(']', ""))),
        None => (config_str.to_string(), None),
    }
}

/// Parses options string from config value, returns map with option names and values.
///
/// # Examples
///
/// ```rust
/// use vm_consolidation::core::config::parse_options;
///
/// let options = parse_options("option1=0.8,option2=something");
/// assert_eq!(options.get("option1").unwrap(), "0.8");
/// assert_eq!(options.get("option2").unwrap(), "something");
/// assert_eq!(options.get("option3"), None);
/// ```
pub fn parse_options(options_str: &str) -> HashMap<String, String> {
    let mut options = HashMap::new();
    for option_str in options_str.split(',') {
        if let Some((name, value)) = option_str.split_once('=') {
            options.insert(name.to_string(), value.to_string());
        }
    }
    options
}

/// Reads a required option and parses it into the target type.
pub fn require_option<T: FromStr>(
    policy: &str,
    options: &HashMap<String, String>,
    name: &str,
) -> Result<T, ConfigurationError> {
    let value = options.get(name).ok_or_else(|| ConfigurationError::MissingOption {
        policy: policy.to_string(),
        option: name.to_string(),
    })?;
    value.parse::<T>().map_err(|_| ConfigurationError::InvalidOption {
        option: name.to_string(),
        value: value.to_string(),
    })
}

/// Reads an optional option and parses it into the target type.
pub fn optional_option<T: FromStr>(
    options: &HashMap<String, String>,
    name: &str,
) -> Result<Option<T>, ConfigurationError> {
    match options.get(name) {
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigurationError::InvalidOption {
                option: name.to_string(),
                value: value.to_string(),
            }),
        None => Ok(None),
    }
}
