//! Per-host log of computed overload thresholds.

use std::collections::BTreeMap;
use std::fs::File;

use serde::Serialize;

#[derive(Serialize)]
struct ThresholdEntry {
    host_id: u32,
    step: usize,
    threshold: f64,
}

/// Append-only sink that stores the threshold computed for each host at each
/// monitoring tick, for later inspection.
#[derive(Clone, Default)]
pub struct ThresholdHistory {
    entries: BTreeMap<u32, Vec<f64>>,
}

impl ThresholdHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the threshold computed for the specified host.
    pub fn record(&mut self, host_id: u32, threshold: f64) {
        self.entries.entry(host_id).or_default().push(threshold);
    }

    /// Returns thresholds recorded for the specified host in recording order.
    pub fn host_thresholds(&self, host_id: u32) -> &[f64] {
        self.entries.get(&host_id).map(|t| t.as_slice()).unwrap_or(&[])
    }

    /// Returns the total number of recorded thresholds across all hosts.
    pub fn len(&self) -> usize {
        self.entries.values().map(|t| t.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(|t| t.is_empty())
    }

    /// Saves the recorded thresholds to a CSV file.
    pub fn save(&self, path: &str) -> Result<(), std::io::Error> {
        let file = File::create(path)?;
        let mut wtr = csv::Writer::from_writer(file);
        for (host_id, thresholds) in &self.entries {
            for (step, threshold) in thresholds.iter().enumerate() {
                wtr.serialize(ThresholdEntry {
                    host_id: *host_id,
                    step,
                    threshold: *threshold,
                })?;
            }
        }
        wtr.flush()?;
        Ok(())
    }
}
