use serde::Serialize;

/// Outcome of a single overload evaluation.
///
/// Produced per decision and handed to the caller, the policy itself does not
/// retain it.
#[derive(Serialize, Clone, Debug)]
pub struct DecisionRecord {
    pub host_id: u32,
    pub threshold: f64,
    pub utilization: f64,
    pub is_over_utilized: bool,
}
