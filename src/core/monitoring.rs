//! Host state tracking with rolling utilization history.

use std::collections::btree_map::Keys;
use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::rc::Rc;

use log::trace;

use crate::core::host::{HostInfo, VmLoad};

/// Default length of the utilization history window.
pub const DEFAULT_HISTORY_WINDOW: usize = 30;

/// Bounded buffer of per-interval utilization samples, oldest first.
/// When the window is full the oldest sample is evicted.
#[derive(Clone)]
pub struct UtilizationHistory {
    window: usize,
    samples: VecDeque<f64>,
}

impl UtilizationHistory {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            samples: VecDeque::new(),
        }
    }

    /// Appends a sample observed during the elapsed monitoring interval.
    pub fn record(&mut self, sample: f64) {
        if self.samples.len() >= self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Returns the stored samples ordered from oldest to newest.
    pub fn samples(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }
}

/// Constant VM resource demand.
#[derive(Clone)]
pub struct VmDemand {
    requested_capacity: f64,
}

impl VmDemand {
    pub fn new(requested_capacity: f64) -> Self {
        Self { requested_capacity }
    }
}

impl VmLoad for VmDemand {
    fn current_requested_capacity(&self) -> f64 {
        self.requested_capacity
    }
}

/// Host state tracked by monitoring: total capacity, placed VMs and the
/// utilization history window.
#[derive(Clone)]
pub struct MonitoredHost {
    id: u32,
    total_capacity: f64,
    vms: Vec<Rc<dyn VmLoad>>,
    history: UtilizationHistory,
}

impl MonitoredHost {
    pub fn new(id: u32, total_capacity: f64, history_window: usize) -> Self {
        Self {
            id,
            total_capacity,
            vms: Vec::new(),
            history: UtilizationHistory::new(history_window),
        }
    }

    pub fn add_vm(&mut self, vm: Rc<dyn VmLoad>) {
        self.vms.push(vm);
    }

    /// Records the utilization observed during the elapsed interval.
    pub fn record_utilization(&mut self, sample: f64) {
        self.history.record(sample);
    }
}

impl HostInfo for MonitoredHost {
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
        Some(self.history.samples())
    }
}

/// This component stores the current states of all hosts and updates them
/// with utilization samples arriving once per monitoring interval.
pub struct Monitoring {
    host_states: BTreeMap<u32, MonitoredHost>,
    history_window: usize,
}

impl Monitoring {
    pub fn new(history_window: usize) -> Self {
        Self {
            host_states: BTreeMap::new(),
            history_window,
        }
    }

    /// Adds new host to internal storage.
    pub fn add_host(&mut self, host_id: u32, total_capacity: f64) {
        self.host_states
            .insert(host_id, MonitoredHost::new(host_id, total_capacity, self.history_window));
    }

    /// Attaches a VM to the specified host.
    pub fn add_vm(&mut self, host_id: u32, vm: Rc<dyn VmLoad>) {
        if let Some(host) = self.host_states.get_mut(&host_id) {
            host.add_vm(vm);
        }
    }

    /// Returns the state of specified host.
    pub fn host_state(&self, host_id: u32) -> &MonitoredHost {
        &self.host_states[&host_id]
    }

    /// Returns an iterator of IDs of all hosts.
    pub fn hosts_list(&self) -> Keys<u32, MonitoredHost> {
        self.host_states.keys()
    }

    /// Processes a host utilization sample for the elapsed interval.
    pub fn update_host_state(&mut self, host_id: u32, sample: f64) {
        trace!("monitoring received sample {} from host #{}", sample, host_id);
        if let Some(host) = self.host_states.get_mut(&host_id) {
            host.record_utilization(sample);
        }
    }
}
