//! Capability contracts for hosts and virtual machines.

use std::rc::Rc;

/// Workload view of a virtual machine. Overload detection only needs the
/// capacity the VM currently requests from its host.
pub trait VmLoad {
    /// Returns the capacity (in MIPS) currently requested by this VM.
    fn current_requested_capacity(&self) -> f64;
}

/// Read-only host view consumed by overload detection policies.
pub trait HostInfo {
    /// Returns host ID.
    fn id(&self) -> u32;

    /// Returns total host capacity in MIPS.
    fn total_capacity(&self) -> f64;

    /// Returns VMs currently placed on this host.
    fn vms(&self) -> Vec<Rc<dyn VmLoad>>;

    /// Returns per-interval utilization samples ordered from oldest to newest,
    /// or `None` if this host does not track utilization history.
    ///
    /// Hosts that return `None` are routed to the fallback policy instead of
    /// the history-based threshold computation.
    fn utilization_history(&self) -> Option<Vec<f64>>;
}
