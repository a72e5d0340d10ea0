//! Node fleet vs machine fleet size comparison.

use serde::{Deserialize, Serialize};

/// Every running machine is expected to register as a ready node.
///
/// A node surplus is tolerated (e.g. bare-metal nodes without a machine
/// object); a deficit means nodes failed to join.
pub fn compare_fleet_sizes(ready_node_count: usize, running_machine_count: usize) -> bool {
    ready_node_count >= running_machine_count
}

/// Result of the fleet size check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetSizeCheck {
    pub ready_nodes: usize,
    pub running_machines: usize,
    pub passed: bool,
}

impl FleetSizeCheck {
    pub fn new(ready_nodes: usize, running_machines: usize) -> Self {
        Self {
            ready_nodes,
            running_machines,
            passed: compare_fleet_sizes(ready_nodes, running_machines),
        }
    }

    /// Number of running machines with no matching ready node.
    pub fn missing_nodes(&self) -> usize {
        self.running_machines.saturating_sub(self.ready_nodes)
    }
}
