//! Machine lifecycle phase classification.
//!
//! A machine can sit in a provisioning, deleting or failed state without ever
//! producing a ready node. Flagging those separately from node readiness lets
//! a report tell infrastructure problems apart from control-plane problems.

use serde::{Deserialize, Serialize};

/// Machine API lifecycle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MachinePhase {
    /// Instance is being created by the cloud provider.
    Provisioning,
    /// Instance exists but has not joined as a node.
    Provisioned,
    /// Instance is up and backing a node.
    Running,
    /// Machine is being removed.
    Deleting,
    /// Provisioning or operation failed permanently.
    Failed,
    /// Phase missing or not recognised.
    #[default]
    Unknown,
}

impl MachinePhase {
    /// Parse a phase from the Machine API `status.phase` string.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "provisioning" => Self::Provisioning,
            "provisioned" => Self::Provisioned,
            "running" => Self::Running,
            "deleting" => Self::Deleting,
            "failed" => Self::Failed,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Provisioning => "Provisioning",
            Self::Provisioned => "Provisioned",
            Self::Running => "Running",
            Self::Deleting => "Deleting",
            Self::Failed => "Failed",
            Self::Unknown => "Unknown",
        }
    }

    pub fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

impl std::fmt::Display for MachinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Simplified Machine representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineRecord {
    pub name: String,
    pub phase: MachinePhase,
}

impl MachineRecord {
    pub fn new(name: impl Into<String>, phase: MachinePhase) -> Self {
        Self {
            name: name.into(),
            phase,
        }
    }
}

/// Names of machines in any phase other than `Running`.
pub fn classify_machines(machines: &[MachineRecord]) -> Vec<String> {
    machines
        .iter()
        .filter(|machine| !machine.phase.is_running())
        .map(|machine| machine.name.clone())
        .collect()
}
