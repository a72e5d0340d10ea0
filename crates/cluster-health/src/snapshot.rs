//! Cluster snapshots: the list-call output the evaluator runs against.
//!
//! A snapshot is a YAML or JSON document holding the `items` of
//! `oc get machines`, `oc get nodes` and `oc get clusteroperators`:
//!
//! ```yaml
//! machines:
//!   - metadata: { name: worker-0 }
//!     status: { phase: Running }
//! nodes:
//!   - metadata: { name: worker-0 }
//!     status:
//!       conditions:
//!         - { type: Ready, status: "True" }
//! cluster_operators:
//!   - metadata: { name: etcd }
//!     status:
//!       conditions:
//!         - { type: Available, status: "True" }
//! ```
//!
//! Nodes use the upstream `k8s-openapi` type. Machine and ClusterOperator are
//! OpenShift API objects, so only the fields the evaluator reads are modelled.

use std::collections::HashMap;
use std::path::Path;

use k8s_openapi::api::core::v1::Node;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::HealthConfig;
use crate::error::LoadError;
use crate::evaluator::EvaluationInput;
use crate::machines::{MachinePhase, MachineRecord};
use crate::nodes::NodeRecord;
use crate::operators::{ConditionStatus, OperatorCondition, OperatorConditionSet};

/// machine.openshift.io/v1beta1 Machine (status subset)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Machine {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MachineStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MachineStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
}

/// config.openshift.io/v1 ClusterOperator (status subset)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterOperator {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ClusterOperatorStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterOperatorStatus {
    #[serde(default)]
    pub conditions: Vec<ClusterOperatorCondition>,
}

/// Condition from ClusterOperator status.conditions[]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterOperatorCondition {
    /// Condition type: "Available", "Degraded", "Progressing", etc.
    #[serde(rename = "type")]
    pub condition_type: String,
    /// Status: "True", "False", "Unknown"
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<&ClusterOperatorCondition> for OperatorCondition {
    fn from(condition: &ClusterOperatorCondition) -> Self {
        Self {
            status: ConditionStatus::parse(&condition.status),
            reason: condition.reason.clone(),
            message: condition.message.clone(),
        }
    }
}

impl From<&ClusterOperator> for OperatorConditionSet {
    fn from(operator: &ClusterOperator) -> Self {
        let mut set = OperatorConditionSet::new();
        if let Some(status) = &operator.status {
            for condition in &status.conditions {
                set.insert(condition.condition_type.clone(), condition.into());
            }
        }
        set
    }
}

/// Snapshot of the list calls for one evaluation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    #[serde(default)]
    pub machines: Vec<Machine>,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub cluster_operators: Vec<ClusterOperator>,
}

impl ClusterSnapshot {
    pub fn from_yaml_str(contents: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(contents)
    }

    /// Read a snapshot file (YAML or JSON).
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let contents = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        let snapshot = Self::from_yaml_str(&contents).map_err(|e| LoadError::parse(path, e))?;
        info!(
            "Loaded snapshot from {}: {} machines, {} nodes, {} cluster operators",
            path.display(),
            snapshot.machines.len(),
            snapshot.nodes.len(),
            snapshot.cluster_operators.len()
        );
        Ok(snapshot)
    }

    /// Convert to evaluator input, dropping unnamed objects and operators
    /// excluded by `config`.
    pub fn into_input(self, config: &HealthConfig) -> EvaluationInput {
        let machines = self
            .machines
            .iter()
            .filter_map(|machine| {
                let name = object_name(&machine.metadata, "Machine")?;
                let phase = machine
                    .status
                    .as_ref()
                    .and_then(|status| status.phase.as_deref())
                    .map_or(MachinePhase::Unknown, MachinePhase::parse);
                Some(MachineRecord::new(name, phase))
            })
            .collect();

        let nodes = self
            .nodes
            .iter()
            .filter(|node| object_name(&node.metadata, "Node").is_some())
            .map(NodeRecord::from)
            .collect();

        let mut operators = Vec::with_capacity(self.cluster_operators.len());
        let mut conditions = HashMap::with_capacity(self.cluster_operators.len());
        for operator in &self.cluster_operators {
            let Some(name) = object_name(&operator.metadata, "ClusterOperator") else {
                continue;
            };
            if config.is_excluded(&name) {
                continue;
            }
            conditions.insert(name.clone(), OperatorConditionSet::from(operator));
            operators.push(name);
        }

        EvaluationInput {
            machines,
            nodes,
            operators,
            conditions,
        }
    }
}

fn object_name(metadata: &ObjectMeta, kind: &str) -> Option<String> {
    match metadata.name.as_deref() {
        Some(name) if !name.is_empty() => Some(name.to_string()),
        _ => {
            warn!("Skipping {kind} without metadata.name");
            None
        }
    }
}
