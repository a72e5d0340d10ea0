//! Node readiness and schedulability classification.

use k8s_openapi::api::core::v1::Node;
use serde::{Deserialize, Serialize};

/// Node condition type that carries readiness.
pub const NODE_READY_CONDITION: &str = "Ready";

/// Simplified Node representation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub name: String,
    /// `Ready` condition is exactly "True"
    pub ready: bool,
    /// Node is not cordoned (`spec.unschedulable` unset or false)
    pub schedulable: bool,
}

impl NodeRecord {
    pub fn new(name: impl Into<String>, ready: bool, schedulable: bool) -> Self {
        Self {
            name: name.into(),
            ready,
            schedulable,
        }
    }

    /// Ready and accepting new workloads.
    pub fn is_healthy(&self) -> bool {
        self.ready && self.schedulable
    }
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        let ready = node
            .status
            .as_ref()
            .and_then(|status| status.conditions.as_ref())
            .and_then(|conditions| {
                conditions
                    .iter()
                    .find(|c| c.type_ == NODE_READY_CONDITION)
            })
            .is_some_and(|condition| condition.status == "True");

        let unschedulable = node
            .spec
            .as_ref()
            .and_then(|spec| spec.unschedulable)
            .unwrap_or(false);

        Self {
            name: node.metadata.name.clone().unwrap_or_default(),
            ready,
            schedulable: !unschedulable,
        }
    }
}

/// Names of nodes that are not Ready or are cordoned.
pub fn classify_nodes(nodes: &[NodeRecord]) -> Vec<String> {
    nodes
        .iter()
        .filter(|node| !node.is_healthy())
        .map(|node| node.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::{NodeCondition, NodeSpec, NodeStatus};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::collections::HashSet;

    fn k8s_node(name: &str, ready: Option<&str>, unschedulable: Option<bool>) -> Node {
        Node {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            spec: Some(NodeSpec {
                unschedulable,
                ..Default::default()
            }),
            status: Some(NodeStatus {
                conditions: ready.map(|status| {
                    vec![
                        NodeCondition {
                            type_: "MemoryPressure".into(),
                            status: "False".into(),
                            ..Default::default()
                        },
                        NodeCondition {
                            type_: "Ready".into(),
                            status: status.into(),
                            ..Default::default()
                        },
                    ]
                }),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_classify_mixed_fleet() {
        let nodes = vec![
            NodeRecord::new("n1", true, true),
            NodeRecord::new("n2", false, true),
            NodeRecord::new("n3", true, false),
        ];
        let flagged: HashSet<String> = classify_nodes(&nodes).into_iter().collect();
        assert_eq!(flagged, HashSet::from(["n2".to_string(), "n3".to_string()]));
    }

    #[test]
    fn test_classify_is_idempotent() {
        let nodes = vec![
            NodeRecord::new("a", false, false),
            NodeRecord::new("b", true, true),
        ];
        assert_eq!(classify_nodes(&nodes), classify_nodes(&nodes));
        assert_eq!(classify_nodes(&nodes), vec!["a".to_string()]);
    }

    #[test]
    fn test_from_k8s_node_ready() {
        let record = NodeRecord::from(&k8s_node("worker-0", Some("True"), None));
        assert_eq!(record, NodeRecord::new("worker-0", true, true));
    }

    #[test]
    fn test_from_k8s_node_not_ready_states() {
        for status in [Some("False"), Some("Unknown"), None] {
            let record = NodeRecord::from(&k8s_node("worker-1", status, Some(false)));
            assert!(!record.ready, "status {status:?} must not be ready");
            assert!(record.schedulable);
        }
    }

    #[test]
    fn test_from_k8s_node_cordoned() {
        let record = NodeRecord::from(&k8s_node("worker-2", Some("True"), Some(true)));
        assert!(record.ready);
        assert!(!record.schedulable);
    }
}
