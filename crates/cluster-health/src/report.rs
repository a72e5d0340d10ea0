//! Aggregate health report produced by a single evaluation run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fleet::FleetSizeCheck;
use crate::graph::OperatorId;
use crate::operators::OperatorHealthStatus;

/// Check names used for report test cases.
pub const CHECK_MACHINE_PHASE: &str = "machine-phase";
pub const CHECK_NODE_READINESS: &str = "node-readiness";
pub const CHECK_FLEET_SIZE: &str = "fleet-size";
pub const CHECK_OPERATOR_DEPENDENCIES: &str = "operator-dependencies";
pub const CHECK_OPERATOR_PREFIX: &str = "operator/";

/// Health of one operator, in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorResult {
    pub id: OperatorId,
    pub status: OperatorHealthStatus,
    pub reason: String,
    /// Non-healthy dependencies that caused a `Blocked` status
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocked_by: Vec<OperatorId>,
}

/// Operator health section of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OperatorSection {
    /// Operators were ordered and inspected.
    Evaluated { results: Vec<OperatorResult> },
    /// The declared dependencies contain a cycle; nothing was inspected.
    DependencyCycle {
        operators: Vec<OperatorId>,
        message: String,
    },
}

/// Outcome of one report check, the unit a test-suite writer renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub name: String,
    pub passed: bool,
    pub message: String,
}

impl CheckOutcome {
    fn new(name: impl Into<String>, passed: bool, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            message: message.into(),
        }
    }
}

/// Complete result of one evaluation run. Every section is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub generated_at: DateTime<Utc>,
    pub non_running_machines: Vec<String>,
    /// Nodes that are not Ready or are cordoned
    pub unready_nodes: Vec<String>,
    pub fleet_size: FleetSizeCheck,
    pub operators: OperatorSection,
}

impl HealthReport {
    /// Whether every check passed.
    pub fn passed(&self) -> bool {
        self.checks().iter().all(|check| check.passed)
    }

    /// Per-operator results; empty when the section is a dependency cycle.
    pub fn operator_results(&self) -> &[OperatorResult] {
        match &self.operators {
            OperatorSection::Evaluated { results } => results,
            OperatorSection::DependencyCycle { .. } => &[],
        }
    }

    pub fn operator_status(&self, id: &str) -> Option<OperatorHealthStatus> {
        self.operator_results()
            .iter()
            .find(|result| result.id == id)
            .map(|result| result.status)
    }

    /// One outcome per check: machines, nodes, fleet size, then operators.
    pub fn checks(&self) -> Vec<CheckOutcome> {
        let mut checks = Vec::with_capacity(3 + self.operator_results().len());

        checks.push(if self.non_running_machines.is_empty() {
            CheckOutcome::new(CHECK_MACHINE_PHASE, true, "all machines are Running")
        } else {
            CheckOutcome::new(
                CHECK_MACHINE_PHASE,
                false,
                format!(
                    "machines not in Running phase: {}",
                    self.non_running_machines.join(", ")
                ),
            )
        });

        checks.push(if self.unready_nodes.is_empty() {
            CheckOutcome::new(CHECK_NODE_READINESS, true, "all nodes are ready and schedulable")
        } else {
            CheckOutcome::new(
                CHECK_NODE_READINESS,
                false,
                format!(
                    "nodes unready or unschedulable: {}",
                    self.unready_nodes.join(", ")
                ),
            )
        });

        let fleet = &self.fleet_size;
        let mut fleet_message = format!(
            "{} ready nodes for {} running machines",
            fleet.ready_nodes, fleet.running_machines
        );
        if !fleet.passed {
            fleet_message.push_str(&format!(" ({} nodes missing)", fleet.missing_nodes()));
        }
        checks.push(CheckOutcome::new(CHECK_FLEET_SIZE, fleet.passed, fleet_message));

        match &self.operators {
            OperatorSection::Evaluated { results } => {
                checks.extend(results.iter().map(|result| {
                    CheckOutcome::new(
                        format!("{CHECK_OPERATOR_PREFIX}{}", result.id),
                        result.status.is_healthy(),
                        format!("{}: {}", result.status, result.reason),
                    )
                }));
            }
            OperatorSection::DependencyCycle { message, .. } => {
                checks.push(CheckOutcome::new(
                    CHECK_OPERATOR_DEPENDENCIES,
                    false,
                    message.clone(),
                ));
            }
        }

        checks
    }
}
