//! Health evaluation orchestrator.
//!
//! Runs the machine, node, fleet size and operator checks over one input
//! snapshot and assembles a [`HealthReport`]. All checks always run.
//!
//! Operators are evaluated in dependency order. Once an operator is found
//! non-healthy, every operator that depends on it (directly or transitively)
//! is reported as [`OperatorHealthStatus::Blocked`] instead of being
//! inspected, so one root-cause fault is not repeated as a cascade of
//! independent-looking failures.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::GraphError;
use crate::fleet::FleetSizeCheck;
use crate::graph::{expand_dependencies, topological_sort, DependencyMap, OperatorId};
use crate::machines::{classify_machines, MachineRecord};
use crate::nodes::{classify_nodes, NodeRecord};
use crate::operators::{inspect_operator, OperatorConditionSet, OperatorHealthStatus};
use crate::report::{HealthReport, OperatorResult, OperatorSection};

/// One snapshot of the cluster to evaluate.
#[derive(Debug, Clone, Default)]
pub struct EvaluationInput {
    pub machines: Vec<MachineRecord>,
    pub nodes: Vec<NodeRecord>,
    pub operators: Vec<OperatorId>,
    pub conditions: HashMap<OperatorId, OperatorConditionSet>,
}

/// Evaluates cluster snapshots against a fixed dependency map.
///
/// Holds no mutable state; `run` may be called concurrently.
#[derive(Debug, Clone, Default)]
pub struct HealthEvaluator {
    dependencies: DependencyMap,
}

impl HealthEvaluator {
    pub fn new(dependencies: DependencyMap) -> Self {
        Self { dependencies }
    }

    /// Evaluate one snapshot. Never fails: a dependency cycle is reported
    /// inside the operator section.
    pub fn run(&self, input: &EvaluationInput) -> HealthReport {
        let non_running_machines = classify_machines(&input.machines);
        let unready_nodes = classify_nodes(&input.nodes);

        let ready_nodes = input.nodes.len() - unready_nodes.len();
        let running_machines = input.machines.len() - non_running_machines.len();
        let fleet_size = FleetSizeCheck::new(ready_nodes, running_machines);

        let operators = self.evaluate_operators(&input.operators, &input.conditions);

        let report = HealthReport {
            generated_at: Utc::now(),
            non_running_machines,
            unready_nodes,
            fleet_size,
            operators,
        };

        let unhealthy_operators = report
            .operator_results()
            .iter()
            .filter(|r| !r.status.is_healthy())
            .count();
        info!(
            machines = input.machines.len(),
            nodes = input.nodes.len(),
            operators = input.operators.len(),
            fleet_ok = report.fleet_size.passed,
            "Health evaluation complete: {} non-running machines, {} unready nodes, {} unhealthy",
            report.non_running_machines.len(),
            report.unready_nodes.len(),
            unhealthy_operators
        );

        report
    }

    fn evaluate_operators(
        &self,
        operators: &[OperatorId],
        conditions: &HashMap<OperatorId, OperatorConditionSet>,
    ) -> OperatorSection {
        // Ordering on the closure keeps transitive edges through operators
        // that are not part of this run.
        let expanded = expand_dependencies(&self.dependencies);
        let order = match topological_sort(operators, &expanded) {
            Ok(order) => order,
            Err(err) => {
                warn!("Skipping operator health checks: {err}");
                let message = err.to_string();
                let GraphError::CycleDetected { operators: cyclic } = err;
                return OperatorSection::DependencyCycle {
                    operators: cyclic,
                    message,
                };
            }
        };

        let members: HashSet<&str> = operators.iter().map(String::as_str).collect();
        let mut assigned: HashMap<&str, OperatorHealthStatus> =
            HashMap::with_capacity(order.len());
        let mut results = Vec::with_capacity(order.len());

        for id in &order {
            let blocked_by: Vec<OperatorId> = expanded
                .get(id)
                .map(|closure| {
                    closure
                        .iter()
                        .filter(|dep| members.contains(dep.as_str()))
                        .filter(|dep| {
                            assigned
                                .get(dep.as_str())
                                .is_some_and(|status| !status.is_healthy())
                        })
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();

            let (status, reason) = if blocked_by.is_empty() {
                match conditions.get(id) {
                    Some(set) => inspect_operator(set),
                    None => (
                        OperatorHealthStatus::Unknown,
                        "no conditions reported".to_string(),
                    ),
                }
            } else {
                let causes: Vec<String> = blocked_by
                    .iter()
                    .map(|dep| {
                        let status = assigned
                            .get(dep.as_str())
                            .copied()
                            .unwrap_or(OperatorHealthStatus::Unknown);
                        format!("{dep} ({status})")
                    })
                    .collect();
                debug!("Operator {} blocked by {}", id, causes.join(", "));
                (
                    OperatorHealthStatus::Blocked,
                    format!("blocked by unhealthy dependencies: {}", causes.join(", ")),
                )
            };

            assigned.insert(id.as_str(), status);
            results.push(OperatorResult {
                id: id.clone(),
                status,
                reason,
                blocked_by,
            });
        }

        OperatorSection::Evaluated { results }
    }
}
