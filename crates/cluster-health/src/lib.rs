//! Cluster health evaluation for the CTO Platform.
//!
//! Decides, for one snapshot of a running cluster:
//!
//! - whether the machine fleet is healthy (every machine `Running`),
//! - whether nodes are ready and schedulable,
//! - whether there are at least as many ready nodes as running machines,
//! - whether each control-plane operator is healthy, evaluated in dependency
//!   order so a root-cause failure marks its dependents `Blocked` instead of
//!   surfacing as a cascade of separate failures.
//!
//! The engine is read-only and synchronous. Retrieving the machine, node and
//! operator objects is left to the caller; [`snapshot`] reads their list-call
//! output from a file.
//!
//! # Example
//!
//! ```no_run
//! use cluster_health::{ClusterSnapshot, HealthConfig, HealthEvaluator};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = HealthConfig::load(None)?;
//! let snapshot = ClusterSnapshot::from_path("snapshot.yaml".as_ref())?;
//!
//! let evaluator = HealthEvaluator::new(config.dependencies.clone());
//! let report = evaluator.run(&snapshot.into_input(&config));
//!
//! for check in report.checks() {
//!     println!("{}: {}", check.name, check.passed);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod evaluator;
pub mod fleet;
pub mod graph;
pub mod machines;
pub mod nodes;
pub mod operators;
pub mod report;
pub mod snapshot;

pub use config::HealthConfig;
pub use error::{GraphError, LoadError};
pub use evaluator::{EvaluationInput, HealthEvaluator};
pub use fleet::{compare_fleet_sizes, FleetSizeCheck};
pub use graph::{
    expand_dependencies, topological_sort, DependencyMap, ExpandedDependencyMap, OperatorId,
};
pub use machines::{classify_machines, MachinePhase, MachineRecord};
pub use nodes::{classify_nodes, NodeRecord};
pub use operators::{
    classify_operator, inspect_operator, ConditionStatus, OperatorCondition,
    OperatorConditionSet, OperatorHealthStatus,
};
pub use report::{CheckOutcome, HealthReport, OperatorResult, OperatorSection};
pub use snapshot::ClusterSnapshot;
