//! Operator dependency graph algorithms.
//!
//! Two pure functions over a [`DependencyMap`]:
//!
//! - [`expand_dependencies`] computes the transitive closure of every key.
//! - [`topological_sort`] produces an evaluation order in which every
//!   operator comes after all of its dependencies (Kahn's algorithm).

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use tracing::{debug, warn};

use crate::error::GraphError;

/// Identifier of a control-plane operator (e.g. "etcd", "kube-apiserver").
pub type OperatorId = String;

/// Operator -> direct dependencies.
///
/// Operators without dependencies need not appear as keys. Dependencies that
/// are never declared as keys are treated as leaves.
pub type DependencyMap = BTreeMap<OperatorId, Vec<OperatorId>>;

/// Operator -> full transitive closure, each list sorted lexicographically.
pub type ExpandedDependencyMap = BTreeMap<OperatorId, Vec<OperatorId>>;

/// Compute the transitive closure of every key in `direct`.
///
/// The key itself is only part of its own closure when a cycle leads back to
/// it. Each node is visited at most once per root, so cyclic input terminates.
pub fn expand_dependencies(direct: &DependencyMap) -> ExpandedDependencyMap {
    let expanded: ExpandedDependencyMap = direct
        .keys()
        .map(|root| (root.clone(), reachable_from(root, direct)))
        .collect();

    debug!(
        "Expanded dependencies for {} operators ({} total edges)",
        expanded.len(),
        expanded.values().map(Vec::len).sum::<usize>()
    );
    expanded
}

/// Walk `direct` from `root` and return every reachable id, sorted.
fn reachable_from(root: &str, direct: &DependencyMap) -> Vec<OperatorId> {
    let mut visited: BTreeSet<&str> = BTreeSet::new();
    let mut stack: Vec<&str> = direct
        .get(root)
        .map(|deps| deps.iter().map(String::as_str).collect())
        .unwrap_or_default();

    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        if let Some(deps) = direct.get(current) {
            stack.extend(
                deps.iter()
                    .map(String::as_str)
                    .filter(|dep| !visited.contains(dep)),
            );
        }
    }

    visited.into_iter().map(str::to_string).collect()
}

/// Order `operators` so that each one appears after all of its dependencies.
///
/// Only members of `operators` are emitted; edges to anything else are
/// ignored. Duplicate entries in `operators` are collapsed. When several
/// operators are ready at once any of them may come first.
///
/// # Errors
///
/// Returns [`GraphError::CycleDetected`] if the dependencies among
/// `operators` contain a cycle. No partial order is returned.
pub fn topological_sort(
    operators: &[OperatorId],
    dependencies: &DependencyMap,
) -> Result<Vec<OperatorId>, GraphError> {
    let mut members: Vec<&str> = Vec::with_capacity(operators.len());
    let mut seen: HashSet<&str> = HashSet::with_capacity(operators.len());
    for op in operators {
        if seen.insert(op.as_str()) {
            members.push(op.as_str());
        }
    }

    let mut in_degree: HashMap<&str, usize> = members.iter().map(|&op| (op, 0)).collect();
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();

    for &op in &members {
        let Some(deps) = dependencies.get(op) else {
            continue;
        };
        let unique: HashSet<&str> = deps
            .iter()
            .map(String::as_str)
            .filter(|dep| seen.contains(dep))
            .collect();
        for dep in unique {
            dependents.entry(dep).or_default().push(op);
            if let Some(degree) = in_degree.get_mut(op) {
                *degree += 1;
            }
        }
    }

    // Kahn's algorithm
    let mut queue: VecDeque<&str> = members
        .iter()
        .copied()
        .filter(|op| in_degree.get(op) == Some(&0))
        .collect();

    let mut order: Vec<OperatorId> = Vec::with_capacity(members.len());
    while let Some(op) = queue.pop_front() {
        order.push(op.to_string());
        if let Some(children) = dependents.get(op) {
            for &child in children {
                if let Some(degree) = in_degree.get_mut(child) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(child);
                    }
                }
            }
        }
    }

    if order.len() != members.len() {
        let mut residual: Vec<String> = in_degree
            .into_iter()
            .filter(|(_, degree)| *degree > 0)
            .map(|(op, _)| op.to_string())
            .collect();
        residual.sort();
        warn!(
            "Dependency cycle detected: {} of {} operators could not be ordered",
            residual.len(),
            members.len()
        );
        return Err(GraphError::CycleDetected {
            operators: residual,
        });
    }

    debug!("Computed evaluation order for {} operators", order.len());
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deps(entries: &[(&str, &[&str])]) -> DependencyMap {
        entries
            .iter()
            .map(|(k, v)| {
                (
                    (*k).to_string(),
                    v.iter().map(|d| (*d).to_string()).collect(),
                )
            })
            .collect()
    }

    fn ids(names: &[&str]) -> Vec<OperatorId> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    fn control_plane() -> DependencyMap {
        deps(&[
            ("kube-apiserver", &["etcd", "network"]),
            ("kube-controller-manager", &["kube-apiserver"]),
        ])
    }

    fn position(order: &[OperatorId], id: &str) -> usize {
        order.iter().position(|o| o == id).unwrap()
    }

    #[test]
    fn test_expand_control_plane() {
        let expanded = expand_dependencies(&control_plane());
        assert_eq!(
            expanded["kube-controller-manager"],
            ids(&["etcd", "kube-apiserver", "network"])
        );
        assert_eq!(expanded["kube-apiserver"], ids(&["etcd", "network"]));
        // Dangling values are leaves, not keys
        assert!(!expanded.contains_key("etcd"));
    }

    #[test]
    fn test_expand_empty_list() {
        let expanded = expand_dependencies(&deps(&[("etcd", &[])]));
        assert_eq!(expanded["etcd"], Vec::<String>::new());
    }

    #[test]
    fn test_expand_deduplicates_diamond() {
        let expanded = expand_dependencies(&deps(&[
            ("a", &["b", "c"]),
            ("b", &["d"]),
            ("c", &["d", "d"]),
        ]));
        assert_eq!(expanded["a"], ids(&["b", "c", "d"]));
    }

    #[test]
    fn test_expand_cycle_includes_self() {
        let expanded = expand_dependencies(&deps(&[("a", &["b"]), ("b", &["a"]), ("c", &["a"])]));
        assert_eq!(expanded["a"], ids(&["a", "b"]));
        assert_eq!(expanded["b"], ids(&["a", "b"]));
        assert_eq!(expanded["c"], ids(&["a", "b"]));
    }

    #[test]
    fn test_sort_control_plane() {
        let operators = ids(&[
            "kube-controller-manager",
            "kube-apiserver",
            "network",
            "etcd",
        ]);
        let order = topological_sort(&operators, &control_plane()).unwrap();

        assert_eq!(order.len(), 4);
        assert!(position(&order, "etcd") < position(&order, "kube-apiserver"));
        assert!(position(&order, "network") < position(&order, "kube-apiserver"));
        assert!(
            position(&order, "kube-apiserver") < position(&order, "kube-controller-manager")
        );
    }

    #[test]
    fn test_sort_only_emits_requested_operators() {
        // etcd and network are dependencies but not part of the input
        let operators = ids(&["kube-controller-manager", "kube-apiserver"]);
        let order = topological_sort(&operators, &control_plane()).unwrap();
        assert_eq!(order, ids(&["kube-apiserver", "kube-controller-manager"]));
    }

    #[test]
    fn test_sort_collapses_duplicate_input() {
        let operators = ids(&["etcd", "etcd", "kube-apiserver"]);
        let order = topological_sort(&operators, &control_plane()).unwrap();
        assert_eq!(order, ids(&["etcd", "kube-apiserver"]));
    }

    #[test]
    fn test_sort_duplicate_dependency_edges() {
        let operators = ids(&["a", "b"]);
        let order = topological_sort(&operators, &deps(&[("a", &["b", "b"])])).unwrap();
        assert_eq!(order, ids(&["b", "a"]));
    }

    #[test]
    fn test_sort_detects_cycle() {
        let operators = ids(&["a", "b", "c", "d"]);
        let result = topological_sort(
            &operators,
            &deps(&[("a", &["b"]), ("b", &["c"]), ("c", &["a"])]),
        );
        assert_eq!(
            result,
            Err(GraphError::CycleDetected {
                operators: ids(&["a", "b", "c"]),
            })
        );
    }

    #[test]
    fn test_sort_detects_self_dependency() {
        let operators = ids(&["a"]);
        let result = topological_sort(&operators, &deps(&[("a", &["a"])]));
        assert!(matches!(result, Err(GraphError::CycleDetected { .. })));
    }

    #[test]
    fn test_sort_ignores_cycle_outside_operators() {
        let operators = ids(&["c"]);
        let order =
            topological_sort(&operators, &deps(&[("a", &["b"]), ("b", &["a"]), ("c", &["a"])]))
                .unwrap();
        assert_eq!(order, ids(&["c"]));
    }

    #[test]
    fn test_sort_respects_every_edge() {
        let dependencies = deps(&[
            ("console", &["authentication", "ingress"]),
            ("authentication", &["openshift-apiserver", "ingress"]),
            ("openshift-apiserver", &["kube-apiserver"]),
            ("ingress", &["network"]),
            ("kube-apiserver", &["etcd", "network"]),
        ]);
        let operators = ids(&[
            "console",
            "ingress",
            "authentication",
            "etcd",
            "openshift-apiserver",
            "network",
            "kube-apiserver",
        ]);
        let order = topological_sort(&operators, &dependencies).unwrap();

        let mut sorted_order = order.clone();
        sorted_order.sort();
        let mut sorted_input = operators.clone();
        sorted_input.sort();
        assert_eq!(sorted_order, sorted_input);

        for (op, op_deps) in &dependencies {
            for dep in op_deps {
                assert!(
                    position(&order, dep) < position(&order, op),
                    "{dep} must precede {op} in {order:?}"
                );
            }
        }
    }
}
