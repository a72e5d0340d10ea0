//! Health evaluation configuration.
//!
//! The configuration is a YAML (or JSON) document:
//!
//! ```yaml
//! dependencies:
//!   kube-apiserver: [etcd, network]
//!   kube-controller-manager: [kube-apiserver]
//! excluded_operators:
//!   - insights
//! ```
//!
//! Resolution order for [`HealthConfig::load`]: explicit path, then the
//! `CLUSTER_HEALTH_CONFIG` environment variable, then the built-in defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::LoadError;
use crate::graph::DependencyMap;

/// Environment variable naming the configuration file.
pub const ENV_CONFIG_PATH: &str = "CLUSTER_HEALTH_CONFIG";

/// Built-in control-plane operator dependencies.
const DEFAULT_DEPENDENCIES: &[(&str, &[&str])] = &[
    ("kube-apiserver", &["etcd", "network"]),
    ("kube-controller-manager", &["kube-apiserver"]),
    ("kube-scheduler", &["kube-apiserver"]),
    ("openshift-apiserver", &["kube-apiserver"]),
    ("openshift-controller-manager", &["openshift-apiserver"]),
    ("authentication", &["openshift-apiserver", "ingress"]),
    ("ingress", &["network", "dns"]),
    ("dns", &["network"]),
    ("console", &["authentication", "ingress"]),
    ("image-registry", &["openshift-apiserver", "storage"]),
    ("monitoring", &["kube-apiserver", "storage"]),
    ("machine-api", &["kube-apiserver"]),
    ("machine-config", &["kube-apiserver"]),
    ("operator-lifecycle-manager", &["openshift-apiserver"]),
];

/// Configuration for a health evaluation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Operator -> direct dependencies
    #[serde(default)]
    pub dependencies: DependencyMap,
    /// Operators left out of the evaluation entirely
    #[serde(default)]
    pub excluded_operators: Vec<String>,
}

impl Default for HealthConfig {
    fn default() -> Self {
        let dependencies = DEFAULT_DEPENDENCIES
            .iter()
            .map(|(op, deps)| {
                (
                    (*op).to_string(),
                    deps.iter().map(|d| (*d).to_string()).collect(),
                )
            })
            .collect();

        Self {
            dependencies,
            excluded_operators: Vec::new(),
        }
    }
}

impl HealthConfig {
    /// Parse a configuration document.
    pub fn from_yaml_str(contents: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(contents)
    }

    /// Read and parse a configuration file.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let contents = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        let config = Self::from_yaml_str(&contents).map_err(|e| LoadError::parse(path, e))?;
        info!(
            "Loaded health config from {} ({} operators with dependencies, {} excluded)",
            path.display(),
            config.dependencies.len(),
            config.excluded_operators.len()
        );
        Ok(config)
    }

    /// Load from `path`, falling back to `CLUSTER_HEALTH_CONFIG`, then defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, LoadError> {
        if let Some(path) = path {
            return Self::from_path(path);
        }

        match std::env::var_os(ENV_CONFIG_PATH) {
            Some(value) if !value.is_empty() => Self::from_path(&PathBuf::from(value)),
            _ => {
                debug!("No health config supplied, using built-in dependencies");
                Ok(Self::default())
            }
        }
    }

    pub fn is_excluded(&self, operator: &str) -> bool {
        self.excluded_operators.iter().any(|op| op == operator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::topological_sort;
    use std::io::Write;

    #[test]
    fn test_default_dependencies_are_acyclic() {
        let config = HealthConfig::default();
        let mut operators: Vec<String> = config.dependencies.keys().cloned().collect();
        for deps in config.dependencies.values() {
            operators.extend(deps.iter().cloned());
        }
        let order = topological_sort(&operators, &config.dependencies).unwrap();
        let position = |id: &str| order.iter().position(|o| o == id).unwrap();
        assert!(position("etcd") < position("kube-apiserver"));
        assert!(position("ingress") < position("console"));
    }

    #[test]
    fn test_parse_yaml() {
        let config = HealthConfig::from_yaml_str(
            r"
dependencies:
  kube-apiserver: [etcd, network]
  kube-controller-manager:
    - kube-apiserver
excluded_operators:
  - insights
",
        )
        .unwrap();

        assert_eq!(config.dependencies["kube-apiserver"], vec!["etcd", "network"]);
        assert!(config.is_excluded("insights"));
        assert!(!config.is_excluded("etcd"));
    }

    #[test]
    fn test_parse_json_and_missing_fields() {
        let config = HealthConfig::from_yaml_str(r#"{"dependencies": {"a": ["b"]}}"#).unwrap();
        assert_eq!(config.dependencies.len(), 1);
        assert!(config.excluded_operators.is_empty());

        let empty = HealthConfig::from_yaml_str("{}").unwrap();
        assert!(empty.dependencies.is_empty());
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "dependencies:\n  console: [ingress]").unwrap();

        let config = HealthConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.dependencies["console"], vec!["ingress"]);
    }

    #[test]
    fn test_from_path_errors() {
        let missing = HealthConfig::from_path(Path::new("/nonexistent/cluster-health.yaml"));
        assert!(matches!(missing, Err(LoadError::Io { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "dependencies: [not, a, map]").unwrap();
        let invalid = HealthConfig::from_path(file.path());
        assert!(matches!(invalid, Err(LoadError::Parse { .. })));
    }
}
