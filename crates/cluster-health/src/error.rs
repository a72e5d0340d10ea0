//! Error types for the health evaluation engine.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by dependency graph algorithms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// The declared dependencies contain a cycle.
    ///
    /// `operators` lists (sorted) every operator that could not be ordered.
    #[error("dependency cycle detected among operators: {}", operators.join(", "))]
    CycleDetected { operators: Vec<String> },
}

/// Errors that can occur when loading configuration or snapshot files.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File contents are not valid YAML/JSON for the expected shape
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}
