//! Operator health classification from reported conditions.
//!
//! The decision is an ordered chain over the `Available` and `Degraded`
//! conditions:
//!
//! 1. `Available=False` -> [`OperatorHealthStatus::Unavailable`]
//! 2. `Degraded=True` -> [`OperatorHealthStatus::Degraded`]
//! 3. `Available=True` -> [`OperatorHealthStatus::Healthy`]
//! 4. anything else -> [`OperatorHealthStatus::Unknown`]
//!
//! An operator that is both unavailable and degraded is reported as the more
//! severe `Unavailable`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const CONDITION_AVAILABLE: &str = "Available";
pub const CONDITION_DEGRADED: &str = "Degraded";
pub const CONDITION_PROGRESSING: &str = "Progressing";

/// Kubernetes condition tri-state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
}

impl ConditionStatus {
    /// Parse a `status` field; anything but "True"/"False" is `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s {
            "True" => Self::True,
            "False" => Self::False,
            _ => Self::Unknown,
        }
    }
}

/// A single reported condition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorCondition {
    pub status: ConditionStatus,
    /// Machine-readable reason (e.g. "AsExpected")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Human-readable message with details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl OperatorCondition {
    pub fn new(status: ConditionStatus) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// "reason: message", falling back to whichever part is present.
    fn describe(&self) -> Option<String> {
        match (&self.reason, &self.message) {
            (Some(reason), Some(message)) if !message.is_empty() => {
                Some(format!("{reason}: {message}"))
            }
            (_, Some(message)) if !message.is_empty() => Some(message.clone()),
            (Some(reason), _) => Some(reason.clone()),
            _ => None,
        }
    }
}

/// Conditions reported by one operator, keyed by condition type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatorConditionSet {
    conditions: BTreeMap<String, OperatorCondition>,
}

impl OperatorConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, condition_type: impl Into<String>, condition: OperatorCondition) -> Self {
        self.insert(condition_type, condition);
        self
    }

    /// Insert or replace a condition. A later duplicate wins.
    pub fn insert(&mut self, condition_type: impl Into<String>, condition: OperatorCondition) {
        self.conditions.insert(condition_type.into(), condition);
    }

    pub fn get(&self, condition_type: &str) -> Option<&OperatorCondition> {
        self.conditions.get(condition_type)
    }

    /// Status of a condition, `None` when it was not reported at all.
    pub fn status(&self, condition_type: &str) -> Option<ConditionStatus> {
        self.get(condition_type).map(|c| c.status)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }
}

/// Health of a single operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatorHealthStatus {
    Healthy,
    Degraded,
    Unavailable,
    /// A dependency is not healthy; own conditions were not inspected.
    Blocked,
    Unknown,
}

impl OperatorHealthStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Degraded => "Degraded",
            Self::Unavailable => "Unavailable",
            Self::Blocked => "Blocked",
            Self::Unknown => "Unknown",
        }
    }

    pub fn is_healthy(self) -> bool {
        matches!(self, Self::Healthy)
    }
}

impl std::fmt::Display for OperatorHealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify an operator from its conditions.
pub fn classify_operator(conditions: &OperatorConditionSet) -> OperatorHealthStatus {
    inspect_operator(conditions).0
}

/// Classify an operator and explain the decision.
pub fn inspect_operator(conditions: &OperatorConditionSet) -> (OperatorHealthStatus, String) {
    let available = conditions.get(CONDITION_AVAILABLE);
    let degraded = conditions.get(CONDITION_DEGRADED);

    if let Some(condition) = available.filter(|c| c.status == ConditionStatus::False) {
        let reason = condition
            .describe()
            .unwrap_or_else(|| "Available=False".to_string());
        return (OperatorHealthStatus::Unavailable, reason);
    }

    if let Some(condition) = degraded.filter(|c| c.status == ConditionStatus::True) {
        let reason = condition
            .describe()
            .unwrap_or_else(|| "Degraded=True".to_string());
        return (OperatorHealthStatus::Degraded, reason);
    }

    match available {
        Some(condition) if condition.status == ConditionStatus::True => (
            OperatorHealthStatus::Healthy,
            condition
                .describe()
                .unwrap_or_else(|| "Available=True".to_string()),
        ),
        Some(_) => (
            OperatorHealthStatus::Unknown,
            "Available condition status is Unknown".to_string(),
        ),
        None if conditions.is_empty() => (
            OperatorHealthStatus::Unknown,
            "no conditions reported".to_string(),
        ),
        None => (
            OperatorHealthStatus::Unknown,
            "Available condition not reported".to_string(),
        ),
    }
}
