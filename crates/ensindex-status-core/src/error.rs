//! Error types for building and validating indexing status values.

use std::fmt;

use thiserror::Error;

use crate::chain::ChainId;

/// A single broken invariant, as reported by the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The field relationship that does not hold, e.g. `latestIndexedBlock <= backfillEndBlock`.
    pub invariant: &'static str,
    /// Location inside the checked value (`chains[10]`, `omnichainSnapshot`, …).
    /// Empty when the invariant belongs to the root value.
    pub path: String,
    /// Human-readable detail with the offending values.
    pub message: String,
}

impl Violation {
    pub fn new(invariant: &'static str, message: impl Into<String>) -> Self {
        Self {
            invariant,
            path: String::new(),
            message: message.into(),
        }
    }

    /// Nest this violation under `prefix` (outermost segment first).
    pub fn within(mut self, prefix: &str) -> Self {
        self.path = if self.path.is_empty() {
            prefix.to_string()
        } else {
            format!("{prefix}.{}", self.path)
        };
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "[{}] {}", self.invariant, self.message)
        } else {
            write!(f, "{}: [{}] {}", self.path, self.invariant, self.message)
        }
    }
}

fn join_violations(details: &[Violation]) -> String {
    details
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors produced while constructing, validating or decoding status values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatusError {
    #[error("Invalid chain status for chain {chain_id}: {reason}")]
    InvalidChainStatus { chain_id: ChainId, reason: String },

    #[error("An omnichain snapshot requires at least one chain")]
    EmptyChainSet,

    #[error("Invariant violation: {}", join_violations(.details))]
    InvariantViolation { details: Vec<Violation> },

    #[error("Deserialization error: {reason}")]
    Deserialization { reason: String },
}

impl StatusError {
    pub fn invalid_chain_status(chain_id: ChainId, reason: impl Into<String>) -> Self {
        Self::InvalidChainStatus {
            chain_id,
            reason: reason.into(),
        }
    }

    pub fn deserialization(reason: impl fmt::Display) -> Self {
        Self::Deserialization {
            reason: reason.to_string(),
        }
    }

    /// Short machine-readable name of the error variant, used as a metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidChainStatus { .. } => "invalid_chain_status",
            Self::EmptyChainSet => "empty_chain_set",
            Self::InvariantViolation { .. } => "invariant_violation",
            Self::Deserialization { .. } => "deserialization",
        }
    }

    /// The violated invariants, if this is an [`StatusError::InvariantViolation`].
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::InvariantViolation { details } => details,
            _ => &[],
        }
    }

    /// Returns `true` if one of the reported violations is `invariant`.
    pub fn names_invariant(&self, invariant: &str) -> bool {
        self.violations().iter().any(|v| v.invariant == invariant)
    }

    /// Returns `true` if the error stems from malformed input rather than
    /// from a value that breaks the model's invariants.
    pub fn is_deserialization(&self) -> bool {
        matches!(self, Self::Deserialization { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violation_display_with_path() {
        let v = Violation::new("latestIndexedBlock <= backfillEndBlock", "12 > 10")
            .within("chains[1]");
        assert_eq!(
            v.to_string(),
            "chains[1]: [latestIndexedBlock <= backfillEndBlock] 12 > 10"
        );
    }

    #[test]
    fn nested_paths_are_prefixed() {
        let v = Violation::new("x", "y").within("chains[1]").within("omnichainSnapshot");
        assert_eq!(v.path, "omnichainSnapshot.chains[1]");
    }

    #[test]
    fn invariant_violation_lists_every_detail() {
        let err = StatusError::InvariantViolation {
            details: vec![Violation::new("a", "first"), Violation::new("b", "second")],
        };
        let msg = err.to_string();
        assert!(msg.contains("[a] first"));
        assert!(msg.contains("[b] second"));
        assert!(err.names_invariant("b"));
        assert!(!err.names_invariant("c"));
    }
}
