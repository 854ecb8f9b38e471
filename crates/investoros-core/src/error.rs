use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One field that failed its declared bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub constraint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(v) => write!(f, "{} must be {} (got {})", self.field, self.constraint, v),
            None => write!(f, "{} must be {}", self.field, self.constraint),
        }
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum UnderwritingError {
    #[error("Invalid input: {}", join_violations(.violations))]
    InvalidInput { violations: Vec<FieldViolation> },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl UnderwritingError {
    /// Single-field InvalidInput.
    pub fn invalid(
        field: impl Into<String>,
        constraint: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        UnderwritingError::InvalidInput {
            violations: vec![FieldViolation {
                field: field.into(),
                constraint: constraint.into(),
                value,
            }],
        }
    }

    /// Violations carried by an InvalidInput, empty for anything else.
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            UnderwritingError::InvalidInput { violations } => violations,
            UnderwritingError::Serialization(_) => &[],
        }
    }
}

impl From<serde_json::Error> for UnderwritingError {
    fn from(e: serde_json::Error) -> Self {
        UnderwritingError::Serialization(e.to_string())
    }
}
