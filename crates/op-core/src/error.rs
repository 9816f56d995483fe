use thiserror::Error;

use crate::axis::Axis;

/// Every failure the algebra, derivation and engine can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpError {
    /// Malformed label or tag.
    #[error("invalid {kind} '{raw}'")]
    Validation { kind: &'static str, raw: String },

    #[error("cognitive function label must be 1 or 2 characters (got '{0}')")]
    InvalidLength(String),

    #[error("invalid cognitive function letter '{0}'")]
    InvalidLetter(char),

    #[error("invalid cognitive function charge '{0}'")]
    InvalidCharge(char),

    #[error("axis mismatch: expected {expected:?}, found {found:?}")]
    IncompatibleAxis { expected: Axis, found: Axis },

    #[error("conflicting {component}: '{existing}' vs '{incoming}'")]
    ConflictingComponent {
        component: &'static str,
        existing: String,
        incoming: String,
    },

    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("grant order out of range: {0} (expected 0..=3)")]
    InvalidGrantOrder(usize),

    #[error("no animal grant position pairs orders {0} and {1}")]
    InvalidPosition(usize, usize),
}

impl OpError {
    pub(crate) fn validation(kind: &'static str, raw: impl Into<String>) -> Self {
        OpError::Validation {
            kind,
            raw: raw.into(),
        }
    }

    pub(crate) fn conflict(
        component: &'static str,
        existing: impl ToString,
        incoming: impl ToString,
    ) -> Self {
        OpError::ConflictingComponent {
            component,
            existing: existing.to_string(),
            incoming: incoming.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OpError>;
