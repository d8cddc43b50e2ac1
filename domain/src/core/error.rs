//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Scorer failures and persistent disagreement are deliberately absent:
/// the former degrade to neutral defaults, the latter is a normal outcome.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Unknown frame: {0}")]
    UnknownFrame(String),

    #[error("Invalid frame parameter '{name}' = {value}: {reason}")]
    InvalidParameter {
        name: String,
        value: f64,
        reason: String,
    },

    #[error("Invalid proposition: {0}")]
    InvalidProposition(String),

    #[error("Unknown justification element kind: {0}")]
    UnknownElementKind(String),
}

impl DomainError {
    pub(crate) fn invalid_parameter(
        name: impl Into<String>,
        value: f64,
        reason: impl Into<String>,
    ) -> Self {
        DomainError::InvalidParameter {
            name: name.into(),
            value,
            reason: reason.into(),
        }
    }

    /// Check if this error came from looking up a frame by name
    pub fn is_unknown_frame(&self) -> bool {
        matches!(self, DomainError::UnknownFrame(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_frame_display() {
        let error = DomainError::UnknownFrame("optimism".to_string());
        assert_eq!(error.to_string(), "Unknown frame: optimism");
        assert!(error.is_unknown_frame());
    }

    #[test]
    fn test_invalid_parameter_display() {
        let error = DomainError::invalid_parameter("default_weight", 1.5, "must be within [0, 1]");
        assert!(error.to_string().contains("default_weight"));
        assert!(error.to_string().contains("1.5"));
        assert!(!error.is_unknown_frame());
    }
}
