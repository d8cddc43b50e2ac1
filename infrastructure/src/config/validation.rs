//! Structured configuration issues.
//!
//! Validation never fails outright: it reports every issue it finds with a
//! severity, and the caller decides whether errors are fatal.

use std::fmt;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: a fallback value is used instead.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigIssueCode {
    /// A string field does not name a known variant.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// A numeric field is outside its allowed range.
    OutOfRange { field: String, value: f64 },
    /// A `[frames.<name>]` table names no registered frame.
    UnknownFrame { name: String },
    /// A `[frames.<name>]` table holds values the frame rejects.
    InvalidFrameOverride { name: String },
    /// A field required by another setting is missing.
    MissingValue { field: String },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Warning for a value outside `[0, 1]` that will be clamped.
    pub(crate) fn unit_range(field: &str, value: f64) -> Option<Self> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            return None;
        }
        Some(Self::warning(
            ConfigIssueCode::OutOfRange {
                field: field.to_string(),
                value,
            },
            format!("{}: {} is outside [0, 1], clamping", field, value),
        ))
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_range() {
        assert!(ConfigIssue::unit_range("agent.action", 0.0).is_none());
        assert!(ConfigIssue::unit_range("agent.action", 1.0).is_none());

        let issue = ConfigIssue::unit_range("agent.action", 1.2).unwrap();
        assert!(!issue.is_error());
        assert_eq!(
            issue.code,
            ConfigIssueCode::OutOfRange {
                field: "agent.action".to_string(),
                value: 1.2
            }
        );
        assert!(issue.to_string().starts_with("warning: agent.action"));
        assert!(ConfigIssue::unit_range("agent.action", f64::NAN).is_some());
    }
}
