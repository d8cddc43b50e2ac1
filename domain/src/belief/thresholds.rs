//! Per-operation confidence thresholds.

use super::confidence::clamp_confidence;
use serde::{Deserialize, Serialize};

/// Minimum confidences gating what an agent does with its beliefs.
///
/// All comparisons against these thresholds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceThresholds {
    /// Beliefs a plan depends on must reach this to act on them.
    pub action: f64,
    /// Beliefs at or above this take part in conflict detection.
    pub conflict: f64,
    /// Beliefs at or above this may be shared with other agents.
    pub communication: f64,
    /// Beliefs below this are dropped by pruning.
    pub retention: f64,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            action: 0.7,
            conflict: 0.6,
            communication: 0.5,
            retention: 0.1,
        }
    }
}

impl ConfidenceThresholds {
    // ==================== Builder Methods ====================

    pub fn with_action(mut self, value: f64) -> Self {
        self.action = clamp_confidence(value);
        self
    }

    pub fn with_conflict(mut self, value: f64) -> Self {
        self.conflict = clamp_confidence(value);
        self
    }

    pub fn with_communication(mut self, value: f64) -> Self {
        self.communication = clamp_confidence(value);
        self
    }

    pub fn with_retention(mut self, value: f64) -> Self {
        self.retention = clamp_confidence(value);
        self
    }

    /// Copy with every threshold clamped into [0, 1].
    pub fn clamped(self) -> Self {
        Self {
            action: clamp_confidence(self.action),
            conflict: clamp_confidence(self.conflict),
            communication: clamp_confidence(self.communication),
            retention: clamp_confidence(self.retention),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let t = ConfidenceThresholds::default();
        assert_eq!(t.conflict, 0.6);
        assert!(t.retention < t.communication);
        assert!(t.communication < t.action);
    }

    #[test]
    fn test_builders_clamp() {
        let t = ConfidenceThresholds::default().with_action(1.5).with_retention(-1.0);
        assert_eq!(t.action, 1.0);
        assert_eq!(t.retention, 0.0);
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let t: ConfidenceThresholds = serde_json::from_str(r#"{"conflict": 0.75}"#).unwrap();
        assert_eq!(t.conflict, 0.75);
        assert_eq!(t.action, 0.7);
    }
}
