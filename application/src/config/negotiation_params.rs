//! Negotiation parameters: round limits and arbitration.

use doxa_domain::FrameKind;
use serde::{Deserialize, Serialize};

/// Parameters for [`NegotiateUseCase`](crate::use_cases::negotiate::NegotiateUseCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NegotiationParams {
    /// Maximum detect → exchange rounds
    pub max_rounds: usize,
    /// Stop once a round ends with nothing but persistent disagreement
    pub stop_on_persistent: bool,
    /// Escalate conflicts that survive every round to an arbiter
    pub escalate: bool,
    /// Name of the arbitrating frame
    pub arbiter: String,
    /// Minimum support difference for the arbiter to favor a side
    pub arbitration_margin: f64,
}

impl Default for NegotiationParams {
    fn default() -> Self {
        Self {
            max_rounds: 3,
            stop_on_persistent: true,
            escalate: true,
            arbiter: FrameKind::Judge.as_str().to_string(),
            arbitration_margin: 0.05,
        }
    }
}

impl NegotiationParams {
    // ==================== Builder Methods ====================

    pub fn with_max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = rounds;
        self
    }

    pub fn with_stop_on_persistent(mut self, stop: bool) -> Self {
        self.stop_on_persistent = stop;
        self
    }

    pub fn with_escalation(mut self, escalate: bool) -> Self {
        self.escalate = escalate;
        self
    }

    pub fn with_arbiter(mut self, frame: impl Into<String>) -> Self {
        self.arbiter = frame.into();
        self
    }

    pub fn with_arbitration_margin(mut self, margin: f64) -> Self {
        self.arbitration_margin = margin.max(0.0);
        self
    }
}
