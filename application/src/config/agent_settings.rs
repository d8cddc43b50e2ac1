//! Agent settings: per-agent thresholds, context capacity and exchange
//! parameters.

use doxa_domain::{ConfidenceThresholds, JustificationExchange};
use serde::{Deserialize, Serialize};

/// Default number of context entries an agent keeps.
pub const DEFAULT_CONTEXT_CAPACITY: usize = 32;

/// Construction-time settings of an [`Agent`](crate::use_cases::agent::Agent).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    pub thresholds: ConfidenceThresholds,
    /// Capacity of the working context; the oldest entry is evicted first.
    pub context_capacity: usize,
    /// Significance and influence of justification exchange.
    pub exchange: JustificationExchange,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            thresholds: ConfidenceThresholds::default(),
            context_capacity: DEFAULT_CONTEXT_CAPACITY,
            exchange: JustificationExchange::default(),
        }
    }
}

impl AgentSettings {
    // ==================== Builder Methods ====================

    pub fn with_thresholds(mut self, thresholds: ConfidenceThresholds) -> Self {
        self.thresholds = thresholds.clamped();
        self
    }

    pub fn with_context_capacity(mut self, capacity: usize) -> Self {
        self.context_capacity = capacity;
        self
    }

    pub fn with_significance(mut self, significance: f64) -> Self {
        self.exchange.significance = significance.max(0.0);
        self
    }

    pub fn with_influence(mut self, influence: f64) -> Self {
        self.exchange = self.exchange.with_influence(influence);
        self
    }
}
