//! The Belief value: a proposition held with a confidence and its evidence.

use super::confidence::clamp_confidence;
use crate::core::proposition::Proposition;
use crate::evidence::Justification;
use crate::util::current_timestamp;
use serde::{Deserialize, Serialize};

/// A proposition held with a confidence in [0, 1] and supporting justification.
///
/// Beliefs are immutable: every revision produces a new value that replaces
/// the previous one in the owning agent's store.
///
/// # Example
///
/// ```
/// use doxa_domain::{Belief, Justification, Proposition};
///
/// let belief = Belief::new(Proposition::new("DiskIsFull"), 1.3, Justification::new());
/// assert_eq!(belief.confidence(), 1.0);
///
/// // Negation keeps the confidence; it is not 1 - confidence.
/// let negated = belief.negate();
/// assert_eq!(negated.proposition().as_str(), "¬DiskIsFull");
/// assert_eq!(negated.confidence(), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "BeliefRecord")]
pub struct Belief {
    proposition: Proposition,
    confidence: f64,
    justification: Justification,
    timestamp: u64,
}

impl Belief {
    /// Create a belief, clamping `confidence` into [0, 1].
    pub fn new(proposition: Proposition, confidence: f64, justification: Justification) -> Self {
        Self {
            proposition,
            confidence: clamp_confidence(confidence),
            justification,
            timestamp: current_timestamp(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn proposition(&self) -> &Proposition {
        &self.proposition
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn justification(&self) -> &Justification {
        &self.justification
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// The same confidence and justification attached to `¬proposition`.
    pub fn negate(&self) -> Belief {
        Belief {
            proposition: self.proposition.negate(),
            confidence: self.confidence,
            justification: self.justification.clone(),
            timestamp: current_timestamp(),
        }
    }

    /// A superseding belief for the same proposition.
    pub fn revise(&self, confidence: f64, justification: Justification) -> Belief {
        Belief::new(self.proposition.clone(), confidence, justification)
    }

    /// Inclusive threshold check.
    pub fn meets(&self, threshold: f64) -> bool {
        self.confidence >= threshold
    }
}

#[derive(Deserialize)]
struct BeliefRecord {
    proposition: Proposition,
    confidence: f64,
    #[serde(default)]
    justification: Justification,
    #[serde(default)]
    timestamp: u64,
}

impl From<BeliefRecord> for Belief {
    fn from(record: BeliefRecord) -> Self {
        Belief::new(record.proposition, record.confidence, record.justification)
            .with_timestamp(record.timestamp)
    }
}
