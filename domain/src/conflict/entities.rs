//! Epistemic conflicts between two agents.

use crate::belief::Belief;
use crate::core::agent_id::AgentId;
use crate::core::proposition::Proposition;
use crate::util::{current_timestamp, generate_id};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a detected conflict.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConflictId(String);

impl ConflictId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(generate_id("conflict"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConflictId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Agent A believes P and agent B believes ¬P, both at or above their own
/// conflict thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpistemicConflict {
    pub id: ConflictId,
    pub agent_a: AgentId,
    pub agent_b: AgentId,
    /// A's belief on `proposition`
    pub belief_a: Belief,
    /// B's belief on `proposition.negate()`
    pub belief_b: Belief,
    pub detected_at: u64,
}

impl EpistemicConflict {
    pub fn new(agent_a: AgentId, belief_a: Belief, agent_b: AgentId, belief_b: Belief) -> Self {
        Self {
            id: ConflictId::generate(),
            agent_a,
            agent_b,
            belief_a,
            belief_b,
            detected_at: current_timestamp(),
        }
    }

    /// The proposition as held by agent A.
    pub fn proposition(&self) -> &Proposition {
        self.belief_a.proposition()
    }

    pub fn involves(&self, agent: &AgentId) -> bool {
        &self.agent_a == agent || &self.agent_b == agent
    }

    /// The belief `agent` holds in this conflict.
    pub fn belief_of(&self, agent: &AgentId) -> Option<&Belief> {
        if &self.agent_a == agent {
            Some(&self.belief_a)
        } else if &self.agent_b == agent {
            Some(&self.belief_b)
        } else {
            None
        }
    }

    /// The agent on the other side from `agent`.
    pub fn counterpart_of(&self, agent: &AgentId) -> Option<&AgentId> {
        if &self.agent_a == agent {
            Some(&self.agent_b)
        } else if &self.agent_b == agent {
            Some(&self.agent_a)
        } else {
            None
        }
    }

    /// Identity independent of detection direction: the two
    /// `(agent, proposition)` sides, ordered.
    pub fn key(&self) -> ConflictKey {
        let a = (self.agent_a.clone(), self.belief_a.proposition().clone());
        let b = (self.agent_b.clone(), self.belief_b.proposition().clone());
        if a <= b { ConflictKey(a, b) } else { ConflictKey(b, a) }
    }

    /// The same conflict seen from B's side.
    pub fn swapped(&self) -> Self {
        Self {
            id: self.id.clone(),
            agent_a: self.agent_b.clone(),
            agent_b: self.agent_a.clone(),
            belief_a: self.belief_b.clone(),
            belief_b: self.belief_a.clone(),
            detected_at: self.detected_at,
        }
    }
}

impl fmt::Display for EpistemicConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} holds {} ({:.2}) vs {} holds {} ({:.2})",
            self.agent_a,
            self.belief_a.proposition(),
            self.belief_a.confidence(),
            self.agent_b,
            self.belief_b.proposition(),
            self.belief_b.confidence()
        )
    }
}

/// Direction-independent conflict identity used for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConflictKey((AgentId, Proposition), (AgentId, Proposition));

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::Justification;

    fn conflict() -> EpistemicConflict {
        let p = Proposition::new("SentimentIsPositive");
        EpistemicConflict::new(
            AgentId::new("alpha"),
            Belief::new(p.clone(), 0.85, Justification::new()),
            AgentId::new("beta"),
            Belief::new(p.negate(), 0.78, Justification::new()),
        )
    }

    #[test]
    fn test_sides() {
        let c = conflict();
        let alpha = AgentId::new("alpha");
        let beta = AgentId::new("beta");
        assert!(c.involves(&alpha));
        assert!(!c.involves(&AgentId::new("gamma")));
        assert_eq!(c.counterpart_of(&alpha), Some(&beta));
        assert_eq!(c.belief_of(&beta).unwrap().confidence(), 0.78);
        assert!(c.belief_of(&AgentId::new("gamma")).is_none());
    }

    #[test]
    fn test_key_ignores_direction() {
        let c = conflict();
        assert_eq!(c.key(), c.swapped().key());
        assert_eq!(c.swapped().proposition().as_str(), "¬SentimentIsPositive");
    }

    #[test]
    fn test_display() {
        let text = conflict().to_string();
        assert!(text.contains("alpha holds SentimentIsPositive (0.85)"));
        assert!(text.contains("beta holds ¬SentimentIsPositive (0.78)"));
    }
}
