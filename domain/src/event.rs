//! Structured epistemic events reported to observers.
//!
//! Agents never format output; they emit these events and let the
//! presentation and logging layers decide how to render them.

use crate::belief::Belief;
use crate::conflict::{ArbitrationVerdict, ConflictResolutionOutcome, EpistemicConflict};
use crate::core::agent_id::AgentId;
use crate::core::proposition::Proposition;
use crate::util::current_timestamp;
use serde::{Deserialize, Serialize};

/// Event payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    PerceptionReceived {
        source: String,
        content: String,
        elements: usize,
    },
    BeliefFormed {
        belief: Belief,
    },
    BeliefUpdated {
        previous: Belief,
        current: Belief,
        delta: f64,
    },
    BeliefPruned {
        proposition: Proposition,
        confidence: f64,
    },
    ConflictDetected {
        conflict: EpistemicConflict,
    },
    JustificationExchanged {
        outcome: ConflictResolutionOutcome,
    },
    Arbitrated {
        verdict: ArbitrationVerdict,
    },
    FrameChanged {
        from: String,
        to: String,
        recomputed: usize,
    },
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::PerceptionReceived { .. } => "perception_received",
            EventKind::BeliefFormed { .. } => "belief_formed",
            EventKind::BeliefUpdated { .. } => "belief_updated",
            EventKind::BeliefPruned { .. } => "belief_pruned",
            EventKind::ConflictDetected { .. } => "conflict_detected",
            EventKind::JustificationExchanged { .. } => "justification_exchanged",
            EventKind::Arbitrated { .. } => "arbitrated",
            EventKind::FrameChanged { .. } => "frame_changed",
        }
    }
}

/// An event emitted by the agent identified by `entity_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpistemicEvent {
    pub entity_id: AgentId,
    /// Milliseconds since epoch
    pub timestamp: u64,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl EpistemicEvent {
    pub fn new(entity_id: AgentId, kind: EventKind) -> Self {
        Self {
            entity_id,
            timestamp: current_timestamp(),
            kind,
        }
    }

    pub fn event_type(&self) -> &'static str {
        self.kind.as_str()
    }

    pub fn belief_formed(entity_id: AgentId, belief: Belief) -> Self {
        Self::new(entity_id, EventKind::BeliefFormed { belief })
    }

    pub fn belief_updated(entity_id: AgentId, previous: Belief, current: Belief) -> Self {
        let delta = current.confidence() - previous.confidence();
        Self::new(
            entity_id,
            EventKind::BeliefUpdated {
                previous,
                current,
                delta,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evidence::Justification;

    #[test]
    fn test_belief_updated_computes_delta() {
        let p = Proposition::new("X");
        let event = EpistemicEvent::belief_updated(
            AgentId::new("alpha"),
            Belief::new(p.clone(), 0.4, Justification::new()),
            Belief::new(p, 0.7, Justification::new()),
        );
        match event.kind {
            EventKind::BeliefUpdated { delta, .. } => assert!((delta - 0.3).abs() < 1e-12),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_serializes_with_flat_type_tag() {
        let event = EpistemicEvent::new(
            AgentId::new("alpha"),
            EventKind::FrameChanged {
                from: "efficiency".into(),
                to: "security".into(),
                recomputed: 3,
            },
        );
        assert_eq!(event.event_type(), "frame_changed");

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "frame_changed");
        assert_eq!(json["entity_id"], "alpha");
        assert_eq!(json["recomputed"], 3);
        assert!(json["timestamp"].as_u64().unwrap() > 0);
    }
}
