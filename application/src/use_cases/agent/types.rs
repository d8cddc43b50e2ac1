//! Type definitions for the Agent orchestrator.

use crate::ports::planner::PlannerError;
use doxa_domain::{
    AgentId, Belief, BeliefStore, ConfidenceThresholds, ConflictId, ConflictResolutionOutcome,
    DomainError, Frame, Proposition,
};
use thiserror::Error;

/// Errors that can occur during agent operations
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Conflict {conflict} does not involve agent {agent}")]
    NotInvolved { agent: AgentId, conflict: ConflictId },

    #[error("Conflict counterpart is {expected}, but the exchange was requested with {actual}")]
    CounterpartMismatch { expected: AgentId, actual: AgentId },

    #[error("Agent {agent} holds no belief on {proposition}")]
    BeliefMissing {
        agent: AgentId,
        proposition: Proposition,
    },

    #[error("Belief on {proposition} changed during the exchange; result discarded")]
    StaleBelief { proposition: Proposition },

    #[error("Planner error: {0}")]
    Planner(#[from] PlannerError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

impl AgentError {
    /// Check if this error means a concurrent writer got there first
    pub fn is_stale(&self) -> bool {
        matches!(self, AgentError::StaleBelief { .. })
    }
}

/// What a perception did to the agent's beliefs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerceptionReport {
    /// Beliefs created for previously unknown propositions
    pub formed: Vec<Belief>,
    /// Replacement beliefs for existing propositions
    pub updated: Vec<Belief>,
    /// Propositions whose update was dropped because the frame changed meanwhile
    pub discarded: Vec<Proposition>,
    /// Context entries evicted from the working context
    pub evicted_context: usize,
}

impl PerceptionReport {
    pub fn changed(&self) -> usize {
        self.formed.len() + self.updated.len()
    }
}

/// Result of switching an agent's active frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSwitchReport {
    pub from: String,
    pub to: String,
    /// Number of stored beliefs re-read under the new frame
    pub recomputed: usize,
    /// Beliefs whose confidence changed
    pub changed: Vec<Belief>,
}

/// A consistent copy of an agent's state.
#[derive(Debug, Clone)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub frame: Frame,
    pub thresholds: ConfidenceThresholds,
    pub beliefs: BeliefStore,
}

/// The message an exchange initiator sends its counterpart.
///
/// `basis_revision` is the store revision of the counterpart's belief the
/// exchange was computed from; the update is applied only if the entry is
/// still at that revision.
#[derive(Debug, Clone)]
pub struct ResolutionNotice {
    pub outcome: ConflictResolutionOutcome,
    pub basis_revision: Option<u64>,
}
