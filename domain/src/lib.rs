//! Domain layer for doxa
//!
//! This crate contains the core epistemic model: beliefs, justifications,
//! frames, and conflicts. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Beliefs
//!
//! A [`Belief`] is a [`Proposition`] held with a confidence in [0, 1] and an
//! ordered [`Justification`]. Beliefs are immutable values; agents replace
//! them in a [`BeliefStore`] they exclusively own.
//!
//! ## Frames
//!
//! A [`Frame`] is an interchangeable lens that weighs evidence. All frames
//! implement [`FrameStrategy`]; they differ only in [`FrameParameters`] and
//! their row of the compatibility table. Scores the parameters cannot supply
//! come from an [`EvidenceScorer`].
//!
//! ## Conflicts
//!
//! Two agents conflict when one believes P and the other ¬P, both at or
//! above their conflict thresholds. Conflicts are resolved by
//! [`JustificationExchange`], which either converges, partially adjusts, or
//! reports persistent disagreement.

pub mod belief;
pub mod conflict;
pub mod core;
pub mod event;
pub mod evidence;
pub mod frame;
pub mod perception;
pub mod planning;
pub mod util;

// Re-export commonly used types
pub use belief::{Belief, BeliefStore, ConfidenceThresholds, NEUTRAL_CONFIDENCE, StoredBelief};
pub use conflict::{
    ArbitrationVerdict, BeliefView, ConflictId, ConflictResolutionOutcome, EpistemicConflict,
    ExchangeParty, JustificationExchange, ResolutionStrategy, ResolutionType,
};
pub use core::{agent_id::AgentId, error::DomainError, proposition::Proposition};
pub use event::{EpistemicEvent, EventKind};
pub use evidence::{ElementKind, Justification, JustificationElement};
pub use frame::{
    DirectionalBias, EvidenceScorer, Frame, FrameKind, FrameParameters, FrameRef, FrameStrategy,
    NeutralScorer, ScorerError, Weighting,
};
pub use perception::{ContextEntry, Goal, Perception, Stimulus, WorkingContext};
pub use planning::{Plan, PlanningOutcome};
