//! Belief model: immutable beliefs, their confidence invariants, and the
//! per-agent store they live in.

pub mod confidence;
pub mod entities;
pub mod store;
pub mod thresholds;

pub use confidence::{NEUTRAL_CONFIDENCE, blend, clamp_confidence};
pub use entities::Belief;
pub use store::{BeliefStore, StoredBelief};
pub use thresholds::ConfidenceThresholds;
