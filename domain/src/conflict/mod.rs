//! Epistemic conflicts: detection, resolution by justification exchange,
//! and arbitration.

pub mod arbitration;
pub mod detector;
pub mod entities;
pub mod resolution;

pub use arbitration::{ArbitrationVerdict, arbitrate};
pub use detector::{BeliefView, detect_conflicts, detect_conflicts_bidirectional};
pub use entities::{ConflictId, ConflictKey, EpistemicConflict};
pub use resolution::{
    ConflictResolutionOutcome, DEFAULT_INFLUENCE, DEFAULT_SIGNIFICANCE, ExchangeParty,
    JustificationExchange, ResolutionStrategy, ResolutionType,
};
