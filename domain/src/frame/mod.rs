//! Frames: interchangeable lenses that weigh evidence.
//!
//! - [`FrameKind`]: the closed registry of variants and their compatibility table
//! - [`FrameParameters`]: weights, directional bias, and weighting mode as data
//! - [`FrameStrategy`]: the polymorphic contract every frame implements
//! - [`Frame`]: the concrete value agents hold and swap at runtime
//! - [`EvidenceScorer`]: the external scoring port frames consult

pub mod entities;
pub mod kind;
pub mod parameters;
pub mod scorer;
pub mod strategy;

pub use entities::Frame;
pub use kind::FrameKind;
pub use parameters::{DEFAULT_RECOMPUTE_BLEND, DirectionalBias, FrameParameters, Weighting};
pub use scorer::{EvidenceScorer, FrameRef, NeutralScorer, ScorerError};
pub use strategy::{FrameStrategy, ScoredElement, weighted_average};
