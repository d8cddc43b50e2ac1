//! Evidence scorer port
//!
//! Frames consult a scorer for anything parameters cannot answer: element
//! strength, saliency, proposition extraction, and perception
//! interpretation. Implementations live in the infrastructure layer and own
//! their timeout and retry policy. Callers in this crate replace any failure
//! with a neutral value.

use super::kind::FrameKind;
use crate::belief::confidence::NEUTRAL_CONFIDENCE;
use crate::core::proposition::Proposition;
use crate::evidence::JustificationElement;
use crate::perception::{Perception, Stimulus};
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Errors a scorer adapter may report
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScorerError {
    #[error("Scorer timed out after {0}ms")]
    Timeout(u64),

    #[error("Scorer unavailable: {0}")]
    Unavailable(String),

    #[error("Scorer transport error: {0}")]
    Transport(String),

    #[error("Invalid scorer response: {0}")]
    InvalidResponse(String),

    #[error("Scorer does not support {0}")]
    Unsupported(&'static str),
}

impl ScorerError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ScorerError::Timeout(_))
    }
}

/// What a scorer is told about the frame on whose behalf it is asked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameRef<'a> {
    pub name: &'a str,
    pub kind: FrameKind,
}

/// Async, fallible evidence scoring.
#[async_trait]
pub trait EvidenceScorer: Send + Sync {
    /// Strength in [0, 1] with which `element` supports `proposition`.
    async fn score_strength(
        &self,
        element: &JustificationElement,
        proposition: &Proposition,
    ) -> Result<f64, ScorerError>;

    /// How salient `element` is to the asking frame, in [0, 1].
    async fn score_saliency(
        &self,
        element: &JustificationElement,
        frame: FrameRef<'_>,
    ) -> Result<f64, ScorerError>;

    /// Propositions implied by a perception or goal.
    async fn extract_propositions(
        &self,
        stimulus: Stimulus<'_>,
        frame: FrameRef<'_>,
    ) -> Result<Vec<Proposition>, ScorerError>;

    /// A reinterpretation of `perception` as seen through the asking frame.
    async fn interpret(
        &self,
        perception: &Perception,
        frame: FrameRef<'_>,
    ) -> Result<Perception, ScorerError>;
}

/// Scorer that knows nothing: every score is neutral, nothing is extracted.
///
/// Elements with a declared strength and frames with parametric weights
/// never need more than this.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralScorer;

#[async_trait]
impl EvidenceScorer for NeutralScorer {
    async fn score_strength(
        &self,
        _element: &JustificationElement,
        _proposition: &Proposition,
    ) -> Result<f64, ScorerError> {
        Ok(NEUTRAL_CONFIDENCE)
    }

    async fn score_saliency(
        &self,
        _element: &JustificationElement,
        _frame: FrameRef<'_>,
    ) -> Result<f64, ScorerError> {
        Ok(NEUTRAL_CONFIDENCE)
    }

    async fn extract_propositions(
        &self,
        _stimulus: Stimulus<'_>,
        _frame: FrameRef<'_>,
    ) -> Result<Vec<Proposition>, ScorerError> {
        Ok(Vec::new())
    }

    async fn interpret(
        &self,
        perception: &Perception,
        _frame: FrameRef<'_>,
    ) -> Result<Perception, ScorerError> {
        Ok(perception.clone())
    }
}
