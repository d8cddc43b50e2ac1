//! The polymorphic frame contract.
//!
//! Every operation has a default implementation driven by
//! [`FrameStrategy::parameters`], so a variant is fully described by its
//! parameters and its compatibility row. Operations that may consult the
//! scorer are async; a failing scorer degrades to the neutral value and a
//! warning, never to an error.

use super::kind::FrameKind;
use super::parameters::{FrameParameters, Weighting};
use super::scorer::{EvidenceScorer, FrameRef};
use crate::belief::confidence::{NEUTRAL_CONFIDENCE, blend, clamp_confidence};
use crate::core::proposition::Proposition;
use crate::evidence::{Justification, JustificationElement};
use crate::perception::{Perception, Stimulus};
use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, warn};

/// A scored element: `(strength, weight)`, both in [0, 1].
pub type ScoredElement = (f64, f64);

/// Weighted average `Σ(s·w) / Σw`; neutral when there is nothing to weigh.
pub fn weighted_average(scored: &[ScoredElement]) -> f64 {
    let total_weight: f64 = scored.iter().map(|(_, w)| w).sum();
    if scored.is_empty() || total_weight <= 0.0 {
        return NEUTRAL_CONFIDENCE;
    }
    let weighted: f64 = scored.iter().map(|(s, w)| s * w).sum();
    clamp_confidence(weighted / total_weight)
}

#[async_trait]
pub trait FrameStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> FrameKind;

    fn parameters(&self) -> &FrameParameters;

    fn frame_ref(&self) -> FrameRef<'_> {
        FrameRef {
            name: self.name(),
            kind: self.kind(),
        }
    }

    /// Trust in justification produced under `other`, in [0, 1].
    fn compatibility(&self, other: FrameKind) -> f64 {
        self.kind().compatibility(other)
    }

    /// Strength of one element: its declared strength, else the scorer's.
    async fn element_strength(
        &self,
        element: &JustificationElement,
        proposition: &Proposition,
        scorer: &dyn EvidenceScorer,
    ) -> f64 {
        if let Some(strength) = element.declared_strength {
            return clamp_confidence(strength);
        }
        match scorer.score_strength(element, proposition).await {
            Ok(strength) => clamp_confidence(strength),
            Err(e) => {
                warn!(
                    "Frame {}: scoring {} element from {} failed, using neutral strength: {}",
                    self.name(),
                    element.kind,
                    element.source,
                    e
                );
                NEUTRAL_CONFIDENCE
            }
        }
    }

    /// Weight of one element under this frame.
    async fn element_weight(
        &self,
        element: &JustificationElement,
        scorer: &dyn EvidenceScorer,
    ) -> f64 {
        match self.parameters().weighting {
            Weighting::Parametric => clamp_confidence(self.parameters().weight_for(element)),
            Weighting::Saliency => match scorer.score_saliency(element, self.frame_ref()).await {
                Ok(saliency) => clamp_confidence(saliency),
                Err(e) => {
                    warn!(
                        "Frame {}: saliency for {} element failed, using neutral weight: {}",
                        self.name(),
                        element.kind,
                        e
                    );
                    NEUTRAL_CONFIDENCE
                }
            },
        }
    }

    /// Score every element concurrently, preserving order.
    async fn score_elements(
        &self,
        proposition: &Proposition,
        elements: &[JustificationElement],
        scorer: &dyn EvidenceScorer,
    ) -> Vec<ScoredElement> {
        join_all(elements.iter().map(|element| async move {
            let strength = self.element_strength(element, proposition, scorer).await;
            let weight = self.element_weight(element, scorer).await;
            (strength, weight)
        }))
        .await
    }

    /// Identity unless the frame delegates interpretation to the scorer.
    async fn interpret_perception(
        &self,
        perception: &Perception,
        scorer: &dyn EvidenceScorer,
    ) -> Perception {
        if !self.parameters().delegate_interpretation {
            return perception.clone();
        }
        match scorer.interpret(perception, self.frame_ref()).await {
            Ok(interpreted) => interpreted,
            Err(e) => {
                warn!(
                    "Frame {}: interpretation failed, keeping perception unmodified: {}",
                    self.name(),
                    e
                );
                perception.clone()
            }
        }
    }

    /// Explicit propositions of the stimulus followed by the scorer's
    /// extraction, deduplicated in first-seen order.
    async fn relevant_propositions(
        &self,
        stimulus: Stimulus<'_>,
        scorer: &dyn EvidenceScorer,
    ) -> Vec<Proposition> {
        let extracted = match scorer.extract_propositions(stimulus, self.frame_ref()).await {
            Ok(props) => props,
            Err(e) => {
                warn!(
                    "Frame {}: proposition extraction failed, using explicit propositions only: {}",
                    self.name(),
                    e
                );
                Vec::new()
            }
        };

        let mut relevant: Vec<Proposition> = Vec::new();
        for prop in stimulus.explicit_propositions().iter().chain(extracted.iter()) {
            if !relevant.contains(prop) {
                relevant.push(prop.clone());
            }
        }
        relevant
    }

    /// `Σ(s·w) / Σw` over `elements`; 0.5 when empty or all weights are zero.
    async fn compute_initial_confidence(
        &self,
        proposition: &Proposition,
        elements: &[JustificationElement],
        scorer: &dyn EvidenceScorer,
    ) -> f64 {
        if elements.is_empty() {
            return NEUTRAL_CONFIDENCE;
        }
        let scored = self.score_elements(proposition, elements, scorer).await;
        weighted_average(&scored)
    }

    /// Blend each new element into `current` in order, then apply the
    /// frame's directional bias. A `source_frame` scales every weight by
    /// this frame's compatibility with it.
    async fn update_confidence(
        &self,
        proposition: &Proposition,
        current: f64,
        current_justification: &Justification,
        new_elements: &[JustificationElement],
        source_frame: Option<FrameKind>,
        scorer: &dyn EvidenceScorer,
    ) -> f64 {
        if new_elements.is_empty() {
            return current;
        }

        let compatibility = source_frame.map_or(1.0, |source| self.compatibility(source));
        let bias = self.parameters().bias;
        let scored = self.score_elements(proposition, new_elements, scorer).await;

        let blended = scored.iter().fold(clamp_confidence(current), |c, (s, w)| {
            blend(c, bias.apply_strength(*s), w * compatibility)
        });
        let updated = bias.apply_confidence(blended);

        debug!(
            "Frame {}: {} {:.3} -> {:.3} ({} new, {} prior elements)",
            self.name(),
            proposition,
            current,
            updated,
            new_elements.len(),
            current_justification.len()
        );
        updated
    }

    /// Re-read `justification` under this frame and blend the result with
    /// `previous` by `recompute_blend`. An empty justification leaves
    /// `previous` untouched.
    async fn recompute_confidence(
        &self,
        proposition: &Proposition,
        justification: &Justification,
        previous: f64,
        scorer: &dyn EvidenceScorer,
    ) -> f64 {
        if justification.is_empty() {
            return clamp_confidence(previous);
        }
        let fresh = self
            .compute_initial_confidence(proposition, justification.elements(), scorer)
            .await;
        blend(clamp_confidence(previous), fresh, self.parameters().recompute_blend)
    }

    /// How strongly this frame finds another agent's justification
    /// convincing: weighted average × compatibility with its source frame.
    async fn evaluate_external_justification(
        &self,
        proposition: &Proposition,
        justification: &Justification,
        source_frame: FrameKind,
        scorer: &dyn EvidenceScorer,
    ) -> f64 {
        let average = self
            .compute_initial_confidence(proposition, justification.elements(), scorer)
            .await;
        clamp_confidence(average * self.compatibility(source_frame))
    }
}
