//! Conflict resolution by justification exchange.
//!
//! Each side reads the other's justification through its own frame
//! (discounted by compatibility with the other's frame) and gives up a
//! share of its confidence proportional to how convincing it found that
//! justification. Opposing evidence never raises a side's confidence. The
//! round is then classified:
//!
//! 1. either side fell below its conflict threshold: converged
//! 2. both sides moved less than the significance threshold: persistent disagreement
//! 3. otherwise: partial adjustment

use super::entities::{ConflictId, EpistemicConflict};
use crate::belief::{Belief, clamp_confidence};
use crate::core::agent_id::AgentId;
use crate::evidence::{Justification, JustificationElement};
use crate::frame::{EvidenceScorer, FrameStrategy};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Default share of the exchange result in a side's candidate confidence.
pub const DEFAULT_INFLUENCE: f64 = 0.5;

/// Default significance threshold for "did not move".
pub const DEFAULT_SIGNIFICANCE: f64 = 0.1;

/// Confidence changes at or below this count as no change.
const CHANGE_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionType {
    /// At least one side dropped below its conflict threshold
    Converged,
    /// Both still conflict, but at least one moved significantly
    PartialAdjustment,
    /// Neither side moved significantly
    PersistentDisagreement,
}

impl ResolutionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionType::Converged => "converged",
            ResolutionType::PartialAdjustment => "partial-adjustment",
            ResolutionType::PersistentDisagreement => "persistent-disagreement",
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ResolutionType::Converged)
    }
}

impl fmt::Display for ResolutionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one exchange round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictResolutionOutcome {
    pub conflict_id: ConflictId,
    pub agent_a: AgentId,
    pub agent_b: AgentId,
    pub success: bool,
    pub resolution_type: ResolutionType,
    pub reason: String,
    /// A's replacement belief, absent if A's confidence did not change
    pub updated_belief_a: Option<Belief>,
    /// B's replacement belief, absent if B's confidence did not change
    pub updated_belief_b: Option<Belief>,
    pub delta_a: f64,
    pub delta_b: f64,
}

impl ConflictResolutionOutcome {
    /// The update addressed to `agent`, if any.
    pub fn update_for(&self, agent: &AgentId) -> Option<&Belief> {
        if &self.agent_a == agent {
            self.updated_belief_a.as_ref()
        } else if &self.agent_b == agent {
            self.updated_belief_b.as_ref()
        } else {
            None
        }
    }

    /// The same outcome with sides swapped.
    pub fn swapped(self) -> Self {
        Self {
            conflict_id: self.conflict_id,
            agent_a: self.agent_b,
            agent_b: self.agent_a,
            success: self.success,
            resolution_type: self.resolution_type,
            reason: self.reason,
            updated_belief_a: self.updated_belief_b,
            updated_belief_b: self.updated_belief_a,
            delta_a: self.delta_b,
            delta_b: self.delta_a,
        }
    }
}

/// One side of an exchange: who, through which frame, holding what.
#[derive(Clone, Copy)]
pub struct ExchangeParty<'a> {
    pub agent: &'a AgentId,
    pub frame: &'a dyn FrameStrategy,
    pub belief: &'a Belief,
    pub conflict_threshold: f64,
    pub scorer: &'a dyn EvidenceScorer,
}

impl fmt::Debug for ExchangeParty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExchangeParty")
            .field("agent", self.agent)
            .field("frame", &self.frame.name())
            .field("belief", self.belief)
            .field("conflict_threshold", &self.conflict_threshold)
            .finish()
    }
}

/// Strategy for resolving a single conflict between two parties.
#[async_trait]
pub trait ResolutionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// One atomic round. `a` and `b` correspond to the conflict's sides.
    async fn resolve(
        &self,
        conflict: &EpistemicConflict,
        a: ExchangeParty<'_>,
        b: ExchangeParty<'_>,
    ) -> ConflictResolutionOutcome;
}

/// The justification exchange protocol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JustificationExchange {
    /// Minimum |Δ| that counts as a significant move
    pub significance: f64,
    /// Weight λ of the exchange result in the candidate confidence
    pub influence: f64,
}

impl Default for JustificationExchange {
    fn default() -> Self {
        Self {
            significance: DEFAULT_SIGNIFICANCE,
            influence: DEFAULT_INFLUENCE,
        }
    }
}

impl JustificationExchange {
    pub fn new(significance: f64) -> Self {
        Self {
            significance: significance.max(0.0),
            ..Self::default()
        }
    }

    pub fn with_influence(mut self, influence: f64) -> Self {
        self.influence = clamp_confidence(influence);
        self
    }

    /// `c·(1 - λ·s)`: non-increasing in the other side's support `s`.
    fn candidate(&self, current: f64, persuasion: f64) -> f64 {
        let lambda = clamp_confidence(self.influence);
        clamp_confidence(current * (1.0 - lambda * clamp_confidence(persuasion)))
    }

    fn classify(
        &self,
        a: (&ExchangeParty<'_>, f64, f64),
        b: (&ExchangeParty<'_>, f64, f64),
    ) -> (ResolutionType, String) {
        let (party_a, candidate_a, delta_a) = a;
        let (party_b, candidate_b, delta_b) = b;

        let a_holds = candidate_a >= party_a.conflict_threshold;
        let b_holds = candidate_b >= party_b.conflict_threshold;

        if !(a_holds && b_holds) {
            let yielded: Vec<String> = [(party_a, candidate_a, a_holds), (party_b, candidate_b, b_holds)]
                .iter()
                .filter(|(_, _, holds)| !holds)
                .map(|(p, c, _)| format!("{} fell to {:.3} (< {:.2})", p.agent, c, p.conflict_threshold))
                .collect();
            return (ResolutionType::Converged, yielded.join("; "));
        }

        if delta_a.abs() < self.significance && delta_b.abs() < self.significance {
            return (
                ResolutionType::PersistentDisagreement,
                format!(
                    "Neither side moved by {:.2} or more ({} {:+.3}, {} {:+.3})",
                    self.significance, party_a.agent, delta_a, party_b.agent, delta_b
                ),
            );
        }

        (
            ResolutionType::PartialAdjustment,
            format!(
                "Both sides still hold their beliefs after adjusting ({} {:+.3}, {} {:+.3})",
                party_a.agent, delta_a, party_b.agent, delta_b
            ),
        )
    }
}

/// The revised belief for one side, or `None` if its confidence is unchanged.
///
/// The external element wraps only the other side's first-hand evidence, so
/// repeated rounds grow a justification by one element each instead of
/// nesting every earlier exchange.
fn revised_belief(
    own: &ExchangeParty<'_>,
    other: &ExchangeParty<'_>,
    candidate: f64,
) -> Option<Belief> {
    if (candidate - own.belief.confidence()).abs() <= CHANGE_EPSILON {
        return None;
    }
    let external = JustificationElement::external_agent(
        other.agent.as_str(),
        format!(
            "{} argued {} under the {} frame",
            other.agent,
            other.belief.proposition(),
            other.frame.name()
        ),
        other.belief.justification().first_hand(),
    )
    .with_strength(candidate);

    let justification: Justification = own.belief.justification().clone().with_element(external);
    Some(own.belief.revise(candidate, justification))
}

#[async_trait]
impl ResolutionStrategy for JustificationExchange {
    fn name(&self) -> &'static str {
        "justification-exchange"
    }

    async fn resolve(
        &self,
        conflict: &EpistemicConflict,
        a: ExchangeParty<'_>,
        b: ExchangeParty<'_>,
    ) -> ConflictResolutionOutcome {
        let (s_a, s_b) = futures::join!(
            a.frame.evaluate_external_justification(
                b.belief.proposition(),
                b.belief.justification(),
                b.frame.kind(),
                a.scorer,
            ),
            b.frame.evaluate_external_justification(
                a.belief.proposition(),
                a.belief.justification(),
                a.frame.kind(),
                b.scorer,
            ),
        );

        let candidate_a = self.candidate(a.belief.confidence(), s_a);
        let candidate_b = self.candidate(b.belief.confidence(), s_b);
        let delta_a = candidate_a - a.belief.confidence();
        let delta_b = candidate_b - b.belief.confidence();

        let (resolution_type, reason) =
            self.classify((&a, candidate_a, delta_a), (&b, candidate_b, delta_b));

        debug!(
            "Exchange on {}: {} s={:.3} Δ={:+.3}, {} s={:.3} Δ={:+.3} -> {}",
            conflict.proposition(),
            a.agent,
            s_a,
            delta_a,
            b.agent,
            s_b,
            delta_b,
            resolution_type
        );

        ConflictResolutionOutcome {
            conflict_id: conflict.id.clone(),
            agent_a: a.agent.clone(),
            agent_b: b.agent.clone(),
            success: resolution_type.is_resolved(),
            resolution_type,
            reason,
            updated_belief_a: revised_belief(&a, &b, candidate_a),
            updated_belief_b: revised_belief(&b, &a, candidate_b),
            delta_a,
            delta_b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::proposition::Proposition;
    use crate::evidence::ElementKind;
    use crate::frame::{Frame, FrameKind, NeutralScorer};

    struct Side {
        agent: AgentId,
        frame: Frame,
        belief: Belief,
    }

    fn side(agent: &str, kind: FrameKind, prop: &str, confidence: f64, element: JustificationElement) -> Side {
        Side {
            agent: AgentId::new(agent),
            frame: Frame::new(kind),
            belief: Belief::new(
                Proposition::new(prop),
                confidence,
                Justification::new().with_element(element),
            ),
        }
    }

    fn party(side: &Side) -> ExchangeParty<'_> {
        ExchangeParty {
            agent: &side.agent,
            frame: &side.frame,
            belief: &side.belief,
            conflict_threshold: 0.6,
            scorer: &NeutralScorer,
        }
    }

    async fn exchange(a: &Side, b: &Side, significance: f64) -> ConflictResolutionOutcome {
        let conflict = EpistemicConflict::new(
            a.agent.clone(),
            a.belief.clone(),
            b.agent.clone(),
            b.belief.clone(),
        );
        JustificationExchange::new(significance)
            .resolve(&conflict, party(a), party(b))
            .await
    }

    fn sentiment_pair(kind_a: FrameKind, kind_b: FrameKind, strength: f64) -> (Side, Side) {
        (
            side(
                "alpha",
                kind_a,
                "SentimentIsPositive",
                0.85,
                JustificationElement::tool_result("sentiment-api", "0.91 positive").with_strength(strength),
            ),
            side(
                "beta",
                kind_b,
                "¬SentimentIsPositive",
                0.78,
                JustificationElement::observation("reader", "replies are hostile").with_strength(strength),
            ),
        )
    }

    #[tokio::test]
    async fn test_opposed_roles_persist() {
        // advocate <-> critic compatibility is 0.3, so neither side is moved much
        let (a, b) = sentiment_pair(FrameKind::Advocate, FrameKind::Critic, 0.5);
        let outcome = exchange(&a, &b, 0.1).await;

        assert_eq!(outcome.resolution_type, ResolutionType::PersistentDisagreement);
        assert!(!outcome.success);
        assert!(outcome.delta_a.abs() < 0.1);
        assert!(outcome.delta_b.abs() < 0.1);
        // s_a = 0.5 * 0.3 = 0.15 -> 0.85 * (1 - 0.5 * 0.15)
        assert!((outcome.updated_belief_a.as_ref().unwrap().confidence() - 0.78625).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_compatible_frames_converge() {
        let (a, b) = sentiment_pair(FrameKind::Security, FrameKind::Security, 0.95);
        let outcome = exchange(&a, &b, 0.1).await;

        assert_eq!(outcome.resolution_type, ResolutionType::Converged);
        assert!(outcome.success);
        assert!(outcome.reason.contains("alpha"));
        assert!(outcome.updated_belief_a.unwrap().confidence() < 0.6);
    }

    #[tokio::test]
    async fn test_partial_adjustment() {
        // compatibility 0.5: s = 0.45, both fall by more than 0.1 but stay above 0.6
        let (a, b) = sentiment_pair(FrameKind::Efficiency, FrameKind::Judge, 0.9);
        let outcome = exchange(&a, &b, 0.1).await;

        assert_eq!(outcome.resolution_type, ResolutionType::PartialAdjustment);
        assert!(!outcome.success);
        assert!((outcome.delta_a - (0.85 * 0.775 - 0.85)).abs() < 1e-9);
        assert!((outcome.delta_b - (0.78 * 0.775 - 0.78)).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_opposing_evidence_never_raises_confidence() {
        for ka in FrameKind::ALL {
            for kb in FrameKind::ALL {
                for strength in [0.0, 0.3, 0.5, 0.8, 1.0] {
                    for confidence in [0.62, 0.75, 0.9] {
                        let element = |source: &str| {
                            JustificationElement::observation(source, "measured").with_strength(strength)
                        };
                        let a = side("alpha", ka, "LaunchIsSafe", confidence, element("probe-a"));
                        let b = side("beta", kb, "¬LaunchIsSafe", confidence, element("probe-b"));
                        let outcome = exchange(&a, &b, 0.1).await;
                        assert!(outcome.delta_a <= 0.0, "{ka} vs {kb} at {strength}: {}", outcome.delta_a);
                        assert!(outcome.delta_b <= 0.0, "{kb} vs {ka} at {strength}: {}", outcome.delta_b);
                    }
                }
            }
        }
    }

    #[tokio::test]
    async fn test_weakly_compatible_side_is_not_strengthened() {
        // efficiency and judge read each other at 0.5 compatibility
        let (a, b) = (
            side(
                "alpha",
                FrameKind::Efficiency,
                "SentimentIsPositive",
                0.62,
                JustificationElement::tool_result("sentiment-api", "0.91 positive").with_strength(0.5),
            ),
            side(
                "beta",
                FrameKind::Judge,
                "¬SentimentIsPositive",
                0.62,
                JustificationElement::observation("reader", "replies are hostile").with_strength(0.5),
            ),
        );
        let outcome = exchange(&a, &b, 0.1).await;

        assert!(outcome.delta_a < 0.0);
        assert!(outcome.delta_b < 0.0);
        let b_after = outcome.updated_belief_b.unwrap().confidence();
        assert!(b_after < 0.62);
        // both fall below 0.6, so the conflict is gone on both sides
        assert_eq!(outcome.resolution_type, ResolutionType::Converged);
    }

    #[tokio::test]
    async fn test_updated_belief_wraps_other_justification() {
        let (a, b) = sentiment_pair(FrameKind::Advocate, FrameKind::Critic, 0.8);
        let outcome = exchange(&a, &b, 0.1).await;

        let updated = outcome.updated_belief_a.unwrap();
        assert_eq!(updated.proposition(), a.belief.proposition());
        assert_eq!(updated.justification().len(), 2);
        let external = &updated.justification().elements()[1];
        assert_eq!(external.kind, ElementKind::ExternalAgent);
        assert_eq!(external.source, "beta");
        assert_eq!(
            external.wrapped.as_ref().map(Justification::elements),
            Some(b.belief.justification().elements())
        );
        // s_a = 0.8 * 0.3 = 0.24 -> 0.85 * 0.88
        assert!((external.declared_strength.unwrap() - 0.748).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_repeated_exchanges_grow_linearly() {
        // weak evidence keeps both sides above threshold round after round
        let (mut a, mut b) = sentiment_pair(FrameKind::Advocate, FrameKind::Critic, 0.05);
        a.belief = a.belief.revise(0.99, a.belief.justification().clone());
        b.belief = b.belief.revise(0.99, b.belief.justification().clone());

        let rounds = 20;
        for _ in 0..rounds {
            let outcome = exchange(&a, &b, 0.1).await;
            if let Some(updated) = outcome.updated_belief_a {
                a.belief = updated;
            }
            if let Some(updated) = outcome.updated_belief_b {
                b.belief = updated;
            }
        }

        for belief in [&a.belief, &b.belief] {
            let justification = belief.justification();
            assert!(justification.len() <= rounds + 1);
            // each external element carries only the other side's single first-hand element
            assert!(justification.total_elements() <= 2 * (rounds + 1));
            for element in justification.iter().filter(|e| e.kind == ElementKind::ExternalAgent) {
                let wrapped = element.wrapped.as_ref().unwrap();
                assert_eq!(wrapped.count_of(ElementKind::ExternalAgent), 0);
            }
        }
    }

    #[tokio::test]
    async fn test_unchanged_side_has_no_update() {
        // influence 0 means nobody moves
        let (a, b) = sentiment_pair(FrameKind::Moderator, FrameKind::Moderator, 0.9);
        let conflict = EpistemicConflict::new(
            a.agent.clone(),
            a.belief.clone(),
            b.agent.clone(),
            b.belief.clone(),
        );
        let outcome = JustificationExchange::new(0.1)
            .with_influence(0.0)
            .resolve(&conflict, party(&a), party(&b))
            .await;

        assert_eq!(outcome.resolution_type, ResolutionType::PersistentDisagreement);
        assert!(outcome.updated_belief_a.is_none());
        assert!(outcome.updated_belief_b.is_none());
        assert_eq!(outcome.delta_a, 0.0);
    }

    #[tokio::test]
    async fn test_update_for_and_swap() {
        let (a, b) = sentiment_pair(FrameKind::Advocate, FrameKind::Critic, 0.8);
        let outcome = exchange(&a, &b, 0.1).await;
        let beta = AgentId::new("beta");

        let for_beta = outcome.update_for(&beta).cloned();
        assert!(for_beta.is_some());
        assert!(outcome.update_for(&AgentId::new("gamma")).is_none());

        let swapped = outcome.clone().swapped();
        assert_eq!(swapped.agent_a, beta);
        assert_eq!(swapped.updated_belief_a, for_beta);
        assert_eq!(swapped.delta_b, outcome.delta_a);
    }

    #[tokio::test]
    async fn test_confidences_stay_in_range() {
        for ka in FrameKind::ALL {
            for kb in FrameKind::ALL {
                let (a, b) = sentiment_pair(ka, kb, 1.0);
                let outcome = exchange(&a, &b, 0.1).await;
                for belief in [&outcome.updated_belief_a, &outcome.updated_belief_b].into_iter().flatten() {
                    assert!((0.0..=1.0).contains(&belief.confidence()));
                }
            }
        }
    }

    #[test]
    fn test_resolution_type_strings() {
        assert_eq!(ResolutionType::PartialAdjustment.to_string(), "partial-adjustment");
        assert!(ResolutionType::Converged.is_resolved());
        assert!(!ResolutionType::PersistentDisagreement.is_resolved());
    }
}
