//! Keyword-based evidence scorer.
//!
//! Deterministic and offline: strength comes from the element kind, the
//! overlap between the element's text and the proposition's words, and a
//! small table of polarity cues. Saliency and interpretation use per-frame
//! keyword lists. Propositions are extracted from CamelCase identifiers in
//! the stimulus text, optionally prefixed with `¬` or `NOT`.

use async_trait::async_trait;
use doxa_domain::core::proposition::NEGATION_MARKER;
use doxa_domain::{
    ElementKind, EvidenceScorer, FrameKind, FrameRef, JustificationElement, Perception,
    Proposition, ScorerError, Stimulus,
};
use std::collections::HashSet;

const POSITIVE_CUES: &[&str] = &[
    "pass", "passed", "green", "positive", "success", "fast", "confirmed", "stable", "good",
];
const NEGATIVE_CUES: &[&str] = &[
    "fail", "failed", "red", "negative", "error", "slow", "timeout", "timeouts", "hostile",
    "broken", "bad",
];

const OVERLAP_BONUS: f64 = 0.15;
const POLARITY_STEP: f64 = 0.1;

/// Keywords that make an element salient to each frame, and the tag the
/// frame attaches when interpreting it.
fn frame_vocabulary(kind: FrameKind) -> Option<(&'static str, &'static [&'static str])> {
    match kind {
        FrameKind::Efficiency => Some((
            "performance",
            &["latency", "throughput", "fast", "slow", "ms", "p99", "benchmark", "cpu"],
        )),
        FrameKind::Security => Some((
            "security",
            &["auth", "vulnerability", "leak", "exploit", "attack", "cve", "token", "risk"],
        )),
        FrameKind::Thoroughness => Some((
            "coverage",
            &["coverage", "test", "tests", "edge", "complete", "review", "audit"],
        )),
        FrameKind::Moderator | FrameKind::Advocate | FrameKind::Critic | FrameKind::Judge => None,
    }
}

/// Prior strength by element kind.
fn kind_prior(kind: ElementKind) -> f64 {
    match kind {
        ElementKind::ToolResult => 0.75,
        ElementKind::Observation => 0.7,
        ElementKind::Inference => 0.6,
        ElementKind::Testimony => 0.55,
        ElementKind::ExternalAgent => 0.5,
    }
}

/// Lowercase words of `text`, split on anything that is not alphanumeric.
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// `SentimentIsPositive` → `["sentiment", "is", "positive"]`.
fn camel_words(identifier: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for c in identifier.chars() {
        if c.is_uppercase() && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        if c.is_alphanumeric() {
            current.extend(c.to_lowercase());
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn is_camel_case(token: &str) -> bool {
    let mut chars = token.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_uppercase()
        && token.chars().all(char::is_alphanumeric)
        && token.chars().any(char::is_lowercase)
        && token.chars().skip(1).any(char::is_uppercase)
}

/// Offline scorer driven by keyword tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEvidenceScorer;

impl HeuristicEvidenceScorer {
    pub fn new() -> Self {
        Self
    }

    fn element_text(element: &JustificationElement) -> Vec<String> {
        let mut text = words(&element.content);
        text.extend(words(&element.source));
        text
    }

    /// Strength of `element` for `proposition`, without I/O.
    pub fn strength(&self, element: &JustificationElement, proposition: &Proposition) -> f64 {
        let text = Self::element_text(element);
        let vocabulary: HashSet<&str> = text.iter().map(String::as_str).collect();

        let claim = camel_words(proposition.base().as_str());
        let overlap = if claim.is_empty() {
            0.0
        } else {
            claim.iter().filter(|w| vocabulary.contains(w.as_str())).count() as f64
                / claim.len() as f64
        };

        let positive = text.iter().filter(|w| POSITIVE_CUES.contains(&w.as_str())).count() as i64;
        let negative = text.iter().filter(|w| NEGATIVE_CUES.contains(&w.as_str())).count() as i64;
        let mut polarity = (positive - negative).signum() as f64;
        if proposition.is_negated() {
            polarity = -polarity;
        }

        (kind_prior(element.kind) + OVERLAP_BONUS * overlap + POLARITY_STEP * polarity)
            .clamp(0.0, 1.0)
    }

    /// Saliency of `element` to a frame of `kind`, without I/O.
    pub fn saliency(&self, element: &JustificationElement, kind: FrameKind) -> f64 {
        let Some((tag, keywords)) = frame_vocabulary(kind) else {
            return 0.5;
        };
        if element.has_tag(tag) {
            return 0.9;
        }
        let hits = Self::element_text(element)
            .iter()
            .filter(|w| keywords.contains(&w.as_str()))
            .count();
        0.3 + 0.3 * hits.min(2) as f64
    }

    /// CamelCase propositions named in `text`, in first-seen order.
    pub fn extract(&self, text: &str) -> Vec<Proposition> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut negate_next = false;

        for raw in text.split(|c: char| c.is_whitespace() || ",.;:!?()[]\"'".contains(c)) {
            if raw.is_empty() {
                continue;
            }
            if raw == "NOT" {
                negate_next = true;
                continue;
            }
            let (negated, token) = match raw.strip_prefix(NEGATION_MARKER) {
                Some(rest) => (true, rest),
                None => (false, raw),
            };
            if is_camel_case(token) {
                let base = Proposition::new(token);
                let proposition = if negated ^ negate_next { base.negate() } else { base };
                if seen.insert(proposition.clone()) {
                    out.push(proposition);
                }
            }
            negate_next = false;
        }
        out
    }

    /// Tag every element that mentions the frame's keywords with the frame's
    /// emphasis tag.
    pub fn tag_for_frame(&self, perception: &Perception, kind: FrameKind) -> Perception {
        let mut interpreted = perception.clone();
        let Some((tag, _)) = frame_vocabulary(kind) else {
            return interpreted;
        };
        for element in &mut interpreted.elements {
            if !element.has_tag(tag) && self.saliency(element, kind) > 0.5 {
                element.tags.insert(tag.to_string());
            }
        }
        interpreted
    }
}

#[async_trait]
impl EvidenceScorer for HeuristicEvidenceScorer {
    async fn score_strength(
        &self,
        element: &JustificationElement,
        proposition: &Proposition,
    ) -> Result<f64, ScorerError> {
        Ok(self.strength(element, proposition))
    }

    async fn score_saliency(
        &self,
        element: &JustificationElement,
        frame: FrameRef<'_>,
    ) -> Result<f64, ScorerError> {
        Ok(self.saliency(element, frame.kind))
    }

    async fn extract_propositions(
        &self,
        stimulus: Stimulus<'_>,
        _frame: FrameRef<'_>,
    ) -> Result<Vec<Proposition>, ScorerError> {
        Ok(self.extract(stimulus.text()))
    }

    async fn interpret(
        &self,
        perception: &Perception,
        frame: FrameRef<'_>,
    ) -> Result<Perception, ScorerError> {
        Ok(self.tag_for_frame(perception, frame.kind))
    }
}
