//! Plain-data frame parameters and the per-variant presets.

use super::kind::FrameKind;
use crate::belief::confidence::clamp_confidence;
use crate::core::error::DomainError;
use crate::evidence::{ElementKind, JustificationElement};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Default weight of [`FrameParameters::recompute_blend`].
pub const DEFAULT_RECOMPUTE_BLEND: f64 = 0.5;

/// How a frame decides the weight of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    /// Tag weights, then kind weights, then the default weight
    #[default]
    Parametric,
    /// Ask the evidence scorer for a saliency score per element
    Saliency,
}

impl Weighting {
    pub fn as_str(&self) -> &'static str {
        match self {
            Weighting::Parametric => "parametric",
            Weighting::Saliency => "saliency",
        }
    }
}

impl fmt::Display for Weighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Weighting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "parametric" | "weights" => Ok(Weighting::Parametric),
            "saliency" | "scorer" => Ok(Weighting::Saliency),
            _ => Err(format!("Invalid weighting: {}", s)),
        }
    }
}

/// The fixed directional adjustment a frame applies when updating.
///
/// Strength inversion happens per element (`s' = 1 - s`); scale and offset
/// are applied once to the blended confidence, which is then clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalBias {
    pub invert_strength: bool,
    pub scale: f64,
    pub offset: f64,
}

impl Default for DirectionalBias {
    fn default() -> Self {
        Self::NONE
    }
}

impl DirectionalBias {
    pub const NONE: DirectionalBias = DirectionalBias {
        invert_strength: false,
        scale: 1.0,
        offset: 0.0,
    };

    pub fn scaled(scale: f64) -> Self {
        Self {
            scale,
            ..Self::NONE
        }
    }

    pub fn inverted(mut self) -> Self {
        self.invert_strength = true;
        self
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::NONE
    }

    pub fn apply_strength(&self, strength: f64) -> f64 {
        if self.invert_strength {
            1.0 - strength
        } else {
            strength
        }
    }

    pub fn apply_confidence(&self, confidence: f64) -> f64 {
        clamp_confidence(confidence * self.scale + self.offset)
    }
}

/// Everything that distinguishes one frame variant from another, as data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameParameters {
    /// Weights keyed by lowercase tag; the highest matching tag wins
    pub tag_weights: BTreeMap<String, f64>,
    /// Weights keyed by element kind, used when no tag matches
    pub kind_weights: BTreeMap<ElementKind, f64>,
    /// Weight for elements matching neither table
    pub default_weight: f64,
    pub bias: DirectionalBias,
    /// Share of the fresh weighted average when recomputing after a frame switch
    pub recompute_blend: f64,
    pub weighting: Weighting,
    /// Ask the scorer to reinterpret perceptions before processing
    pub delegate_interpretation: bool,
}

impl Default for FrameParameters {
    fn default() -> Self {
        Self {
            tag_weights: BTreeMap::new(),
            kind_weights: BTreeMap::new(),
            default_weight: 0.5,
            bias: DirectionalBias::NONE,
            recompute_blend: DEFAULT_RECOMPUTE_BLEND,
            weighting: Weighting::Parametric,
            delegate_interpretation: false,
        }
    }
}

impl FrameParameters {
    /// The built-in parameters of a frame variant.
    pub fn preset(kind: FrameKind) -> Self {
        use ElementKind::*;

        let base = Self::default();
        match kind {
            FrameKind::Efficiency => base
                .with_tag_weight("performance", 0.85)
                .with_tag_weight("latency", 0.85)
                .with_tag_weight("efficiency", 0.85)
                .with_default_weight(0.15),
            FrameKind::Thoroughness => base
                .with_kind_weight(ToolResult, 0.6)
                .with_kind_weight(Observation, 0.6)
                .with_kind_weight(Inference, 0.5)
                .with_kind_weight(Testimony, 0.45)
                .with_kind_weight(ExternalAgent, 0.5)
                .with_tag_weight("completeness", 0.7)
                .with_tag_weight("coverage", 0.7)
                .with_default_weight(0.5),
            FrameKind::Security => base
                .with_kind_weight(Observation, 0.85)
                .with_kind_weight(ToolResult, 0.8)
                .with_kind_weight(Testimony, 0.2)
                .with_kind_weight(Inference, 0.4)
                .with_kind_weight(ExternalAgent, 0.3)
                .with_tag_weight("security", 0.9)
                .with_tag_weight("risk", 0.9)
                .with_default_weight(0.3),
            FrameKind::Moderator => base.with_default_weight(0.5),
            FrameKind::Advocate => base
                .with_kind_weight(Inference, 0.7)
                .with_kind_weight(Testimony, 0.6)
                .with_default_weight(0.4)
                .with_bias(DirectionalBias::scaled(1.1)),
            FrameKind::Critic => base
                .with_kind_weight(Observation, 0.7)
                .with_kind_weight(ToolResult, 0.7)
                .with_default_weight(0.4)
                .with_bias(DirectionalBias::scaled(0.9).inverted()),
            FrameKind::Judge => base
                .with_kind_weight(ToolResult, 0.8)
                .with_kind_weight(Observation, 0.8)
                .with_kind_weight(Inference, 0.6)
                .with_kind_weight(Testimony, 0.3)
                .with_kind_weight(ExternalAgent, 0.4)
                .with_default_weight(0.4),
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_tag_weight(mut self, tag: impl Into<String>, weight: f64) -> Self {
        self.tag_weights.insert(tag.into().to_lowercase(), weight);
        self
    }

    pub fn with_kind_weight(mut self, kind: ElementKind, weight: f64) -> Self {
        self.kind_weights.insert(kind, weight);
        self
    }

    pub fn with_default_weight(mut self, weight: f64) -> Self {
        self.default_weight = weight;
        self
    }

    pub fn with_bias(mut self, bias: DirectionalBias) -> Self {
        self.bias = bias;
        self
    }

    pub fn with_recompute_blend(mut self, blend: f64) -> Self {
        self.recompute_blend = blend;
        self
    }

    pub fn with_weighting(mut self, weighting: Weighting) -> Self {
        self.weighting = weighting;
        self
    }

    pub fn with_delegate_interpretation(mut self, delegate: bool) -> Self {
        self.delegate_interpretation = delegate;
        self
    }

    // ==================== Queries ====================

    /// Parametric weight of an element: the maximum weight among its matching
    /// tags, else its kind weight, else the default weight.
    pub fn weight_for(&self, element: &JustificationElement) -> f64 {
        let tag_weight = element
            .tags
            .iter()
            .filter_map(|tag| self.tag_weights.get(tag))
            .copied()
            .fold(None, |best: Option<f64>, w| Some(best.map_or(w, |b| b.max(w))));

        tag_weight
            .or_else(|| self.kind_weights.get(&element.kind).copied())
            .unwrap_or(self.default_weight)
    }

    /// Reject weights outside [0, 1] and non-finite bias values.
    pub fn validate(&self) -> Result<(), DomainError> {
        fn unit(name: String, value: f64) -> Result<(), DomainError> {
            if value.is_finite() && (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(DomainError::invalid_parameter(name, value, "must be within [0, 1]"))
            }
        }

        for (tag, weight) in &self.tag_weights {
            unit(format!("tag_weights.{}", tag), *weight)?;
        }
        for (kind, weight) in &self.kind_weights {
            unit(format!("kind_weights.{}", kind), *weight)?;
        }
        unit("default_weight".to_string(), self.default_weight)?;
        unit("recompute_blend".to_string(), self.recompute_blend)?;

        if !self.bias.scale.is_finite() || self.bias.scale < 0.0 {
            return Err(DomainError::invalid_parameter(
                "bias.scale",
                self.bias.scale,
                "must be finite and non-negative",
            ));
        }
        if !self.bias.offset.is_finite() || !(-1.0..=1.0).contains(&self.bias.offset) {
            return Err(DomainError::invalid_parameter(
                "bias.offset",
                self.bias.offset,
                "must be within [-1, 1]",
            ));
        }
        Ok(())
    }
}
