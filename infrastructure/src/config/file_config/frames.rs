//! Frame parameter overrides from TOML (`[frames.<name>]` tables)

use crate::config::ConfigValidationError;
use doxa_domain::{DirectionalBias, ElementKind, Frame, FrameKind, FrameStrategy, Weighting};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw directional bias from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBiasConfig {
    pub invert_strength: bool,
    pub scale: f64,
    pub offset: f64,
}

impl Default for FileBiasConfig {
    fn default() -> Self {
        let none = DirectionalBias::NONE;
        Self {
            invert_strength: none.invert_strength,
            scale: none.scale,
            offset: none.offset,
        }
    }
}

impl From<&FileBiasConfig> for DirectionalBias {
    fn from(config: &FileBiasConfig) -> Self {
        DirectionalBias {
            invert_strength: config.invert_strength,
            scale: config.scale,
            offset: config.offset,
        }
    }
}

/// Overrides for one frame's preset parameters
///
/// Maps merge into the preset; scalar fields replace it when present.
///
/// # Example
///
/// ```toml
/// [frames.security]
/// default_weight = 0.25
/// weighting = "saliency"
/// tag_weights = { compliance = 0.9 }
/// kind_weights = { testimony = 0.1 }
/// compatibility = { efficiency = 0.2 }
///
/// [frames.critic.bias]
/// invert_strength = true
/// scale = 0.8
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileFrameConfig {
    pub tag_weights: BTreeMap<String, f64>,
    pub kind_weights: BTreeMap<String, f64>,
    pub default_weight: Option<f64>,
    pub recompute_blend: Option<f64>,
    pub weighting: Option<String>,
    pub delegate_interpretation: Option<bool>,
    pub bias: Option<FileBiasConfig>,
    /// Compatibility row overrides keyed by frame name
    pub compatibility: BTreeMap<String, f64>,
}

impl FileFrameConfig {
    /// Apply these overrides to `frame`, validating the result.
    pub fn apply(&self, frame: Frame) -> Result<Frame, ConfigValidationError> {
        let name = frame.name().to_string();
        let invalid = |source| ConfigValidationError::InvalidFrame {
            name: name.clone(),
            source,
        };

        let mut parameters = frame.parameters().clone();
        for (tag, weight) in &self.tag_weights {
            parameters.tag_weights.insert(tag.clone(), *weight);
        }
        for (kind, weight) in &self.kind_weights {
            let kind: ElementKind = kind.parse().map_err(invalid)?;
            parameters.kind_weights.insert(kind, *weight);
        }
        if let Some(weight) = self.default_weight {
            parameters.default_weight = weight;
        }
        if let Some(blend) = self.recompute_blend {
            parameters.recompute_blend = blend;
        }
        if let Some(weighting) = &self.weighting {
            parameters.weighting = weighting.parse::<Weighting>().map_err(|_| {
                ConfigValidationError::InvalidWeighting {
                    name: name.clone(),
                    value: weighting.clone(),
                }
            })?;
        }
        if let Some(delegate) = self.delegate_interpretation {
            parameters.delegate_interpretation = delegate;
        }
        if let Some(bias) = &self.bias {
            parameters.bias = bias.into();
        }

        let mut frame = frame.with_parameters(parameters).map_err(invalid)?;
        for (other, value) in &self.compatibility {
            let other: FrameKind = other.parse().map_err(invalid)?;
            frame = frame.with_compatibility(other, *value).map_err(invalid)?;
        }
        Ok(frame)
    }
}
