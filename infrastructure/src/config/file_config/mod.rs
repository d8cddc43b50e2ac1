//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application settings
//! and domain frames on demand.

mod agent;
mod frames;
mod logging;
mod resolution;
mod scorer;

pub use agent::FileAgentConfig;
pub use frames::{FileBiasConfig, FileFrameConfig};
pub use logging::FileLoggingConfig;
pub use resolution::FileResolutionConfig;
pub use scorer::FileScorerConfig;

use super::validation::{ConfigIssue, ConfigIssueCode};
use crate::scoring::ScorerSettings;
use doxa_application::{AgentSettings, NegotiationParams};
use doxa_domain::{DomainError, Frame, FrameKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Configuration errors that prevent building a frame
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("Unknown frame '{0}'")]
    UnknownFrame(String),

    #[error("Invalid overrides for frame '{name}': {source}")]
    InvalidFrame {
        name: String,
        #[source]
        source: DomainError,
    },

    #[error("Invalid weighting '{value}' for frame '{name}' (expected parametric or saliency)")]
    InvalidWeighting { name: String, value: String },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Agent thresholds and default frame
    pub agent: FileAgentConfig,
    /// Justification exchange and negotiation
    pub resolution: FileResolutionConfig,
    /// Evidence scorer backend
    pub scorer: FileScorerConfig,
    /// Event log output
    pub logging: FileLoggingConfig,
    /// Per-frame parameter overrides, keyed by frame name or alias
    pub frames: BTreeMap<String, FileFrameConfig>,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Invalid enum values and out-of-range numbers are warnings (a fallback
    /// is used); unknown or invalid frame overrides and settings that cannot
    /// work at all are errors.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.agent.validate());
        issues.extend(self.resolution.validate());
        issues.extend(self.scorer.validate());

        for (name, overrides) in &self.frames {
            let Ok(kind) = name.parse::<FrameKind>() else {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::UnknownFrame { name: name.clone() },
                    format!("[frames.{}]: no frame is registered under this name", name),
                ));
                continue;
            };
            if let Err(e) = overrides.apply(Frame::new(kind)) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidFrameOverride { name: name.clone() },
                    format!("[frames.{}]: {}", name, e),
                ));
            }
        }

        issues
    }

    /// Settings for agents created from this configuration.
    pub fn agent_settings(&self) -> AgentSettings {
        let exchange = self.resolution.exchange();
        AgentSettings::default()
            .with_thresholds(self.agent.thresholds().0)
            .with_context_capacity(self.agent.context_capacity)
            .with_significance(exchange.significance)
            .with_influence(exchange.influence)
    }

    pub fn negotiation_params(&self) -> NegotiationParams {
        self.resolution.negotiation_params()
    }

    pub fn scorer_settings(&self) -> ScorerSettings {
        self.scorer.settings()
    }

    /// The registered frame `name` with every matching override applied.
    pub fn frame(&self, name: &str) -> Result<Frame, ConfigValidationError> {
        let kind: FrameKind = name
            .parse()
            .map_err(|_| ConfigValidationError::UnknownFrame(name.to_string()))?;
        self.frame_of(kind)
    }

    /// The configured default frame (`agent.frame`).
    pub fn default_frame(&self) -> Result<Frame, ConfigValidationError> {
        self.frame_of(self.agent.parse_frame().0)
    }

    fn frame_of(&self, kind: FrameKind) -> Result<Frame, ConfigValidationError> {
        self.frames
            .iter()
            .filter(|(key, _)| key.parse::<FrameKind>().ok() == Some(kind))
            .try_fold(Frame::new(kind), |frame, (_, overrides)| overrides.apply(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doxa_domain::FrameStrategy;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[agent]
frame = "security"
conflict = 0.65
context_capacity = 8

[resolution]
significance = 0.05
influence = 0.3
max_rounds = 5
arbiter = "moderator"

[scorer]
kind = "heuristic"
timeout_ms = 500

[logging]
events = "events.jsonl"

[frames.security]
default_weight = 0.25

[frames.critic.bias]
invert_strength = true
scale = 0.8
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_empty());

        let settings = config.agent_settings();
        assert_eq!(settings.thresholds.conflict, 0.65);
        assert_eq!(settings.context_capacity, 8);
        assert_eq!(settings.exchange.significance, 0.05);
        assert_eq!(settings.exchange.influence, 0.3);

        let params = config.negotiation_params();
        assert_eq!(params.max_rounds, 5);
        assert_eq!(params.arbiter, "moderator");
        assert_eq!(config.scorer_settings().timeout.as_millis(), 500);

        let frame = config.default_frame().unwrap();
        assert_eq!(frame.kind(), FrameKind::Security);
        assert_eq!(frame.parameters().default_weight, 0.25);
        assert_eq!(config.frame("critic").unwrap().parameters().bias.scale, 0.8);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: FileConfig = toml::from_str("[resolution]\ninfluence = 0.4\n").unwrap();
        assert_eq!(config.agent, FileAgentConfig::default());
        assert_eq!(config.resolution.influence, 0.4);
        assert_eq!(config.resolution.max_rounds, 3);
        assert!(config.frames.is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.default_frame().unwrap().kind(), FrameKind::Moderator);
        assert_eq!(config.agent_settings(), AgentSettings::default());
    }

    #[test]
    fn test_frame_overrides_match_aliases() {
        let config: FileConfig =
            toml::from_str("[frames.performance]\ndefault_weight = 0.3\n").unwrap();
        let frame = config.frame("efficiency").unwrap();
        assert_eq!(frame.parameters().default_weight, 0.3);
        // other frames untouched
        assert_eq!(
            config.frame("judge").unwrap().parameters(),
            Frame::new(FrameKind::Judge).parameters()
        );
    }

    #[test]
    fn test_unknown_frame_is_an_error() {
        let config: FileConfig =
            toml::from_str("[frames.optimism]\ndefault_weight = 0.3\n").unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
        assert_eq!(
            issues[0].code,
            ConfigIssueCode::UnknownFrame {
                name: "optimism".to_string()
            }
        );

        let err = config.frame("optimism").unwrap_err();
        assert!(matches!(err, ConfigValidationError::UnknownFrame(_)));
    }

    #[test]
    fn test_invalid_frame_override_is_an_error() {
        let config: FileConfig =
            toml::from_str("[frames.judge]\nrecompute_blend = 2.0\n").unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(matches!(
            issues[0].code,
            ConfigIssueCode::InvalidFrameOverride { .. }
        ));
        assert!(config.frame("judge").is_err());
    }
}
