//! Agent configuration from TOML (`[agent]` section)

use crate::config::validation::{ConfigIssue, ConfigIssueCode};
use doxa_application::config::DEFAULT_CONTEXT_CAPACITY;
use doxa_domain::{ConfidenceThresholds, FrameKind};
use serde::{Deserialize, Serialize};

/// Raw agent configuration from TOML
///
/// # Example
///
/// ```toml
/// [agent]
/// frame = "security"          # any registered frame name or alias
/// action = 0.7                # thresholds, all inclusive
/// conflict = 0.6
/// communication = 0.5
/// retention = 0.1
/// context_capacity = 32
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    /// Default frame for agents the CLI creates
    pub frame: String,
    pub action: f64,
    pub conflict: f64,
    pub communication: f64,
    pub retention: f64,
    /// Working context entries kept per agent
    pub context_capacity: usize,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        let thresholds = ConfidenceThresholds::default();
        Self {
            frame: FrameKind::Moderator.as_str().to_string(),
            action: thresholds.action,
            conflict: thresholds.conflict,
            communication: thresholds.communication,
            retention: thresholds.retention,
            context_capacity: DEFAULT_CONTEXT_CAPACITY,
        }
    }
}

impl FileAgentConfig {
    /// Parse the default frame, falling back to `moderator` with a warning.
    pub fn parse_frame(&self) -> (FrameKind, Vec<ConfigIssue>) {
        match self.frame.parse::<FrameKind>() {
            Ok(kind) => (kind, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "agent.frame".to_string(),
                        value: self.frame.clone(),
                        valid_values: FrameKind::ALL.iter().map(|k| k.as_str().to_string()).collect(),
                    },
                    format!(
                        "agent.frame: unknown frame '{}', falling back to 'moderator'",
                        self.frame
                    ),
                );
                (FrameKind::Moderator, vec![issue])
            }
        }
    }

    /// Thresholds clamped into [0, 1], with a warning per clamped value.
    pub fn thresholds(&self) -> (ConfidenceThresholds, Vec<ConfigIssue>) {
        let issues = [
            ("agent.action", self.action),
            ("agent.conflict", self.conflict),
            ("agent.communication", self.communication),
            ("agent.retention", self.retention),
        ]
        .into_iter()
        .filter_map(|(field, value)| ConfigIssue::unit_range(field, value))
        .collect();

        let thresholds = ConfidenceThresholds {
            action: self.action,
            conflict: self.conflict,
            communication: self.communication,
            retention: self.retention,
        }
        .clamped();
        (thresholds, issues)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.parse_frame().1;
        issues.extend(self.thresholds().1);
        if self.context_capacity == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "agent.context_capacity".to_string(),
                    value: 0.0,
                },
                "agent.context_capacity is 0, perception context will not be kept",
            ));
        }
        issues
    }
}
