//! Conflict resolution configuration from TOML (`[resolution]` section)

use crate::config::validation::{ConfigIssue, ConfigIssueCode};
use doxa_application::NegotiationParams;
use doxa_domain::conflict::{DEFAULT_INFLUENCE, DEFAULT_SIGNIFICANCE};
use doxa_domain::{FrameKind, JustificationExchange};
use serde::{Deserialize, Serialize};

/// Raw resolution configuration from TOML
///
/// # Example
///
/// ```toml
/// [resolution]
/// significance = 0.1          # smallest confidence move that counts as progress
/// influence = 0.5             # weight of the other side's evidence per round
/// max_rounds = 3
/// stop_on_persistent = true
/// escalate = true
/// arbiter = "judge"
/// arbitration_margin = 0.05
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileResolutionConfig {
    pub significance: f64,
    pub influence: f64,
    pub max_rounds: usize,
    pub stop_on_persistent: bool,
    pub escalate: bool,
    pub arbiter: String,
    pub arbitration_margin: f64,
}

impl Default for FileResolutionConfig {
    fn default() -> Self {
        let params = NegotiationParams::default();
        Self {
            significance: DEFAULT_SIGNIFICANCE,
            influence: DEFAULT_INFLUENCE,
            max_rounds: params.max_rounds,
            stop_on_persistent: params.stop_on_persistent,
            escalate: params.escalate,
            arbiter: params.arbiter,
            arbitration_margin: params.arbitration_margin,
        }
    }
}

impl FileResolutionConfig {
    /// Exchange parameters, clamped into range.
    pub fn exchange(&self) -> JustificationExchange {
        JustificationExchange::new(self.significance).with_influence(self.influence)
    }

    /// Parse the arbiter frame, falling back to `judge` with a warning.
    pub fn parse_arbiter(&self) -> (FrameKind, Vec<ConfigIssue>) {
        match self.arbiter.parse::<FrameKind>() {
            Ok(kind) => (kind, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "resolution.arbiter".to_string(),
                        value: self.arbiter.clone(),
                        valid_values: FrameKind::ALL.iter().map(|k| k.as_str().to_string()).collect(),
                    },
                    format!(
                        "resolution.arbiter: unknown frame '{}', falling back to 'judge'",
                        self.arbiter
                    ),
                );
                (FrameKind::Judge, vec![issue])
            }
        }
    }

    pub fn negotiation_params(&self) -> NegotiationParams {
        NegotiationParams::default()
            .with_max_rounds(self.max_rounds)
            .with_stop_on_persistent(self.stop_on_persistent)
            .with_escalation(self.escalate)
            .with_arbiter(self.parse_arbiter().0.as_str())
            .with_arbitration_margin(self.arbitration_margin)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(ConfigIssue::unit_range("resolution.significance", self.significance));
        issues.extend(ConfigIssue::unit_range("resolution.influence", self.influence));
        issues.extend(ConfigIssue::unit_range(
            "resolution.arbitration_margin",
            self.arbitration_margin,
        ));
        issues.extend(self.parse_arbiter().1);
        if self.max_rounds == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "resolution.max_rounds".to_string(),
                    value: 0.0,
                },
                "resolution.max_rounds must be at least 1",
            ));
        }
        issues
    }
}
