//! Evidence scorer configuration from TOML (`[scorer]` section)

use crate::config::validation::{ConfigIssue, ConfigIssueCode};
use crate::scoring::{ScorerKind, ScorerSettings};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw scorer configuration from TOML
///
/// # Example
///
/// ```toml
/// [scorer]
/// kind = "http"                            # "heuristic" or "http"
/// endpoint = "http://localhost:8080/v1"    # required for "http"
/// timeout_ms = 2000
/// retries = 1
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileScorerConfig {
    pub kind: String,
    pub endpoint: Option<String>,
    pub timeout_ms: u64,
    pub retries: u32,
}

impl Default for FileScorerConfig {
    fn default() -> Self {
        let settings = ScorerSettings::default();
        Self {
            kind: settings.kind.as_str().to_string(),
            endpoint: None,
            timeout_ms: settings.timeout.as_millis() as u64,
            retries: settings.retries,
        }
    }
}

impl FileScorerConfig {
    /// Parse the scorer kind, falling back to `heuristic` with a warning.
    pub fn parse_kind(&self) -> (ScorerKind, Vec<ConfigIssue>) {
        match self.kind.parse::<ScorerKind>() {
            Ok(kind) => (kind, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "scorer.kind".to_string(),
                        value: self.kind.clone(),
                        valid_values: vec!["heuristic".to_string(), "http".to_string()],
                    },
                    format!(
                        "scorer.kind: unknown value '{}', falling back to 'heuristic'",
                        self.kind
                    ),
                );
                (ScorerKind::Heuristic, vec![issue])
            }
        }
    }

    pub fn settings(&self) -> ScorerSettings {
        ScorerSettings {
            kind: self.parse_kind().0,
            endpoint: self.endpoint.clone(),
            timeout: Duration::from_millis(self.timeout_ms.max(1)),
            retries: self.retries,
        }
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let (kind, mut issues) = self.parse_kind();
        if kind == ScorerKind::Http && self.endpoint.as_deref().is_none_or(|e| e.trim().is_empty()) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingValue {
                    field: "scorer.endpoint".to_string(),
                },
                "scorer.endpoint is required when scorer.kind = \"http\"",
            ));
        }
        if self.timeout_ms == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "scorer.timeout_ms".to_string(),
                    value: 0.0,
                },
                "scorer.timeout_ms is 0, using 1ms",
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileScorerConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.settings(), ScorerSettings::default());
    }

    #[test]
    fn test_http_requires_endpoint() {
        let config = FileScorerConfig {
            kind: "http".to_string(),
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());

        let config = FileScorerConfig {
            endpoint: Some("http://localhost:8080".to_string()),
            ..config
        };
        assert!(config.validate().is_empty());
        assert_eq!(config.settings().kind, ScorerKind::Http);
    }

    #[test]
    fn test_unknown_kind_falls_back() {
        let config = FileScorerConfig {
            kind: "oracle".to_string(),
            timeout_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.validate().len(), 2);
        let settings = config.settings();
        assert_eq!(settings.kind, ScorerKind::Heuristic);
        assert_eq!(settings.timeout, Duration::from_millis(1));
    }
}
