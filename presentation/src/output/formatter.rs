//! Output formatter trait

use crate::cli::commands::OutputFormat;
use crate::output::console::ConsoleFormatter;
use crate::output::report::ScenarioReport;

/// Trait for rendering scenario reports
pub trait ReportFormatter {
    fn format(&self, report: &ScenarioReport) -> String;
}

/// Pretty-printed JSON, for piping into other tools
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &ScenarioReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }
}

/// The formatter for the requested output format.
pub fn formatter_for(format: OutputFormat) -> Box<dyn ReportFormatter> {
    match format {
        OutputFormat::Text => Box::new(ConsoleFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::report::AgentSummary;
    use doxa_domain::AgentId;

    fn empty_conflict_report() -> ScenarioReport {
        ScenarioReport::Conflict {
            conflicts: vec![],
            outcomes: vec![],
            agents: vec![AgentSummary {
                agent: AgentId::new("alpha"),
                frame: "efficiency".to_string(),
                beliefs: vec![],
                plan: None,
            }],
        }
    }

    #[test]
    fn test_json_formatter_emits_valid_json() {
        let output = formatter_for(OutputFormat::Json).format(&empty_conflict_report());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["scenario"], "conflict");
        assert_eq!(value["agents"][0]["agent"], "alpha");
    }

    #[test]
    fn test_text_formatter_mentions_agents() {
        let output = formatter_for(OutputFormat::Text).format(&empty_conflict_report());
        assert!(output.contains("alpha"));
        assert!(output.contains("No conflicts detected"));
    }
}
