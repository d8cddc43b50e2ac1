//! Console output formatter for scenario reports

use crate::output::formatter::ReportFormatter;
use crate::output::report::{AgentSummary, FrameStep, ScenarioReport};
use colored::Colorize;
use doxa_application::NegotiationReport;
use doxa_domain::{
    ArbitrationVerdict, Belief, ConflictResolutionOutcome, EpistemicConflict, PlanningOutcome,
    ResolutionType,
};

/// Formats scenario reports for console display
pub struct ConsoleFormatter;

impl ReportFormatter for ConsoleFormatter {
    fn format(&self, report: &ScenarioReport) -> String {
        Self::format_report(report)
    }
}

impl ConsoleFormatter {
    /// Format a complete scenario report
    pub fn format_report(report: &ScenarioReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&format!("doxa: {}", report.name())));
        output.push('\n');

        match report {
            ScenarioReport::Conflict {
                conflicts,
                outcomes,
                agents,
            } => {
                output.push_str(&Self::section_header("Conflicts"));
                output.push_str(&Self::format_conflicts(conflicts));

                if !outcomes.is_empty() {
                    output.push_str(&Self::section_header("Justification Exchange"));
                    for outcome in outcomes {
                        output.push_str(&Self::format_outcome(outcome));
                    }
                }

                output.push_str(&Self::section_header("Final Beliefs"));
                for agent in agents {
                    output.push_str(&Self::format_agent(agent));
                }
            }
            ScenarioReport::Debate {
                negotiation,
                agents,
            } => {
                output.push_str(&Self::format_negotiation(negotiation));

                output.push_str(&Self::section_header("Final Beliefs"));
                for agent in agents {
                    output.push_str(&Self::format_agent(agent));
                }
            }
            ScenarioReport::FrameSwitch {
                initial,
                steps,
                r#final,
            } => {
                output.push_str(&Self::section_header("Initial Beliefs"));
                output.push_str(&Self::format_agent(initial));

                output.push_str(&Self::section_header("Frame Switches"));
                for step in steps {
                    output.push_str(&Self::format_step(step));
                }

                output.push_str(&Self::section_header("Final Beliefs"));
                output.push_str(&Self::format_agent(r#final));
            }
        }

        let status = if report.is_settled() {
            "All conflicts resolved".green().bold()
        } else {
            "Disagreement remains".yellow().bold()
        };
        output.push_str(&format!("\n{}\n", status));
        output.push_str(&Self::footer());

        output
    }

    /// Format the rounds, remaining conflicts, and verdicts of a negotiation
    pub fn format_negotiation(report: &NegotiationReport) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {} vs {}\n",
            "Parties:".cyan().bold(),
            report.agent_a,
            report.agent_b
        ));

        for round in &report.rounds {
            output.push_str(&Self::section_header(&format!("Round {}", round.index)));
            if round.outcomes.is_empty() && round.failures.is_empty() {
                output.push_str("  (no conflicts)\n");
            }
            for outcome in &round.outcomes {
                output.push_str(&Self::format_outcome(outcome));
            }
            for (conflict, reason) in &round.failures {
                output.push_str(&format!(
                    "  {} {} {}\n",
                    "x".red(),
                    conflict,
                    reason.dimmed()
                ));
            }
        }

        if !report.remaining.is_empty() {
            output.push_str(&Self::section_header("Unresolved"));
            output.push_str(&Self::format_conflicts(&report.remaining));
        }

        if !report.verdicts.is_empty() {
            output.push_str(&Self::section_header("Arbitration"));
            for verdict in &report.verdicts {
                output.push_str(&Self::format_verdict(verdict));
            }
        }

        output
    }

    fn format_conflicts(conflicts: &[EpistemicConflict]) -> String {
        if conflicts.is_empty() {
            return format!("  {}\n", "No conflicts detected".dimmed());
        }
        conflicts
            .iter()
            .map(|c| format!("  {} {}\n", "!".yellow().bold(), c))
            .collect()
    }

    fn format_outcome(outcome: &ConflictResolutionOutcome) -> String {
        let label = match outcome.resolution_type {
            ResolutionType::Converged => outcome.resolution_type.as_str().green().bold(),
            ResolutionType::PartialAdjustment => outcome.resolution_type.as_str().yellow().bold(),
            ResolutionType::PersistentDisagreement => outcome.resolution_type.as_str().red().bold(),
        };
        format!(
            "  {} {} ({} {:+.3}, {} {:+.3})\n    {}\n",
            label,
            outcome.conflict_id.to_string().dimmed(),
            outcome.agent_a,
            outcome.delta_a,
            outcome.agent_b,
            outcome.delta_b,
            outcome.reason
        )
    }

    fn format_verdict(verdict: &ArbitrationVerdict) -> String {
        let marker = if verdict.is_decisive() {
            "->".green()
        } else {
            "?".yellow()
        };
        format!("  {} {}\n", marker, verdict)
    }

    fn format_step(step: &FrameStep) -> String {
        let mut output = format!(
            "\n{}\n",
            format!("── {} -> {} ({} recomputed) ──", step.from, step.to, step.recomputed)
                .yellow()
                .bold()
        );
        if step.changed.is_empty() {
            output.push_str(&format!("  {}\n", "no confidence changed".dimmed()));
        }
        for belief in &step.changed {
            output.push_str(&Self::format_belief(belief));
        }
        output
    }

    fn format_agent(agent: &AgentSummary) -> String {
        let mut output = format!(
            "\n{}\n",
            format!("── {} [{}] ──", agent.agent, agent.frame).yellow().bold()
        );
        if agent.beliefs.is_empty() {
            output.push_str(&format!("  {}\n", "(no beliefs)".dimmed()));
        }
        for belief in &agent.beliefs {
            output.push_str(&Self::format_belief(belief));
        }
        if let Some(plan) = &agent.plan {
            output.push_str(&Self::format_plan(plan));
        }
        output
    }

    fn format_plan(outcome: &PlanningOutcome) -> String {
        let mut output = if outcome.is_ready() {
            format!("  {} {}\n", "Plan:".green().bold(), outcome)
        } else {
            format!("  {} {}\n", "Plan:".yellow().bold(), outcome)
        };
        if let Some(plan) = outcome.plan() {
            for (i, step) in plan.steps.iter().enumerate() {
                output.push_str(&format!("    {}. {}\n", i + 1, step));
            }
        }
        output
    }

    fn format_belief(belief: &Belief) -> String {
        format!(
            "  {:<32} {} {}\n",
            belief.proposition().to_string(),
            Self::confidence_bar(belief.confidence()),
            format!("{:.3}", belief.confidence()).bold()
        )
    }

    /// A ten-cell bar for a confidence in [0, 1]
    pub fn confidence_bar(confidence: f64) -> String {
        let filled = (confidence.clamp(0.0, 1.0) * 10.0).round() as usize;
        format!("[{}{}]", "#".repeat(filled), ".".repeat(10 - filled))
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doxa_application::NegotiationRound;
    use doxa_domain::{AgentId, ConflictId, Justification, Proposition};

    fn belief(claim: &str, confidence: f64) -> Belief {
        Belief::new(Proposition::new(claim), confidence, Justification::new())
    }

    fn outcome(resolution_type: ResolutionType) -> ConflictResolutionOutcome {
        ConflictResolutionOutcome {
            conflict_id: ConflictId::new("conflict-1"),
            agent_a: AgentId::new("advocate"),
            agent_b: AgentId::new("critic"),
            success: resolution_type.is_resolved(),
            resolution_type,
            reason: "critic moved below its conflict threshold".to_string(),
            updated_belief_a: None,
            updated_belief_b: None,
            delta_a: 0.0,
            delta_b: -0.25,
        }
    }

    #[test]
    fn test_confidence_bar() {
        assert_eq!(ConsoleFormatter::confidence_bar(0.0), "[..........]");
        assert_eq!(ConsoleFormatter::confidence_bar(0.74), "[#######...]");
        assert_eq!(ConsoleFormatter::confidence_bar(1.0), "[##########]");
        assert_eq!(ConsoleFormatter::confidence_bar(3.0), "[##########]");
    }

    #[test]
    fn test_format_negotiation_lists_rounds_and_verdicts() {
        let conflict = EpistemicConflict::new(
            AgentId::new("advocate"),
            belief("CacheIsSafe", 0.8),
            AgentId::new("critic"),
            belief("¬CacheIsSafe", 0.7),
        );
        let report = NegotiationReport {
            agent_a: AgentId::new("advocate"),
            agent_b: AgentId::new("critic"),
            rounds: vec![NegotiationRound {
                index: 1,
                outcomes: vec![outcome(ResolutionType::PersistentDisagreement)],
                failures: vec![(ConflictId::new("conflict-2"), "stale belief".to_string())],
            }],
            remaining: vec![conflict.clone()],
            verdicts: vec![ArbitrationVerdict {
                conflict_id: conflict.id.clone(),
                arbiter: "judge".to_string(),
                proposition: Proposition::new("CacheIsSafe"),
                support_for: 0.7,
                support_against: 0.4,
                favored: Some(AgentId::new("advocate")),
            }],
        };

        let output = ConsoleFormatter::format_negotiation(&report);
        assert!(output.contains("Round 1"));
        assert!(output.contains("persistent-disagreement"));
        assert!(output.contains("stale belief"));
        assert!(output.contains("Unresolved"));
        assert!(output.contains("judge favors advocate on CacheIsSafe"));
    }

    #[test]
    fn test_format_report_frame_switch() {
        let summary = |frame: &str, confidence: f64| AgentSummary {
            agent: AgentId::new("solo"),
            frame: frame.to_string(),
            beliefs: vec![belief("BuildIsFast", confidence)],
            plan: None,
        };
        let report = ScenarioReport::FrameSwitch {
            initial: summary("efficiency", 0.8),
            steps: vec![FrameStep {
                from: "efficiency".to_string(),
                to: "thoroughness".to_string(),
                recomputed: 1,
                changed: vec![belief("BuildIsFast", 0.55)],
            }],
            r#final: summary("thoroughness", 0.55).with_plan(PlanningOutcome::Blocked {
                proposition: Proposition::new("BuildIsFast"),
                confidence: 0.55,
                threshold: 0.7,
            }),
        };

        let output = ConsoleFormatter::format_report(&report);
        assert!(output.contains("doxa: frame-switch"));
        assert!(output.contains("efficiency -> thoroughness (1 recomputed)"));
        assert!(output.contains("BuildIsFast"));
        assert!(output.contains("0.550"));
        assert!(output.contains("blocked: BuildIsFast at 0.55"));
        assert!(output.contains("All conflicts resolved"));
    }

    #[test]
    fn test_unsettled_conflict_report() {
        let report = ScenarioReport::Conflict {
            conflicts: vec![],
            outcomes: vec![outcome(ResolutionType::PartialAdjustment)],
            agents: vec![],
        };
        let output = ConsoleFormatter::format_report(&report);
        assert!(output.contains("partial-adjustment"));
        assert!(output.contains("Disagreement remains"));
    }
}
