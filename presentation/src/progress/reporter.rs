//! Live event reporting while a scenario runs

use colored::Colorize;
use doxa_application::BeliefObserver;
use doxa_domain::{EpistemicEvent, EventKind};

/// Prints one line per epistemic event to stderr.
///
/// Lines go to stderr so that `--output json` keeps stdout machine-readable.
/// Perceptions and newly formed beliefs are only shown when `verbose` is set.
pub struct ConsoleObserver {
    verbose: bool,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self { verbose: false }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Render an event as a single line, or `None` if it is filtered out.
    pub fn format_event(&self, event: &EpistemicEvent) -> Option<String> {
        let who = event.entity_id.to_string().bold();
        let line = match &event.kind {
            EventKind::PerceptionReceived {
                source, elements, ..
            } => {
                if !self.verbose {
                    return None;
                }
                format!(
                    "{} {} perceived {} ({} elements)",
                    "<-".dimmed(),
                    who,
                    source,
                    elements
                )
            }
            EventKind::BeliefFormed { belief } => {
                if !self.verbose {
                    return None;
                }
                format!(
                    "{} {} believes {} at {:.3}",
                    "+".green(),
                    who,
                    belief.proposition(),
                    belief.confidence()
                )
            }
            EventKind::BeliefUpdated {
                current, delta, ..
            } => format!(
                "{} {} revised {} to {:.3} ({:+.3})",
                "~".cyan(),
                who,
                current.proposition(),
                current.confidence(),
                delta
            ),
            EventKind::BeliefPruned {
                proposition,
                confidence,
            } => format!(
                "{} {} dropped {} ({:.3})",
                "-".dimmed(),
                who,
                proposition,
                confidence
            ),
            EventKind::ConflictDetected { conflict } => {
                format!("{} conflict: {}", "!".yellow().bold(), conflict)
            }
            EventKind::JustificationExchanged { outcome } => {
                let marker = if outcome.success {
                    "v".green()
                } else {
                    "x".red()
                };
                format!(
                    "{} {} exchanged with {}: {}",
                    marker, who, outcome.agent_b, outcome.resolution_type
                )
            }
            EventKind::Arbitrated { verdict } => {
                format!("{} {}", "=>".magenta(), verdict)
            }
            EventKind::FrameChanged {
                from,
                to,
                recomputed,
            } => format!(
                "{} {} switched frame {} -> {} ({} recomputed)",
                "*".blue(),
                who,
                from,
                to,
                recomputed
            ),
        };
        Some(line)
    }
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl BeliefObserver for ConsoleObserver {
    fn on_event(&self, event: &EpistemicEvent) {
        if let Some(line) = self.format_event(event) {
            eprintln!("{}", line);
        }
    }
}
