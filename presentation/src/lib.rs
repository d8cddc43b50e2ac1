//! Presentation layer for doxa
//!
//! This crate contains CLI definitions, scenario report formatters, and the
//! console observer that prints epistemic events as they happen.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat, Scenario};
pub use output::console::ConsoleFormatter;
pub use output::formatter::{JsonFormatter, ReportFormatter, formatter_for};
pub use output::report::{AgentSummary, FrameStep, ScenarioReport};
pub use progress::reporter::ConsoleObserver;
