//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for scenario reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored human-readable report
    Text,
    /// JSON report on stdout
    Json,
}

/// Demo scenario to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Two agents disagree on one proposition and exchange justifications
    Conflict,
    /// Advocate and critic negotiate several propositions, a judge arbitrates
    Debate,
    /// One agent re-reads its beliefs under a sequence of frames
    FrameSwitch,
}

impl Scenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Conflict => "conflict",
            Scenario::Debate => "debate",
            Scenario::FrameSwitch => "frame-switch",
        }
    }
}

/// CLI arguments for doxa
#[derive(Parser, Debug)]
#[command(name = "doxa")]
#[command(author, version, about = "Frame-weighted belief revision and conflict resolution between agents")]
#[command(long_about = r#"
doxa runs agents that form beliefs from evidence under interpretive frames,
detect contradictory beliefs between each other, and try to resolve them by
exchanging justifications.

Scenarios:
  conflict      two agents disagree on one proposition
  debate        advocate and critic negotiate, a judge arbitrates what is left
  frame-switch  one agent re-reads its beliefs under several frames

Configuration files are loaded from (in priority order):
1. --config <path>          Explicit config file
2. ./doxa.toml              Project-level config
3. ~/.config/doxa/config.toml   Global config

Example:
  doxa --scenario conflict
  doxa --scenario debate --rounds 5 --influence 0.3 --events run.jsonl
  doxa --scenario frame-switch --frames efficiency,thoroughness,efficiency
  doxa --scenario conflict --frame-a security --frame-b security --output json
"#)]
pub struct Cli {
    /// Scenario to run
    #[arg(short, long, value_enum, default_value = "conflict")]
    pub scenario: Scenario,

    /// Frame of the first agent (defaults depend on the scenario)
    #[arg(long, value_name = "FRAME")]
    pub frame_a: Option<String>,

    /// Frame of the second agent (defaults depend on the scenario)
    #[arg(long, value_name = "FRAME")]
    pub frame_b: Option<String>,

    /// Frame sequence for the frame-switch scenario
    #[arg(long, value_name = "FRAME,...", value_delimiter = ',')]
    pub frames: Vec<String>,

    /// Smallest confidence change that counts as movement in an exchange
    #[arg(long, value_name = "EPSILON")]
    pub significance: Option<f64>,

    /// Weight of the other side's evidence in an exchange (0-1)
    #[arg(long, value_name = "LAMBDA")]
    pub influence: Option<f64>,

    /// Maximum negotiation rounds
    #[arg(long, value_name = "N")]
    pub rounds: Option<usize>,

    /// Write every epistemic event to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub events: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Do not print events as they happen
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
