//! Infrastructure layer for doxa
//!
//! This crate contains adapters that implement the ports defined in the
//! domain and application layers: evidence scorers, the JSONL event logger,
//! a minimal planner, and configuration file loading.

pub mod config;
pub mod logging;
pub mod planning;
pub mod scoring;

// Re-export commonly used types
pub use config::{
    ConfigIssue, ConfigLoader, ConfigValidationError, FileConfig, FileFrameConfig, Severity,
};
pub use logging::JsonlEventLogger;
pub use planning::SingleStepPlanner;
pub use scoring::{
    HeuristicEvidenceScorer, ScorerKind, ScorerSettings, TimeoutScorer, build_scorer,
};
#[cfg(feature = "http-scorer")]
pub use scoring::HttpEvidenceScorer;
