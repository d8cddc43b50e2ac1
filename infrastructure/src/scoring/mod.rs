//! Evidence scorer adapters.
//!
//! - [`HeuristicEvidenceScorer`]: offline keyword heuristics
//! - [`HttpEvidenceScorer`]: remote JSON service (feature `http-scorer`)
//! - [`TimeoutScorer`]: timeout, retry and neutral-fallback decorator

mod heuristic;
#[cfg(feature = "http-scorer")]
mod http;
mod timeout;

pub use heuristic::HeuristicEvidenceScorer;
#[cfg(feature = "http-scorer")]
pub use http::HttpEvidenceScorer;
pub use timeout::{DEFAULT_SCORER_TIMEOUT, TimeoutScorer};

use doxa_domain::{EvidenceScorer, ScorerError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Which scorer backend to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    #[default]
    Heuristic,
    Http,
}

impl ScorerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScorerKind::Heuristic => "heuristic",
            ScorerKind::Http => "http",
        }
    }
}

impl std::fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ScorerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "heuristic" | "offline" | "keyword" => Ok(ScorerKind::Heuristic),
            "http" | "remote" => Ok(ScorerKind::Http),
            _ => Err(format!("Unknown scorer: {}", s)),
        }
    }
}

/// Everything needed to build a scorer.
#[derive(Debug, Clone, PartialEq)]
pub struct ScorerSettings {
    pub kind: ScorerKind,
    pub endpoint: Option<String>,
    pub timeout: Duration,
    pub retries: u32,
}

impl Default for ScorerSettings {
    fn default() -> Self {
        Self {
            kind: ScorerKind::Heuristic,
            endpoint: None,
            timeout: DEFAULT_SCORER_TIMEOUT,
            retries: 0,
        }
    }
}

/// Build the configured scorer, wrapped in a [`TimeoutScorer`].
pub fn build_scorer(settings: &ScorerSettings) -> Result<Arc<dyn EvidenceScorer>, ScorerError> {
    let inner: Arc<dyn EvidenceScorer> = match settings.kind {
        ScorerKind::Heuristic => Arc::new(HeuristicEvidenceScorer::new()),
        ScorerKind::Http => http_scorer(settings)?,
    };
    info!(
        "Using {} evidence scorer (timeout {:?}, {} retries)",
        settings.kind, settings.timeout, settings.retries
    );
    Ok(Arc::new(
        TimeoutScorer::new(inner, settings.timeout).with_retries(settings.retries),
    ))
}

#[cfg(feature = "http-scorer")]
fn http_scorer(settings: &ScorerSettings) -> Result<Arc<dyn EvidenceScorer>, ScorerError> {
    let endpoint = settings.endpoint.as_deref().ok_or_else(|| {
        ScorerError::Unavailable("scorer.endpoint is required for the http scorer".to_string())
    })?;
    Ok(Arc::new(HttpEvidenceScorer::new(endpoint, settings.timeout)?))
}

#[cfg(not(feature = "http-scorer"))]
fn http_scorer(_settings: &ScorerSettings) -> Result<Arc<dyn EvidenceScorer>, ScorerError> {
    Err(ScorerError::Unsupported(
        "the http scorer (build with the `http-scorer` feature)",
    ))
}
