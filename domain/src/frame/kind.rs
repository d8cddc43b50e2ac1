//! The closed registry of frame variants and their compatibility table.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Frame variants. All share one contract and differ only in parameters,
/// directional bias, and their row of the compatibility table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameKind {
    /// Performance-oriented
    Efficiency,
    /// Completeness-oriented
    Thoroughness,
    /// Risk-minimizing
    Security,
    /// Neutral debate moderator
    Moderator,
    /// Debate role arguing for a proposition
    Advocate,
    /// Debate role arguing against a proposition
    Critic,
    /// Debate evaluator
    Judge,
}

impl FrameKind {
    pub const ALL: [FrameKind; 7] = [
        FrameKind::Efficiency,
        FrameKind::Thoroughness,
        FrameKind::Security,
        FrameKind::Moderator,
        FrameKind::Advocate,
        FrameKind::Critic,
        FrameKind::Judge,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FrameKind::Efficiency => "efficiency",
            FrameKind::Thoroughness => "thoroughness",
            FrameKind::Security => "security",
            FrameKind::Moderator => "moderator",
            FrameKind::Advocate => "advocate",
            FrameKind::Critic => "critic",
            FrameKind::Judge => "judge",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FrameKind::Efficiency => "Weights performance evidence; discounts everything else",
            FrameKind::Thoroughness => "Weights all evidence moderately; favors completeness",
            FrameKind::Security => "Trusts observation and tool output; discounts testimony",
            FrameKind::Moderator => "Weighs every kind of evidence equally",
            FrameKind::Advocate => "Argues for the proposition; scales confidence up",
            FrameKind::Critic => "Argues against the proposition; inverts evidence strength",
            FrameKind::Judge => "Evaluates debates; prefers verifiable evidence",
        }
    }

    pub fn is_debate_role(&self) -> bool {
        matches!(
            self,
            FrameKind::Moderator | FrameKind::Advocate | FrameKind::Critic | FrameKind::Judge
        )
    }

    /// How much justification produced under `other` is trusted by a frame
    /// of this kind. Each variant defines its own row; see the DESIGN notes
    /// for why this is not derived from parameters.
    pub fn compatibility(&self, other: FrameKind) -> f64 {
        use FrameKind::*;

        match self {
            Efficiency => match other {
                Efficiency => 0.9,
                Security => 0.4,
                Thoroughness => 0.5,
                Moderator => 0.7,
                _ => 0.5,
            },
            Thoroughness => match other {
                Thoroughness => 0.9,
                Security => 0.7,
                Efficiency => 0.5,
                Moderator => 0.7,
                _ => 0.5,
            },
            Security => match other {
                Security => 0.9,
                Thoroughness => 0.7,
                Efficiency => 0.4,
                Moderator => 0.7,
                _ => 0.5,
            },
            Moderator => match other {
                Moderator => 0.95,
                _ => 0.7,
            },
            Advocate => match other {
                Advocate => 0.95,
                Critic => 0.3,
                Judge => 0.6,
                Moderator => 0.7,
                _ => 0.5,
            },
            Critic => match other {
                Critic => 0.95,
                Advocate => 0.3,
                Judge => 0.6,
                Moderator => 0.7,
                _ => 0.5,
            },
            Judge => match other {
                Judge => 0.95,
                Advocate | Critic => 0.6,
                Moderator => 0.7,
                _ => 0.5,
            },
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FrameKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "efficiency" | "performance" => Ok(FrameKind::Efficiency),
            "thoroughness" | "completeness" => Ok(FrameKind::Thoroughness),
            "security" | "risk" => Ok(FrameKind::Security),
            "moderator" | "neutral" => Ok(FrameKind::Moderator),
            "advocate" | "for" | "pro" => Ok(FrameKind::Advocate),
            "critic" | "against" | "con" => Ok(FrameKind::Critic),
            "judge" | "evaluator" => Ok(FrameKind::Judge),
            _ => Err(DomainError::UnknownFrame(s.to_string())),
        }
    }
}
