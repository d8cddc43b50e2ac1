//! Justification elements: the individual pieces of evidence behind a belief.

use super::justification::Justification;
use crate::belief::confidence::clamp_confidence;
use crate::core::error::DomainError;
use crate::util::current_timestamp;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The fixed vocabulary of evidence kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Output of a tool execution
    ToolResult,
    /// A statement made by another entity
    Testimony,
    /// Something the agent observed directly
    Observation,
    /// A conclusion reached by logical inference
    Inference,
    /// Another agent's justification, received during an exchange
    ExternalAgent,
}

impl ElementKind {
    pub const ALL: [ElementKind; 5] = [
        ElementKind::ToolResult,
        ElementKind::Testimony,
        ElementKind::Observation,
        ElementKind::Inference,
        ElementKind::ExternalAgent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::ToolResult => "tool_result",
            ElementKind::Testimony => "testimony",
            ElementKind::Observation => "observation",
            ElementKind::Inference => "inference",
            ElementKind::ExternalAgent => "external_agent",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ElementKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "tool_result" | "tool" => Ok(ElementKind::ToolResult),
            "testimony" => Ok(ElementKind::Testimony),
            "observation" => Ok(ElementKind::Observation),
            "inference" => Ok(ElementKind::Inference),
            "external_agent" | "external" => Ok(ElementKind::ExternalAgent),
            _ => Err(DomainError::UnknownElementKind(s.to_string())),
        }
    }
}

/// A single tagged piece of evidence.
///
/// `declared_strength` is the element's own scoring capability: when present,
/// frames use it directly instead of asking the evidence scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JustificationElement {
    pub kind: ElementKind,
    /// Who or what produced the evidence (tool name, entity, agent id)
    pub source: String,
    pub content: String,
    /// Free-form topic tags (`performance`, `security`, ...)
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_strength: Option<f64>,
    /// The other agent's justification, for [`ElementKind::ExternalAgent`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrapped: Option<Justification>,
    /// Milliseconds since epoch
    pub timestamp: u64,
}

impl JustificationElement {
    pub fn new(kind: ElementKind, source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.into(),
            content: content.into(),
            tags: BTreeSet::new(),
            declared_strength: None,
            wrapped: None,
            timestamp: current_timestamp(),
        }
    }

    pub fn tool_result(tool: impl Into<String>, output: impl Into<String>) -> Self {
        Self::new(ElementKind::ToolResult, tool, output)
    }

    pub fn testimony(entity: impl Into<String>, statement: impl Into<String>) -> Self {
        Self::new(ElementKind::Testimony, entity, statement)
    }

    pub fn observation(observer: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(ElementKind::Observation, observer, content)
    }

    pub fn inference(rule: impl Into<String>, conclusion: impl Into<String>) -> Self {
        Self::new(ElementKind::Inference, rule, conclusion)
    }

    /// Wrap another agent's justification as a single element.
    pub fn external_agent(
        agent_id: impl Into<String>,
        summary: impl Into<String>,
        justification: Justification,
    ) -> Self {
        let mut element = Self::new(ElementKind::ExternalAgent, agent_id, summary);
        element.wrapped = Some(justification);
        element
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into().to_lowercase());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags
            .extend(tags.into_iter().map(|t| t.into().to_lowercase()));
        self
    }

    /// Attach a strength in [0, 1]; out-of-range values are clamped.
    pub fn with_strength(mut self, strength: f64) -> Self {
        self.declared_strength = Some(clamp_confidence(strength));
        self
    }

    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}
