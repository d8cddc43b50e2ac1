//! The Frame value: a named, parameterized lens over evidence.

use super::kind::FrameKind;
use super::parameters::FrameParameters;
use super::strategy::FrameStrategy;
use crate::core::error::DomainError;
use crate::util::generate_id;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A frame is stateless with respect to belief data; agents swap frames
/// freely at runtime.
///
/// # Example
///
/// ```
/// use doxa_domain::frame::{Frame, FrameKind, FrameStrategy};
///
/// let frame = Frame::named("security").unwrap();
/// assert_eq!(frame.kind(), FrameKind::Security);
/// assert_eq!(frame.compatibility(FrameKind::Efficiency), 0.4);
/// assert!(Frame::named("optimism").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    id: String,
    name: String,
    kind: FrameKind,
    parameters: FrameParameters,
    /// Replacements for entries of this variant's compatibility row
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    compatibility_overrides: BTreeMap<FrameKind, f64>,
}

impl Frame {
    /// A frame of `kind` with its preset parameters.
    pub fn new(kind: FrameKind) -> Self {
        Self {
            id: generate_id("frame"),
            name: kind.as_str().to_string(),
            kind,
            parameters: FrameParameters::preset(kind),
            compatibility_overrides: BTreeMap::new(),
        }
    }

    /// Look a frame up in the fixed registry by name or alias.
    pub fn named(name: &str) -> Result<Self, DomainError> {
        Ok(Self::new(name.parse()?))
    }

    /// Every registered variant with preset parameters.
    pub fn registry() -> Vec<Frame> {
        FrameKind::ALL.into_iter().map(Frame::new).collect()
    }

    // ==================== Builder Methods ====================

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace the parameters after validating them.
    pub fn with_parameters(mut self, parameters: FrameParameters) -> Result<Self, DomainError> {
        parameters.validate()?;
        self.parameters = parameters;
        Ok(self)
    }

    /// Override one entry of this frame's compatibility row.
    pub fn with_compatibility(mut self, other: FrameKind, value: f64) -> Result<Self, DomainError> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(DomainError::invalid_parameter(
                format!("compatibility.{}", other),
                value,
                "must be within [0, 1]",
            ));
        }
        self.compatibility_overrides.insert(other, value);
        Ok(self)
    }

    // ==================== Accessors ====================

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn compatibility_overrides(&self) -> &BTreeMap<FrameKind, f64> {
        &self.compatibility_overrides
    }
}

impl FrameStrategy for Frame {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> FrameKind {
        self.kind
    }

    fn parameters(&self) -> &FrameParameters {
        &self.parameters
    }

    fn compatibility(&self, other: FrameKind) -> f64 {
        self.compatibility_overrides
            .get(&other)
            .copied()
            .unwrap_or_else(|| self.kind.compatibility(other))
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name == self.kind.as_str() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.kind)
        }
    }
}
