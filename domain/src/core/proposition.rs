//! Propositions: opaque claim identifiers with a canonical negated form.
//!
//! A proposition `P` and its negation `¬P` form a pair. The negated form is
//! encoded with a single leading [`NEGATION_MARKER`]; construction collapses
//! stacked markers (and the textual `NOT ` prefix) so that negation is an
//! involution for every value of this type.

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Leading marker distinguishing `¬P` from `P`.
pub const NEGATION_MARKER: char = '¬';

const TEXTUAL_NEGATION: &str = "NOT ";

/// An opaque claim identifier.
///
/// # Example
///
/// ```
/// use doxa_domain::Proposition;
///
/// let p = Proposition::new("SentimentIsPositive");
/// assert_eq!(p.negate().as_str(), "¬SentimentIsPositive");
/// assert_eq!(p.negate().negate(), p);
/// assert!(p.contradicts(&Proposition::new("NOT SentimentIsPositive")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Proposition(String);

impl Proposition {
    /// Create a proposition, normalizing its negation prefix.
    pub fn new(claim: impl Into<String>) -> Self {
        Self(normalize(claim.into()))
    }

    /// Returns the canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the negated member of its pair.
    pub fn is_negated(&self) -> bool {
        self.0.starts_with(NEGATION_MARKER)
    }

    /// The negation of this proposition.
    pub fn negate(&self) -> Self {
        match self.0.strip_prefix(NEGATION_MARKER) {
            Some(base) => Self(base.to_string()),
            None => Self(format!("{}{}", NEGATION_MARKER, self.0)),
        }
    }

    /// The un-negated member of this proposition's pair.
    pub fn base(&self) -> Self {
        if self.is_negated() {
            self.negate()
        } else {
            self.clone()
        }
    }

    /// Whether `other` is this proposition's negation.
    pub fn contradicts(&self, other: &Proposition) -> bool {
        self.is_negated() != other.is_negated() && self.base() == other.base()
    }
}

fn normalize(raw: String) -> String {
    let mut rest = raw.trim();
    let mut negations = 0usize;
    loop {
        if let Some(stripped) = rest.strip_prefix(NEGATION_MARKER) {
            rest = stripped.trim_start();
        } else if let Some(stripped) = rest.strip_prefix(TEXTUAL_NEGATION) {
            rest = stripped.trim_start();
        } else {
            break;
        }
        negations += 1;
    }

    if negations % 2 == 1 {
        format!("{}{}", NEGATION_MARKER, rest)
    } else {
        rest.to_string()
    }
}

impl From<String> for Proposition {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Proposition {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<Proposition> for String {
    fn from(p: Proposition) -> Self {
        p.0
    }
}

impl std::str::FromStr for Proposition {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let proposition = Self::new(s);
        if proposition.base().as_str().is_empty() {
            return Err(DomainError::InvalidProposition(s.to_string()));
        }
        Ok(proposition)
    }
}

impl fmt::Display for Proposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
