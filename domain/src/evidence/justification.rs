//! The ordered evidence trail behind a belief.

use super::element::{ElementKind, JustificationElement};
use crate::util::current_timestamp;
use serde::{Deserialize, Serialize};

/// Ordered, append-only sequence of [`JustificationElement`]s.
///
/// Merging concatenates the two sequences; duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Justification {
    elements: Vec<JustificationElement>,
    last_modified: u64,
}

impl Justification {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            last_modified: current_timestamp(),
        }
    }

    pub fn from_elements(elements: Vec<JustificationElement>) -> Self {
        Self {
            elements,
            last_modified: current_timestamp(),
        }
    }

    /// Builder-style append.
    pub fn with_element(mut self, element: JustificationElement) -> Self {
        self.push(element);
        self
    }

    pub fn push(&mut self, element: JustificationElement) {
        self.elements.push(element);
        self.last_modified = current_timestamp();
    }

    pub fn extend<I: IntoIterator<Item = JustificationElement>>(&mut self, elements: I) {
        self.elements.extend(elements);
        self.last_modified = current_timestamp();
    }

    /// A new justification with `other`'s elements appended after ours.
    pub fn merge(&self, other: &Justification) -> Justification {
        let mut merged = self.clone();
        merged.extend(other.elements.iter().cloned());
        merged
    }

    pub fn elements(&self) -> &[JustificationElement] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JustificationElement> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn last_modified(&self) -> u64 {
        self.last_modified
    }

    pub fn count_of(&self, kind: ElementKind) -> usize {
        self.elements.iter().filter(|e| e.kind == kind).count()
    }

    /// A copy without external-agent elements: only the evidence this
    /// holder gathered itself.
    pub fn first_hand(&self) -> Justification {
        Self {
            elements: self
                .elements
                .iter()
                .filter(|e| e.kind != ElementKind::ExternalAgent)
                .cloned()
                .collect(),
            last_modified: self.last_modified,
        }
    }

    /// Element count including everything wrapped by external-agent
    /// elements, recursively.
    pub fn total_elements(&self) -> usize {
        self.elements
            .iter()
            .map(|e| 1 + e.wrapped.as_ref().map_or(0, Justification::total_elements))
            .sum()
    }
}

impl<'a> IntoIterator for &'a Justification {
    type Item = &'a JustificationElement;
    type IntoIter = std::slice::Iter<'a, JustificationElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
