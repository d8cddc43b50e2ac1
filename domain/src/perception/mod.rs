//! Perceptions, goals, and the bounded working context an agent keeps.
//!
//! - [`Perception`]: a stimulus carrying evidence and context entries
//! - [`Goal`]: what a planner is asked to achieve
//! - [`Stimulus`]: either of the above, as seen by a frame
//! - [`WorkingContext`]: bounded, oldest-evicted context buffer

use crate::core::proposition::Proposition;
use crate::evidence::JustificationElement;
use crate::util::current_timestamp;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A key/value entry of contextual information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub key: String,
    pub value: String,
}

impl ContextEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Something an agent perceives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Perception {
    /// Where the perception came from (sensor, tool, peer)
    pub source: String,
    pub content: String,
    /// New evidence carried by this perception
    #[serde(default)]
    pub elements: Vec<JustificationElement>,
    /// Propositions the perception explicitly bears on
    #[serde(default)]
    pub propositions: Vec<Proposition>,
    /// Context merged into the agent's working context
    #[serde(default)]
    pub context: Vec<ContextEntry>,
    pub timestamp: u64,
}

impl Perception {
    pub fn new(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            content: content.into(),
            elements: Vec::new(),
            propositions: Vec::new(),
            context: Vec::new(),
            timestamp: current_timestamp(),
        }
    }

    pub fn with_element(mut self, element: JustificationElement) -> Self {
        self.elements.push(element);
        self
    }

    pub fn with_proposition(mut self, proposition: impl Into<Proposition>) -> Self {
        self.propositions.push(proposition.into());
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push(ContextEntry::new(key, value));
        self
    }
}

/// A goal handed to the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub description: String,
    /// Propositions the goal explicitly depends on
    #[serde(default)]
    pub propositions: Vec<Proposition>,
}

impl Goal {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            propositions: Vec::new(),
        }
    }

    pub fn requires(mut self, proposition: impl Into<Proposition>) -> Self {
        self.propositions.push(proposition.into());
        self
    }
}

/// A perception or a goal: anything a frame can extract propositions from.
#[derive(Debug, Clone, Copy)]
pub enum Stimulus<'a> {
    Perception(&'a Perception),
    Goal(&'a Goal),
}

impl<'a> Stimulus<'a> {
    /// Text handed to the scorer for proposition extraction.
    pub fn text(&self) -> &'a str {
        match self {
            Stimulus::Perception(p) => &p.content,
            Stimulus::Goal(g) => &g.description,
        }
    }

    pub fn explicit_propositions(&self) -> &'a [Proposition] {
        match self {
            Stimulus::Perception(p) => &p.propositions,
            Stimulus::Goal(g) => &g.propositions,
        }
    }
}

/// Bounded working context; pushing past capacity evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct WorkingContext {
    capacity: usize,
    entries: VecDeque<ContextEntry>,
}

impl WorkingContext {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Append an entry, returning the evicted one if the buffer was full.
    pub fn push(&mut self, entry: ContextEntry) -> Option<ContextEntry> {
        if self.capacity == 0 {
            return Some(entry);
        }
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    /// Merge entries in order; returns how many were evicted.
    pub fn merge<I: IntoIterator<Item = ContextEntry>>(&mut self, entries: I) -> usize {
        entries
            .into_iter()
            .filter_map(|e| self.push(e))
            .count()
    }

    /// Most recent value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = &ContextEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_working_context_evicts_oldest() {
        let mut ctx = WorkingContext::new(2);
        assert!(ctx.push(ContextEntry::new("a", "1")).is_none());
        assert!(ctx.push(ContextEntry::new("b", "2")).is_none());
        let evicted = ctx.push(ContextEntry::new("c", "3")).unwrap();
        assert_eq!(evicted.key, "a");
        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.get("a"), None);
        assert_eq!(ctx.get("c"), Some("3"));
    }

    #[test]
    fn test_working_context_get_returns_latest() {
        let mut ctx = WorkingContext::new(4);
        ctx.merge(vec![ContextEntry::new("k", "old"), ContextEntry::new("k", "new")]);
        assert_eq!(ctx.get("k"), Some("new"));
    }

    #[test]
    fn test_merge_counts_evictions() {
        let mut ctx = WorkingContext::new(1);
        let evicted = ctx.merge(vec![
            ContextEntry::new("a", "1"),
            ContextEntry::new("b", "2"),
            ContextEntry::new("c", "3"),
        ]);
        assert_eq!(evicted, 2);
        assert_eq!(ctx.get("c"), Some("3"));
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut ctx = WorkingContext::new(0);
        assert!(ctx.push(ContextEntry::new("a", "1")).is_some());
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_stimulus_accessors() {
        let perception = Perception::new("probe", "latency spiked").with_proposition("ApiIsFast");
        let stimulus = Stimulus::Perception(&perception);
        assert_eq!(stimulus.text(), "latency spiked");
        assert_eq!(stimulus.explicit_propositions().len(), 1);

        let goal = Goal::new("ship it").requires("TestsPass");
        let stimulus = Stimulus::Goal(&goal);
        assert_eq!(stimulus.text(), "ship it");
        assert_eq!(stimulus.explicit_propositions()[0].as_str(), "TestsPass");
    }
}
