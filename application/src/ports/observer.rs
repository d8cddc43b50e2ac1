//! Port for observing epistemic events.
//!
//! Agents report belief formation, belief updates, conflict detection,
//! justification exchange, and frame changes through this port. This is
//! separate from `tracing`-based diagnostics: tracing handles human-readable
//! operation logs, while observers receive the structured
//! [`EpistemicEvent`] stream (console rendering, JSONL transcripts, ...).

use doxa_domain::EpistemicEvent;
use std::sync::Arc;

/// Receives every event an agent emits.
///
/// `on_event` is synchronous and cannot fail; an observer must never
/// interrupt belief revision.
pub trait BeliefObserver: Send + Sync {
    fn on_event(&self, event: &EpistemicEvent);
}

/// No-op observer for tests and when observation is disabled.
pub struct NoObserver;

impl BeliefObserver for NoObserver {
    fn on_event(&self, _event: &EpistemicEvent) {}
}

/// An observer that forwards every event to several inner observers.
///
/// ```text
/// Agent ──emit──▶ CompositeObserver ─┬─▶ ConsoleObserver  (presentation)
///                                    └─▶ JsonlEventLogger (infrastructure)
/// ```
#[derive(Default, Clone)]
pub struct CompositeObserver {
    delegates: Vec<Arc<dyn BeliefObserver>>,
}

impl CompositeObserver {
    pub fn new(delegates: Vec<Arc<dyn BeliefObserver>>) -> Self {
        Self { delegates }
    }

    pub fn with(mut self, observer: Arc<dyn BeliefObserver>) -> Self {
        self.delegates.push(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

impl BeliefObserver for CompositeObserver {
    fn on_event(&self, event: &EpistemicEvent) {
        for d in &self.delegates {
            d.on_event(event);
        }
    }
}
