//! Pairwise conflict detection over two belief stores.

use super::entities::EpistemicConflict;
use crate::belief::BeliefStore;
use crate::core::agent_id::AgentId;
use std::collections::HashSet;

/// One agent's beliefs as seen by the detector.
#[derive(Debug, Clone, Copy)]
pub struct BeliefView<'a> {
    pub agent: &'a AgentId,
    pub store: &'a BeliefStore,
    /// The agent's own conflict threshold (inclusive)
    pub threshold: f64,
}

impl<'a> BeliefView<'a> {
    pub fn new(agent: &'a AgentId, store: &'a BeliefStore, threshold: f64) -> Self {
        Self {
            agent,
            store,
            threshold,
        }
    }
}

/// Conflicts from `a`'s point of view: every belief of `a` at or above its
/// threshold whose negation `b` holds at or above `b`'s threshold.
///
/// Asymmetric by construction; results are ordered by `a`'s proposition.
pub fn detect_conflicts(a: BeliefView<'_>, b: BeliefView<'_>) -> Vec<EpistemicConflict> {
    a.store
        .at_least(a.threshold)
        .into_iter()
        .filter_map(|belief_a| {
            let belief_b = b.store.get(&belief_a.proposition().negate())?;
            belief_b.meets(b.threshold).then(|| {
                EpistemicConflict::new(
                    a.agent.clone(),
                    belief_a.clone(),
                    b.agent.clone(),
                    belief_b.clone(),
                )
            })
        })
        .collect()
}

/// Both directions, with duplicates (same pair of sides) removed. Every
/// conflict is reported from `a`'s side.
pub fn detect_conflicts_bidirectional(
    a: BeliefView<'_>,
    b: BeliefView<'_>,
) -> Vec<EpistemicConflict> {
    let mut seen = HashSet::new();
    detect_conflicts(a, b)
        .into_iter()
        .chain(detect_conflicts(b, a).into_iter().map(|c| c.swapped()))
        .filter(|c| seen.insert(c.key()))
        .collect()
}
