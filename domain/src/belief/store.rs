//! Owned, copy-on-write belief store keyed by proposition.

use super::entities::Belief;
use crate::core::proposition::Proposition;
use std::collections::HashMap;

/// A belief together with the store revision at which it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredBelief {
    pub belief: Belief,
    pub revision: u64,
}

/// Mapping proposition → current [`Belief`].
///
/// Every write replaces the whole value and stamps it with a fresh revision,
/// which lets writers detect that an entry changed since they read it
/// ([`BeliefStore::replace_if_unchanged`]).
#[derive(Debug, Clone, Default)]
pub struct BeliefStore {
    entries: HashMap<Proposition, StoredBelief>,
    next_revision: u64,
}

impl BeliefStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, proposition: &Proposition) -> Option<&Belief> {
        self.entries.get(proposition).map(|e| &e.belief)
    }

    pub fn entry(&self, proposition: &Proposition) -> Option<&StoredBelief> {
        self.entries.get(proposition)
    }

    pub fn revision(&self, proposition: &Proposition) -> Option<u64> {
        self.entries.get(proposition).map(|e| e.revision)
    }

    pub fn contains(&self, proposition: &Proposition) -> bool {
        self.entries.contains_key(proposition)
    }

    /// Insert or replace, returning the superseded belief.
    pub fn put(&mut self, belief: Belief) -> Option<Belief> {
        self.next_revision += 1;
        let stored = StoredBelief {
            belief,
            revision: self.next_revision,
        };
        self.entries
            .insert(stored.belief.proposition().clone(), stored)
            .map(|previous| previous.belief)
    }

    /// Write `belief` only if its entry is still at `expected` revision
    /// (`None` meaning "absent"). Returns the superseded belief on success.
    pub fn replace_if_unchanged(
        &mut self,
        belief: Belief,
        expected: Option<u64>,
    ) -> Result<Option<Belief>, Belief> {
        if self.revision(belief.proposition()) != expected {
            return Err(belief);
        }
        Ok(self.put(belief))
    }

    pub fn remove(&mut self, proposition: &Proposition) -> Option<Belief> {
        self.entries.remove(proposition).map(|e| e.belief)
    }

    /// Beliefs at or above `threshold`, ordered by proposition.
    pub fn at_least(&self, threshold: f64) -> Vec<&Belief> {
        let mut beliefs: Vec<&Belief> = self
            .entries
            .values()
            .map(|e| &e.belief)
            .filter(|b| b.meets(threshold))
            .collect();
        beliefs.sort_by(|a, b| a.proposition().cmp(b.proposition()));
        beliefs
    }

    /// Remove every belief below `threshold`, returning the removed beliefs.
    pub fn retain_at_least(&mut self, threshold: f64) -> Vec<Belief> {
        let doomed: Vec<Proposition> = self
            .entries
            .iter()
            .filter(|(_, e)| !e.belief.meets(threshold))
            .map(|(p, _)| p.clone())
            .collect();
        let mut removed: Vec<Belief> = doomed.iter().filter_map(|p| self.remove(p)).collect();
        removed.sort_by(|a, b| a.proposition().cmp(b.proposition()));
        removed
    }

    /// All propositions, sorted.
    pub fn propositions(&self) -> Vec<Proposition> {
        let mut props: Vec<Proposition> = self.entries.keys().cloned().collect();
        props.sort();
        props
    }

    pub fn iter(&self) -> impl Iterator<Item = &Belief> {
        self.entries.values().map(|e| &e.belief)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Belief> for BeliefStore {
    fn from_iter<I: IntoIterator<Item = Belief>>(iter: I) -> Self {
        let mut store = BeliefStore::new();
        for belief in iter {
            store.put(belief);
        }
        store
    }
}
