//! Agent orchestrator
//!
//! An [`Agent`] exclusively owns one belief store and one active frame, and
//! drives every operation on them:
//!
//! | Operation                  | Module           |
//! |----------------------------|------------------|
//! | perceive                   | `perceive`       |
//! | set_frame                  | `frame_switch`   |
//! | detect / exchange / receive| `exchange`       |
//! | plan                       | `planning`       |
//!
//! Updates for one proposition are serialized by a per-proposition lock;
//! different propositions (and different agents) proceed in parallel. Every
//! store entry carries a revision so exchange results computed from a stale
//! read are rejected, and every frame switch bumps an epoch so perception
//! results computed under the previous frame are discarded.

mod exchange;
mod frame_switch;
mod perceive;
mod planning;
mod types;

pub use types::{AgentError, AgentSnapshot, FrameSwitchReport, PerceptionReport, ResolutionNotice};

use crate::config::AgentSettings;
use crate::ports::observer::{BeliefObserver, NoObserver};
use crate::ports::planner::{NoPlanner, Planner};
use doxa_domain::{
    AgentId, Belief, BeliefStore, ConfidenceThresholds, ContextEntry, EpistemicEvent, EventKind,
    EvidenceScorer, Frame, Proposition, ResolutionStrategy, StoredBelief, WorkingContext,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::{debug, info};

/// The active frame together with the epoch it was installed at.
struct ActiveFrame {
    frame: Arc<Frame>,
    epoch: u64,
}

/// An autonomous agent holding beliefs under a frame.
pub struct Agent {
    id: AgentId,
    settings: AgentSettings,
    frame: RwLock<ActiveFrame>,
    /// Serializes frame switches
    frame_switch: Mutex<()>,
    store: RwLock<BeliefStore>,
    locks: Mutex<HashMap<Proposition, Arc<Mutex<()>>>>,
    context: Mutex<WorkingContext>,
    scorer: Arc<dyn EvidenceScorer>,
    resolution: Arc<dyn ResolutionStrategy>,
    planner: Arc<dyn Planner>,
    observer: Arc<dyn BeliefObserver>,
}

impl Agent {
    pub fn new(id: impl Into<AgentId>, frame: Frame, scorer: Arc<dyn EvidenceScorer>) -> Self {
        let settings = AgentSettings::default();
        Self {
            id: id.into(),
            settings,
            frame: RwLock::new(ActiveFrame {
                frame: Arc::new(frame),
                epoch: 0,
            }),
            frame_switch: Mutex::new(()),
            store: RwLock::new(BeliefStore::new()),
            locks: Mutex::new(HashMap::new()),
            context: Mutex::new(WorkingContext::new(settings.context_capacity)),
            scorer,
            resolution: Arc::new(settings.exchange),
            planner: Arc::new(NoPlanner),
            observer: Arc::new(NoObserver),
        }
    }

    // ==================== Builder Methods ====================

    /// Replace the settings. This also resets the resolution strategy to a
    /// justification exchange with the new exchange parameters, so call
    /// [`with_resolution`](Self::with_resolution) afterwards to override it.
    pub fn with_settings(mut self, settings: AgentSettings) -> Self {
        self.settings = settings;
        self.context = Mutex::new(WorkingContext::new(settings.context_capacity));
        self.resolution = Arc::new(settings.exchange);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn BeliefObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_planner(mut self, planner: Arc<dyn Planner>) -> Self {
        self.planner = planner;
        self
    }

    pub fn with_resolution(mut self, resolution: Arc<dyn ResolutionStrategy>) -> Self {
        self.resolution = resolution;
        self
    }

    // ==================== Accessors ====================

    pub fn id(&self) -> &AgentId {
        &self.id
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    pub fn thresholds(&self) -> &ConfidenceThresholds {
        &self.settings.thresholds
    }

    /// The currently active frame.
    pub async fn frame(&self) -> Arc<Frame> {
        self.frame.read().await.frame.clone()
    }

    /// Beliefs at or above `threshold`, ordered by proposition.
    pub async fn beliefs(&self, threshold: f64) -> Vec<Belief> {
        self.store
            .read()
            .await
            .at_least(threshold)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn belief(&self, proposition: &Proposition) -> Option<Belief> {
        self.store.read().await.get(proposition).cloned()
    }

    /// Beliefs confident enough to be communicated to other agents.
    pub async fn shareable_beliefs(&self) -> Vec<Belief> {
        self.beliefs(self.settings.thresholds.communication).await
    }

    /// Drop every belief below the retention threshold.
    pub async fn prune(&self) -> Vec<Belief> {
        let removed = self
            .store
            .write()
            .await
            .retain_at_least(self.settings.thresholds.retention);
        for belief in &removed {
            self.emit(EventKind::BeliefPruned {
                proposition: belief.proposition().clone(),
                confidence: belief.confidence(),
            });
        }
        if !removed.is_empty() {
            info!("Agent {} pruned {} beliefs", self.id, removed.len());
        }
        removed
    }

    pub async fn snapshot(&self) -> AgentSnapshot {
        let frame = self.frame().await;
        AgentSnapshot {
            id: self.id.clone(),
            frame: frame.as_ref().clone(),
            thresholds: self.settings.thresholds,
            beliefs: self.store.read().await.clone(),
        }
    }

    /// Entries of the working context, oldest first.
    pub async fn context(&self) -> Vec<ContextEntry> {
        self.context.lock().await.entries().cloned().collect()
    }

    /// Adopt a belief as-is, replacing any belief on the same proposition.
    pub async fn insert_belief(&self, belief: Belief) -> Option<Belief> {
        let _guard = self.proposition_lock(belief.proposition()).await;
        let previous = self.store.write().await.put(belief.clone());
        match &previous {
            Some(prev) => self.emit_updated(prev.clone(), belief),
            None => self.emit(EventKind::BeliefFormed { belief }),
        }
        previous
    }

    // ==================== Internals ====================

    async fn active_frame(&self) -> (Arc<Frame>, u64) {
        let active = self.frame.read().await;
        (active.frame.clone(), active.epoch)
    }

    async fn current_epoch(&self) -> u64 {
        self.frame.read().await.epoch
    }

    async fn belief_entry(&self, proposition: &Proposition) -> Option<StoredBelief> {
        self.store.read().await.entry(proposition).cloned()
    }

    /// Acquire the update lock of one proposition.
    async fn proposition_lock(&self, proposition: &Proposition) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(proposition.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    fn emit(&self, kind: EventKind) {
        self.observer
            .on_event(&EpistemicEvent::new(self.id.clone(), kind));
    }

    fn emit_updated(&self, previous: Belief, current: Belief) {
        debug!(
            "Agent {}: {} {:.3} -> {:.3}",
            self.id,
            current.proposition(),
            previous.confidence(),
            current.confidence()
        );
        self.observer
            .on_event(&EpistemicEvent::belief_updated(self.id.clone(), previous, current));
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::{RecordingObserver, sentiment_agents, tool_evidence};
    use doxa_domain::{FrameKind, FrameStrategy, Justification, NeutralScorer, Perception};

    #[tokio::test]
    async fn test_beliefs_threshold_is_inclusive() {
        let agent = Agent::new("alpha", Frame::new(FrameKind::Moderator), Arc::new(NeutralScorer));
        for (p, c) in [("A", 0.6), ("B", 0.59), ("C", 0.9)] {
            agent
                .insert_belief(Belief::new(Proposition::new(p), c, Justification::new()))
                .await;
        }
        let props: Vec<String> = agent
            .beliefs(0.6)
            .await
            .iter()
            .map(|b| b.proposition().to_string())
            .collect();
        assert_eq!(props, vec!["A", "C"]);
        assert!(agent.belief(&Proposition::new("B")).await.is_some());
        assert!(agent.belief(&Proposition::new("Z")).await.is_none());
    }

    #[tokio::test]
    async fn test_shareable_and_prune_use_thresholds() {
        let observer = Arc::new(RecordingObserver::new());
        let settings = AgentSettings::default().with_thresholds(
            ConfidenceThresholds::default()
                .with_communication(0.5)
                .with_retention(0.2),
        );
        let agent = Agent::new("alpha", Frame::new(FrameKind::Moderator), Arc::new(NeutralScorer))
            .with_settings(settings)
            .with_observer(observer.clone());
        for (p, c) in [("Keep", 0.8), ("Quiet", 0.3), ("Drop", 0.1)] {
            agent
                .insert_belief(Belief::new(Proposition::new(p), c, Justification::new()))
                .await;
        }

        let shareable = agent.shareable_beliefs().await;
        assert_eq!(shareable.len(), 1);
        assert_eq!(shareable[0].proposition().as_str(), "Keep");

        let pruned = agent.prune().await;
        assert_eq!(pruned.len(), 1);
        assert_eq!(pruned[0].proposition().as_str(), "Drop");
        assert_eq!(agent.beliefs(0.0).await.len(), 2);
        assert_eq!(observer.count("belief_pruned"), 1);
    }

    #[tokio::test]
    async fn test_insert_belief_emits_formed_then_updated() {
        let observer = Arc::new(RecordingObserver::new());
        let agent = Agent::new("alpha", Frame::new(FrameKind::Moderator), Arc::new(NeutralScorer))
            .with_observer(observer.clone());
        let p = Proposition::new("X");
        assert!(agent.insert_belief(Belief::new(p.clone(), 0.4, Justification::new())).await.is_none());
        let previous = agent.insert_belief(Belief::new(p, 0.7, Justification::new())).await;
        assert_eq!(previous.unwrap().confidence(), 0.4);
        assert_eq!(observer.types(), vec!["belief_formed", "belief_updated"]);
        assert!(observer.events().iter().all(|e| e.entity_id.as_str() == "alpha"));
    }

    #[tokio::test]
    async fn test_snapshot_is_a_copy() {
        let (alpha, _beta) = sentiment_agents(FrameKind::Advocate, FrameKind::Critic).await;
        let snapshot = alpha.snapshot().await;
        assert_eq!(snapshot.id.as_str(), "alpha");
        assert_eq!(snapshot.frame.kind(), FrameKind::Advocate);
        assert_eq!(snapshot.beliefs.len(), 1);

        alpha
            .perceive(
                Perception::new("probe", "more")
                    .with_proposition("Other")
                    .with_element(tool_evidence(0.9)),
            )
            .await;
        assert_eq!(snapshot.beliefs.len(), 1);
        assert_eq!(alpha.snapshot().await.beliefs.len(), 2);
    }

    #[tokio::test]
    async fn test_context_is_bounded() {
        let agent = Agent::new("alpha", Frame::new(FrameKind::Moderator), Arc::new(NeutralScorer))
            .with_settings(AgentSettings::default().with_context_capacity(2));
        let report = agent
            .perceive(
                Perception::new("probe", "ctx")
                    .with_context("a", "1")
                    .with_context("b", "2")
                    .with_context("c", "3"),
            )
            .await;
        assert_eq!(report.evicted_context, 1);
        let keys: Vec<String> = agent.context().await.into_iter().map(|e| e.key).collect();
        assert_eq!(keys, vec!["b", "c"]);
    }
}
