//! Shared mocks for use case tests.

use crate::ports::observer::BeliefObserver;
use crate::ports::planner::{Planner, PlannerError};
use crate::use_cases::agent::Agent;
use async_trait::async_trait;
use doxa_domain::{
    Belief, EpistemicEvent, EvidenceScorer, Frame, FrameKind, FrameRef, Goal,
    JustificationElement, NeutralScorer, Perception, Plan, Proposition, ScorerError, Stimulus,
};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

// ==================== Evidence ====================

pub fn tool_evidence(strength: f64) -> JustificationElement {
    JustificationElement::tool_result("probe", "measured").with_strength(strength)
}

/// Performance-tagged testimony 0.9 plus an untagged observation 0.2.
pub fn mixed_evidence() -> Vec<JustificationElement> {
    vec![
        JustificationElement::testimony("benchmark-bot", "p99 under 20ms")
            .with_tag("performance")
            .with_strength(0.9),
        JustificationElement::observation("pager", "two timeouts overnight").with_strength(0.2),
    ]
}

/// `alpha` holds SentimentIsPositive at 0.85 (one tool result), `beta`
/// holds ¬SentimentIsPositive at 0.78 (one observation).
pub async fn sentiment_agents(kind_a: FrameKind, kind_b: FrameKind) -> (Agent, Agent) {
    let alpha = Agent::new("alpha", Frame::new(kind_a), Arc::new(NeutralScorer));
    let beta = Agent::new("beta", Frame::new(kind_b), Arc::new(NeutralScorer));
    let p = Proposition::new("SentimentIsPositive");

    alpha
        .perceive(
            Perception::new("sentiment-api", "score 0.91")
                .with_proposition(p.clone())
                .with_element(
                    JustificationElement::tool_result("sentiment-api", "score 0.91").with_strength(0.85),
                ),
        )
        .await;
    beta.perceive(
        Perception::new("reader", "replies are hostile")
            .with_proposition(p.negate())
            .with_element(
                JustificationElement::observation("reader", "replies are hostile").with_strength(0.78),
            ),
    )
    .await;
    (alpha, beta)
}

// ==================== Observer ====================

pub struct RecordingObserver {
    events: Mutex<Vec<EpistemicEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<EpistemicEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn types(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|e| e.event_type()).collect()
    }

    pub fn count(&self, event_type: &str) -> usize {
        self.types().into_iter().filter(|t| *t == event_type).count()
    }
}

impl BeliefObserver for RecordingObserver {
    fn on_event(&self, event: &EpistemicEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

// ==================== Scorer ====================

/// Scorer with scripted extraction, or failing every call.
#[derive(Default)]
pub struct ScriptedScorer {
    extracted: Vec<Proposition>,
    fail: bool,
}

impl ScriptedScorer {
    pub fn failing() -> Self {
        Self {
            extracted: Vec::new(),
            fail: true,
        }
    }

    pub fn extracting(mut self, props: &[&str]) -> Self {
        self.extracted = props.iter().map(|p| Proposition::new(*p)).collect();
        self
    }

    fn check(&self) -> Result<(), ScorerError> {
        if self.fail {
            Err(ScorerError::Unavailable("scripted failure".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl EvidenceScorer for ScriptedScorer {
    async fn score_strength(
        &self,
        _element: &JustificationElement,
        _proposition: &Proposition,
    ) -> Result<f64, ScorerError> {
        self.check().map(|_| 0.5)
    }

    async fn score_saliency(
        &self,
        _element: &JustificationElement,
        _frame: FrameRef<'_>,
    ) -> Result<f64, ScorerError> {
        self.check().map(|_| 0.5)
    }

    async fn extract_propositions(
        &self,
        _stimulus: Stimulus<'_>,
        _frame: FrameRef<'_>,
    ) -> Result<Vec<Proposition>, ScorerError> {
        self.check().map(|_| self.extracted.clone())
    }

    async fn interpret(
        &self,
        perception: &Perception,
        _frame: FrameRef<'_>,
    ) -> Result<Perception, ScorerError> {
        self.check().map(|_| perception.clone())
    }
}

/// Scorer whose strength call blocks until the test releases it.
pub struct GatedScorer {
    entered: Notify,
    release: Notify,
}

impl GatedScorer {
    pub fn new() -> Self {
        Self {
            entered: Notify::new(),
            release: Notify::new(),
        }
    }

    /// Wait until a strength call is in flight.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl EvidenceScorer for GatedScorer {
    async fn score_strength(
        &self,
        _element: &JustificationElement,
        _proposition: &Proposition,
    ) -> Result<f64, ScorerError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(0.8)
    }

    async fn score_saliency(
        &self,
        _element: &JustificationElement,
        _frame: FrameRef<'_>,
    ) -> Result<f64, ScorerError> {
        Ok(0.5)
    }

    async fn extract_propositions(
        &self,
        _stimulus: Stimulus<'_>,
        _frame: FrameRef<'_>,
    ) -> Result<Vec<Proposition>, ScorerError> {
        Ok(Vec::new())
    }

    async fn interpret(
        &self,
        perception: &Perception,
        _frame: FrameRef<'_>,
    ) -> Result<Perception, ScorerError> {
        Ok(perception.clone())
    }
}

// ==================== Planner ====================

pub struct ScriptedPlanner {
    steps: Option<Vec<String>>,
    fail: bool,
    calls: Mutex<usize>,
    last_basis: Mutex<Vec<Proposition>>,
}

impl ScriptedPlanner {
    pub fn proposing(steps: &[&str]) -> Self {
        Self {
            steps: Some(steps.iter().map(|s| s.to_string()).collect()),
            fail: false,
            calls: Mutex::new(0),
            last_basis: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self {
            steps: None,
            ..Self::proposing(&[])
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::proposing(&[])
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    pub fn last_basis(&self) -> Vec<Proposition> {
        self.last_basis.lock().unwrap().clone()
    }
}

#[async_trait]
impl Planner for ScriptedPlanner {
    async fn plan(&self, goal: &Goal, basis: &[Belief]) -> Result<Option<Plan>, PlannerError> {
        *self.calls.lock().unwrap() += 1;
        *self.last_basis.lock().unwrap() = basis.iter().map(|b| b.proposition().clone()).collect();
        if self.fail {
            return Err(PlannerError::Failed("scripted failure".into()));
        }
        Ok(self.steps.as_ref().map(|steps| {
            steps
                .iter()
                .fold(Plan::new(goal.description.clone()), |plan, step| plan.with_step(step.clone()))
                .with_basis(basis.to_vec())
        }))
    }
}
