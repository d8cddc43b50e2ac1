//! Negotiate use case
//!
//! Drives repeated rounds of conflict detection and justification exchange
//! between two agents, then escalates whatever survives to an arbiter frame.
//!
//! ```text
//! round 1..=max_rounds:
//!     detect (bidirectional) ── none ──▶ stop
//!        │
//!     exchange every conflict in parallel
//!        │
//!     all persistent? ── yes (stop_on_persistent) ──▶ stop
//! remaining conflicts ──▶ arbiter verdicts (optional)
//! ```

use crate::config::NegotiationParams;
use crate::ports::observer::{BeliefObserver, NoObserver};
use crate::use_cases::agent::{Agent, AgentError};
use doxa_domain::conflict::{arbitrate, detect_conflicts_bidirectional};
use doxa_domain::{
    AgentId, ArbitrationVerdict, BeliefView, ConflictId, ConflictResolutionOutcome, DomainError,
    EpistemicConflict, EpistemicEvent, EventKind, EvidenceScorer, Frame, FrameStrategy,
    ResolutionType,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Errors that can occur during negotiation
#[derive(Error, Debug)]
pub enum NegotiationError {
    #[error("An agent cannot negotiate with itself ({0})")]
    SameAgent(AgentId),

    #[error("Negotiation needs at least one round")]
    NoRounds,

    #[error("Invalid arbiter: {0}")]
    InvalidArbiter(#[from] DomainError),
}

/// One detect → exchange round.
#[derive(Debug, Clone, Serialize)]
pub struct NegotiationRound {
    /// 1-based round number
    pub index: usize,
    /// Outcomes, oriented with the first agent as side A
    pub outcomes: Vec<ConflictResolutionOutcome>,
    /// Conflicts whose exchange failed, with the reason
    pub failures: Vec<(ConflictId, String)>,
}

impl NegotiationRound {
    pub fn all_persistent(&self) -> bool {
        !self.outcomes.is_empty()
            && self.failures.is_empty()
            && self
                .outcomes
                .iter()
                .all(|o| o.resolution_type == ResolutionType::PersistentDisagreement)
    }

    pub fn converged(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }
}

/// Everything a negotiation did.
#[derive(Debug, Clone, Serialize)]
pub struct NegotiationReport {
    pub agent_a: AgentId,
    pub agent_b: AgentId,
    pub rounds: Vec<NegotiationRound>,
    /// Conflicts still present after the last round
    pub remaining: Vec<EpistemicConflict>,
    /// Arbiter verdicts on the remaining conflicts
    pub verdicts: Vec<ArbitrationVerdict>,
}

impl NegotiationReport {
    pub fn is_settled(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn outcomes(&self) -> impl Iterator<Item = &ConflictResolutionOutcome> {
        self.rounds.iter().flat_map(|r| r.outcomes.iter())
    }
}

/// Use case for negotiating conflicts between two agents
pub struct NegotiateUseCase {
    params: NegotiationParams,
    arbiter_scorer: Arc<dyn EvidenceScorer>,
    observer: Arc<dyn BeliefObserver>,
}

impl NegotiateUseCase {
    pub fn new(params: NegotiationParams, arbiter_scorer: Arc<dyn EvidenceScorer>) -> Self {
        Self {
            params,
            arbiter_scorer,
            observer: Arc::new(NoObserver),
        }
    }

    /// Observer receiving the arbiter's verdict events.
    pub fn with_observer(mut self, observer: Arc<dyn BeliefObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn params(&self) -> &NegotiationParams {
        &self.params
    }

    /// Execute the use case
    pub async fn execute(
        &self,
        a: Arc<Agent>,
        b: Arc<Agent>,
    ) -> Result<NegotiationReport, NegotiationError> {
        if a.id() == b.id() {
            return Err(NegotiationError::SameAgent(a.id().clone()));
        }
        if self.params.max_rounds == 0 {
            return Err(NegotiationError::NoRounds);
        }
        let arbiter = if self.params.escalate {
            Some(Frame::named(&self.params.arbiter)?)
        } else {
            None
        };

        info!(
            "Starting negotiation between {} and {} (max {} rounds)",
            a.id(),
            b.id(),
            self.params.max_rounds
        );

        let mut rounds = Vec::new();
        for index in 1..=self.params.max_rounds {
            let conflicts = a.detect_conflicts_bidirectional(&b).await;
            if conflicts.is_empty() {
                debug!("Round {}: no conflicts left", index);
                break;
            }

            let round = self.run_round(index, conflicts, &a, &b).await;
            info!(
                "Round {}: {} exchanges, {} converged, {} failed",
                index,
                round.outcomes.len(),
                round.converged(),
                round.failures.len()
            );
            let stalled = self.params.stop_on_persistent && round.all_persistent();
            rounds.push(round);
            if stalled {
                info!("Round {}: only persistent disagreement left, stopping", index);
                break;
            }
        }

        let remaining = remaining_conflicts(&a, &b).await;
        let verdicts = match &arbiter {
            Some(arbiter) if !remaining.is_empty() => {
                self.escalate(arbiter, &remaining, &a, &b).await
            }
            _ => Vec::new(),
        };

        Ok(NegotiationReport {
            agent_a: a.id().clone(),
            agent_b: b.id().clone(),
            rounds,
            remaining,
            verdicts,
        })
    }

    /// Exchange every conflict of one round in parallel.
    async fn run_round(
        &self,
        index: usize,
        conflicts: Vec<EpistemicConflict>,
        a: &Arc<Agent>,
        b: &Arc<Agent>,
    ) -> NegotiationRound {
        let mut join_set = JoinSet::new();
        for (position, conflict) in conflicts.into_iter().enumerate() {
            let a = Arc::clone(a);
            let b = Arc::clone(b);
            join_set.spawn(async move {
                let result: Result<ConflictResolutionOutcome, AgentError> =
                    a.exchange_justifications(&conflict, &b).await;
                (position, conflict.id, result)
            });
        }

        let mut results = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => warn!("Exchange task join error: {}", e),
            }
        }
        results.sort_by_key(|(position, _, _)| *position);

        let mut round = NegotiationRound {
            index,
            outcomes: Vec::new(),
            failures: Vec::new(),
        };
        for (_, conflict_id, result) in results {
            match result {
                Ok(outcome) => round.outcomes.push(outcome),
                Err(e) => {
                    warn!("Exchange on conflict {} failed: {}", conflict_id, e);
                    round.failures.push((conflict_id, e.to_string()));
                }
            }
        }
        round
    }

    async fn escalate(
        &self,
        arbiter: &Frame,
        remaining: &[EpistemicConflict],
        a: &Agent,
        b: &Agent,
    ) -> Vec<ArbitrationVerdict> {
        let frame_a = a.frame().await.kind();
        let frame_b = b.frame().await.kind();
        let arbiter_id = AgentId::new(arbiter.name());

        let mut verdicts = Vec::with_capacity(remaining.len());
        for conflict in remaining {
            let verdict = arbitrate(
                arbiter,
                conflict,
                frame_a,
                frame_b,
                self.params.arbitration_margin,
                self.arbiter_scorer.as_ref(),
            )
            .await;
            info!("Arbitration: {}", verdict);
            self.observer.on_event(&EpistemicEvent::new(
                arbiter_id.clone(),
                EventKind::Arbitrated {
                    verdict: verdict.clone(),
                },
            ));
            verdicts.push(verdict);
        }
        verdicts
    }
}

/// Conflicts between the current states of `a` and `b`, without emitting
/// detection events a second time.
async fn remaining_conflicts(a: &Agent, b: &Agent) -> Vec<EpistemicConflict> {
    let own = a.snapshot().await;
    let theirs = b.snapshot().await;
    detect_conflicts_bidirectional(
        BeliefView::new(&own.id, &own.beliefs, own.thresholds.conflict),
        BeliefView::new(&theirs.id, &theirs.beliefs, theirs.thresholds.conflict),
    )
}
