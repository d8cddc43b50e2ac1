//! Conflict detection against another agent and the justification exchange.
//!
//! The initiating agent computes the outcome from snapshots of both sides,
//! commits its own update, and then delivers the counterpart's update as a
//! [`ResolutionNotice`]. No agent holds a lock while calling into another.

use super::{Agent, AgentError, ResolutionNotice};
use doxa_domain::conflict::{detect_conflicts, detect_conflicts_bidirectional};
use doxa_domain::{
    Belief, BeliefView, ConflictResolutionOutcome, EpistemicConflict, EventKind, ExchangeParty,
};
use tracing::{info, warn};

impl Agent {
    /// Conflicts between this agent's beliefs and `other`'s negations, each
    /// side judged against its own conflict threshold.
    pub async fn detect_conflicts(&self, other: &Agent) -> Vec<EpistemicConflict> {
        let own = self.snapshot().await;
        let theirs = other.snapshot().await;

        let conflicts = detect_conflicts(
            BeliefView::new(&own.id, &own.beliefs, own.thresholds.conflict),
            BeliefView::new(&theirs.id, &theirs.beliefs, theirs.thresholds.conflict),
        );
        self.report_conflicts(&conflicts);
        conflicts
    }

    /// Like [`detect_conflicts`](Self::detect_conflicts), also catching
    /// conflicts only visible from `other`'s side. Every conflict is
    /// oriented with this agent as side A.
    pub async fn detect_conflicts_bidirectional(&self, other: &Agent) -> Vec<EpistemicConflict> {
        let own = self.snapshot().await;
        let theirs = other.snapshot().await;

        let conflicts = detect_conflicts_bidirectional(
            BeliefView::new(&own.id, &own.beliefs, own.thresholds.conflict),
            BeliefView::new(&theirs.id, &theirs.beliefs, theirs.thresholds.conflict),
        );
        self.report_conflicts(&conflicts);
        conflicts
    }

    fn report_conflicts(&self, conflicts: &[EpistemicConflict]) {
        for conflict in conflicts {
            info!("Agent {} detected conflict: {}", self.id, conflict);
            self.emit(EventKind::ConflictDetected {
                conflict: conflict.clone(),
            });
        }
    }

    /// Run one round of justification exchange on `conflict` with `other`.
    ///
    /// Uses the current beliefs on both sides (they may have moved since
    /// detection). The returned outcome is oriented with this agent as
    /// side A.
    pub async fn exchange_justifications(
        &self,
        conflict: &EpistemicConflict,
        other: &Agent,
    ) -> Result<ConflictResolutionOutcome, AgentError> {
        if !conflict.involves(&self.id) {
            return Err(AgentError::NotInvolved {
                agent: self.id.clone(),
                conflict: conflict.id.clone(),
            });
        }
        let conflict = if conflict.agent_a == self.id {
            conflict.clone()
        } else {
            conflict.swapped()
        };
        if conflict.agent_b != other.id {
            return Err(AgentError::CounterpartMismatch {
                expected: conflict.agent_b.clone(),
                actual: other.id.clone(),
            });
        }

        let own_proposition = conflict.belief_a.proposition();
        let their_proposition = conflict.belief_b.proposition();
        let own_entry = self.belief_entry(own_proposition).await.ok_or_else(|| {
            AgentError::BeliefMissing {
                agent: self.id.clone(),
                proposition: own_proposition.clone(),
            }
        })?;
        let their_entry = other.belief_entry(their_proposition).await.ok_or_else(|| {
            AgentError::BeliefMissing {
                agent: other.id.clone(),
                proposition: their_proposition.clone(),
            }
        })?;

        let own_frame = self.frame().await;
        let their_frame = other.frame().await;

        let outcome = self
            .resolution
            .resolve(
                &conflict,
                ExchangeParty {
                    agent: &self.id,
                    frame: own_frame.as_ref(),
                    belief: &own_entry.belief,
                    conflict_threshold: self.settings.thresholds.conflict,
                    scorer: self.scorer.as_ref(),
                },
                ExchangeParty {
                    agent: &other.id,
                    frame: their_frame.as_ref(),
                    belief: &their_entry.belief,
                    conflict_threshold: other.settings.thresholds.conflict,
                    scorer: other.scorer.as_ref(),
                },
            )
            .await;

        info!(
            "Agent {} exchanged justifications with {} on {}: {} ({})",
            self.id,
            other.id,
            own_proposition,
            outcome.resolution_type,
            outcome.reason
        );
        self.emit(EventKind::JustificationExchanged {
            outcome: outcome.clone(),
        });

        if let Some(updated) = &outcome.updated_belief_a {
            self.commit_resolution(updated, Some(own_entry.revision)).await?;
        }

        let notice = ResolutionNotice {
            outcome: outcome.clone(),
            basis_revision: Some(their_entry.revision),
        };
        if let Err(e) = other.receive_resolution(&notice).await {
            warn!(
                "Agent {} could not apply the exchange result from {}: {}",
                other.id, self.id, e
            );
        }

        Ok(outcome)
    }

    /// Apply the update an exchange initiator computed for this agent.
    ///
    /// Returns the applied belief, or `None` if the outcome carries no
    /// update for this agent.
    pub async fn receive_resolution(
        &self,
        notice: &ResolutionNotice,
    ) -> Result<Option<Belief>, AgentError> {
        let outcome = &notice.outcome;
        if outcome.agent_a != self.id && outcome.agent_b != self.id {
            return Err(AgentError::NotInvolved {
                agent: self.id.clone(),
                conflict: outcome.conflict_id.clone(),
            });
        }
        match outcome.update_for(&self.id) {
            Some(updated) => {
                self.commit_resolution(updated, notice.basis_revision).await?;
                Ok(Some(updated.clone()))
            }
            None => Ok(None),
        }
    }

    /// Write an exchange result if the entry is still at `expected` revision.
    async fn commit_resolution(
        &self,
        updated: &Belief,
        expected: Option<u64>,
    ) -> Result<(), AgentError> {
        let proposition = updated.proposition();
        let _guard = self.proposition_lock(proposition).await;
        let committed = self
            .store
            .write()
            .await
            .replace_if_unchanged(updated.clone(), expected);

        match committed {
            Ok(Some(previous)) => {
                self.emit_updated(previous, updated.clone());
                Ok(())
            }
            Ok(None) => {
                self.emit(EventKind::BeliefFormed {
                    belief: updated.clone(),
                });
                Ok(())
            }
            Err(_) => {
                warn!(
                    "Agent {}: {} changed during the exchange, discarding result",
                    self.id, proposition
                );
                Err(AgentError::StaleBelief {
                    proposition: proposition.clone(),
                })
            }
        }
    }
}
