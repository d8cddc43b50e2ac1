//! Confidence-gated planning.

use super::{Agent, AgentError};
use doxa_domain::{FrameStrategy, Goal, PlanningOutcome, Stimulus};
use tracing::{debug, info};

impl Agent {
    /// Plan toward `goal` if every belief it depends on clears the action
    /// threshold.
    ///
    /// The first relevant proposition without a belief, or with a belief
    /// below the threshold, blocks planning; the planner is never consulted
    /// in that case.
    pub async fn plan(&self, goal: &Goal) -> Result<PlanningOutcome, AgentError> {
        let frame = self.frame().await;
        let threshold = self.settings.thresholds.action;
        let propositions = frame
            .relevant_propositions(Stimulus::Goal(goal), self.scorer.as_ref())
            .await;

        let mut basis = Vec::with_capacity(propositions.len());
        for proposition in propositions {
            let Some(belief) = self.belief(&proposition).await else {
                debug!("Agent {}: no belief on {}, planning blocked", self.id, proposition);
                return Ok(PlanningOutcome::MissingBelief { proposition });
            };
            if !belief.meets(threshold) {
                debug!(
                    "Agent {}: {} at {:.3} below action threshold {:.2}",
                    self.id,
                    proposition,
                    belief.confidence(),
                    threshold
                );
                return Ok(PlanningOutcome::Blocked {
                    proposition,
                    confidence: belief.confidence(),
                    threshold,
                });
            }
            basis.push(belief);
        }

        match self.planner.plan(goal, &basis).await? {
            Some(plan) => {
                info!(
                    "Agent {} planned '{}' in {} steps",
                    self.id,
                    plan.goal,
                    plan.steps.len()
                );
                Ok(PlanningOutcome::Ready { plan })
            }
            None => Ok(PlanningOutcome::NoPlan),
        }
    }
}
