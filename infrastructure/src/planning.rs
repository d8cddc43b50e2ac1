//! Minimal planner adapter.

use async_trait::async_trait;
use doxa_application::ports::planner::{Planner, PlannerError};
use doxa_domain::{Belief, Goal, Plan};
use tracing::debug;

/// Proposes a single step that pursues the goal directly.
///
/// Plan synthesis proper belongs to an external planner; this adapter only
/// gives the confidence gate something to hand its basis to.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleStepPlanner;

impl SingleStepPlanner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Planner for SingleStepPlanner {
    async fn plan(&self, goal: &Goal, basis: &[Belief]) -> Result<Option<Plan>, PlannerError> {
        if goal.description.trim().is_empty() {
            return Ok(None);
        }

        let step = if basis.is_empty() {
            goal.description.clone()
        } else {
            let relied_on: Vec<&str> = basis.iter().map(|b| b.proposition().as_str()).collect();
            format!("{} (relying on {})", goal.description, relied_on.join(", "))
        };
        debug!("Single-step plan: {}", step);

        Ok(Some(
            Plan::new(goal.description.clone())
                .with_step(step)
                .with_basis(basis.to_vec()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doxa_domain::{Justification, Proposition};

    #[tokio::test]
    async fn test_single_step_plan_names_its_basis() {
        let basis = vec![
            Belief::new(Proposition::new("TestsPass"), 0.9, Justification::new()),
            Belief::new(Proposition::new("ApiIsFast"), 0.8, Justification::new()),
        ];
        let plan = SingleStepPlanner::new()
            .plan(&Goal::new("deploy"), &basis)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(plan.goal, "deploy");
        assert_eq!(plan.steps, vec!["deploy (relying on TestsPass, ApiIsFast)"]);
        assert_eq!(plan.basis.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_goal_yields_no_plan() {
        let plan = SingleStepPlanner::new().plan(&Goal::new("  "), &[]).await.unwrap();
        assert!(plan.is_none());
    }
}
