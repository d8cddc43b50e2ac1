//! Plans and the confidence-gated planning outcome.

use crate::belief::Belief;
use crate::core::proposition::Proposition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A sequence of steps toward a goal, with the beliefs it rests on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub goal: String,
    pub steps: Vec<String>,
    /// Beliefs that cleared the action threshold when the plan was made
    #[serde(default)]
    pub basis: Vec<Belief>,
}

impl Plan {
    pub fn new(goal: impl Into<String>) -> Self {
        Self {
            goal: goal.into(),
            steps: Vec::new(),
            basis: Vec::new(),
        }
    }

    pub fn with_step(mut self, step: impl Into<String>) -> Self {
        self.steps.push(step.into());
        self
    }

    pub fn with_basis(mut self, basis: Vec<Belief>) -> Self {
        self.basis = basis;
        self
    }
}

/// What an agent's planning gate decided.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlanningOutcome {
    Ready { plan: Plan },
    /// A relevant belief is below the action threshold
    Blocked {
        proposition: Proposition,
        confidence: f64,
        threshold: f64,
    },
    /// The agent holds no belief on a proposition the goal depends on
    MissingBelief { proposition: Proposition },
    /// Every belief cleared the gate but the planner produced nothing
    NoPlan,
}

impl PlanningOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, PlanningOutcome::Ready { .. })
    }

    pub fn plan(&self) -> Option<&Plan> {
        match self {
            PlanningOutcome::Ready { plan } => Some(plan),
            _ => None,
        }
    }

    pub fn into_plan(self) -> Option<Plan> {
        match self {
            PlanningOutcome::Ready { plan } => Some(plan),
            _ => None,
        }
    }
}

impl fmt::Display for PlanningOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanningOutcome::Ready { plan } => {
                write!(f, "ready: {} ({} steps)", plan.goal, plan.steps.len())
            }
            PlanningOutcome::Blocked {
                proposition,
                confidence,
                threshold,
            } => write!(
                f,
                "blocked: {} at {:.2} is below the action threshold {:.2}",
                proposition, confidence, threshold
            ),
            PlanningOutcome::MissingBelief { proposition } => {
                write!(f, "blocked: no belief on {}", proposition)
            }
            PlanningOutcome::NoPlan => write!(f, "no plan"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let ready = PlanningOutcome::Ready {
            plan: Plan::new("deploy").with_step("run migrations"),
        };
        assert!(ready.is_ready());
        assert_eq!(ready.plan().unwrap().steps.len(), 1);
        assert_eq!(ready.to_string(), "ready: deploy (1 steps)");

        let blocked = PlanningOutcome::Blocked {
            proposition: Proposition::new("TestsPass"),
            confidence: 0.42,
            threshold: 0.7,
        };
        assert!(!blocked.is_ready());
        assert!(blocked.clone().into_plan().is_none());
        assert!(blocked.to_string().contains("0.42"));
    }
}
