//! Planner port
//!
//! Plan synthesis is delegated to an adapter; the agent only gates it on
//! belief confidence.

use async_trait::async_trait;
use doxa_domain::{Belief, Goal, Plan};
use thiserror::Error;

/// Errors a planner adapter may report
#[derive(Error, Debug, Clone)]
pub enum PlannerError {
    #[error("Planning failed: {0}")]
    Failed(String),

    #[error("Goal not supported: {0}")]
    Unsupported(String),
}

/// Produces a plan for a goal from beliefs that cleared the action threshold.
#[async_trait]
pub trait Planner: Send + Sync {
    /// `Ok(None)` means the planner has nothing to propose.
    async fn plan(&self, goal: &Goal, basis: &[Belief]) -> Result<Option<Plan>, PlannerError>;
}

/// Planner that never proposes anything.
pub struct NoPlanner;

#[async_trait]
impl Planner for NoPlanner {
    async fn plan(&self, _goal: &Goal, _basis: &[Belief]) -> Result<Option<Plan>, PlannerError> {
        Ok(None)
    }
}
