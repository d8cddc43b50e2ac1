//! Serializable scenario reports handed to the formatters

use doxa_application::{AgentSnapshot, FrameSwitchReport, NegotiationReport};
use doxa_domain::{
    AgentId, Belief, ConflictResolutionOutcome, EpistemicConflict, FrameStrategy, PlanningOutcome,
};
use serde::Serialize;

/// An agent's frame and beliefs at the end of a scenario.
#[derive(Debug, Clone, Serialize)]
pub struct AgentSummary {
    pub agent: AgentId,
    pub frame: String,
    /// Beliefs sorted by proposition
    pub beliefs: Vec<Belief>,
    /// What the planning gate decided for the scenario goal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlanningOutcome>,
}

impl AgentSummary {
    pub fn from_snapshot(snapshot: &AgentSnapshot) -> Self {
        let mut beliefs: Vec<Belief> = snapshot.beliefs.iter().cloned().collect();
        beliefs.sort_by(|a, b| a.proposition().cmp(b.proposition()));
        Self {
            agent: snapshot.id.clone(),
            frame: snapshot.frame.name().to_string(),
            beliefs,
            plan: None,
        }
    }

    pub fn with_plan(mut self, plan: PlanningOutcome) -> Self {
        self.plan = Some(plan);
        self
    }
}

/// One step of a frame-switch scenario.
#[derive(Debug, Clone, Serialize)]
pub struct FrameStep {
    pub from: String,
    pub to: String,
    pub recomputed: usize,
    /// Beliefs whose confidence changed with the switch
    pub changed: Vec<Belief>,
}

impl From<FrameSwitchReport> for FrameStep {
    fn from(report: FrameSwitchReport) -> Self {
        Self {
            from: report.from,
            to: report.to,
            recomputed: report.recomputed,
            changed: report.changed,
        }
    }
}

/// The result of one CLI scenario run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "scenario", rename_all = "kebab-case")]
pub enum ScenarioReport {
    /// Single detect → exchange pass between two agents
    Conflict {
        conflicts: Vec<EpistemicConflict>,
        outcomes: Vec<ConflictResolutionOutcome>,
        agents: Vec<AgentSummary>,
    },
    /// Multi-round negotiation with arbitration
    Debate {
        negotiation: NegotiationReport,
        agents: Vec<AgentSummary>,
    },
    /// One agent re-reading its beliefs under several frames
    FrameSwitch {
        initial: AgentSummary,
        steps: Vec<FrameStep>,
        r#final: AgentSummary,
    },
}

impl ScenarioReport {
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioReport::Conflict { .. } => "conflict",
            ScenarioReport::Debate { .. } => "debate",
            ScenarioReport::FrameSwitch { .. } => "frame-switch",
        }
    }

    /// Whether no conflict is left unresolved at the end of the run.
    pub fn is_settled(&self) -> bool {
        match self {
            ScenarioReport::Conflict { outcomes, .. } => outcomes.iter().all(|o| o.success),
            ScenarioReport::Debate { negotiation, .. } => negotiation.is_settled(),
            ScenarioReport::FrameSwitch { .. } => true,
        }
    }
}
