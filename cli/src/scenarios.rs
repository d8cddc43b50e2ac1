//! Demo scenarios run by the binary

use anyhow::{Context, Result, bail};
use doxa_application::{
    Agent, AgentSettings, BeliefObserver, NegotiateUseCase, NegotiationParams, Planner,
};
use doxa_domain::{EvidenceScorer, Frame, Goal, JustificationElement, Perception, Proposition};
use doxa_infrastructure::FileConfig;
use doxa_presentation::{AgentSummary, FrameStep, ScenarioReport};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, warn};

const DEFAULT_FRAME_SEQUENCE: [&str; 3] = ["efficiency", "thoroughness", "efficiency"];

/// Everything a scenario needs to build agents.
pub struct ScenarioEnv {
    pub config: FileConfig,
    pub settings: AgentSettings,
    pub params: NegotiationParams,
    pub scorer: Arc<dyn EvidenceScorer>,
    pub observer: Arc<dyn BeliefObserver>,
    pub planner: Arc<dyn Planner>,
}

impl ScenarioEnv {
    /// The named frame with configured overrides applied.
    fn frame(&self, name: &str) -> Result<Frame> {
        self.config
            .frame(name)
            .with_context(|| format!("Cannot use frame '{}'", name))
    }

    fn agent(&self, id: &str, frame: Frame) -> Arc<Agent> {
        Arc::new(
            Agent::new(id, frame, Arc::clone(&self.scorer))
                .with_settings(self.settings)
                .with_observer(Arc::clone(&self.observer))
                .with_planner(Arc::clone(&self.planner)),
        )
    }
}

/// Feed every perception to its agent concurrently.
async fn perceive_all(perceptions: Vec<(Arc<Agent>, Perception)>) {
    let mut join_set = JoinSet::new();
    for (agent, perception) in perceptions {
        join_set.spawn(async move {
            let report = agent.perceive(perception).await;
            (agent.id().clone(), report)
        });
    }
    while let Some(result) = join_set.join_next().await {
        match result {
            Ok((id, report)) => info!(
                "Agent {} perceived: {} formed, {} updated",
                id,
                report.formed.len(),
                report.updated.len()
            ),
            Err(e) => warn!("Perception task failed: {}", e),
        }
    }
}

async fn summarize(agent: &Agent, goal: Option<&Goal>) -> AgentSummary {
    let summary = AgentSummary::from_snapshot(&agent.snapshot().await);
    let Some(goal) = goal else {
        return summary;
    };
    match agent.plan(goal).await {
        Ok(outcome) => summary.with_plan(outcome),
        Err(e) => {
            warn!("Agent {} could not plan: {}", agent.id(), e);
            summary
        }
    }
}

/// Two agents read opposite evidence about customer sentiment, then run one
/// justification exchange per detected conflict.
pub async fn conflict(
    env: &ScenarioEnv,
    frame_a: Option<&str>,
    frame_b: Option<&str>,
) -> Result<ScenarioReport> {
    let optimist = env.agent("optimist", env.frame(frame_a.unwrap_or("efficiency"))?);
    let skeptic = env.agent("skeptic", env.frame(frame_b.unwrap_or("security"))?);
    let claim = Proposition::new("SentimentIsPositive");

    perceive_all(vec![
        (
            Arc::clone(&optimist),
            Perception::new("sentiment-classifier", "weekly review sentiment run")
                .with_element(JustificationElement::tool_result(
                    "sentiment-classifier",
                    "sentiment positive, score 0.91",
                ))
                .with_proposition(claim.clone())
                .with_context("week", "42"),
        ),
        (
            Arc::clone(&skeptic),
            Perception::new("support-inbox", "support ticket triage")
                .with_element(JustificationElement::observation(
                    "support-inbox",
                    "ticket volume up, sentiment negative, several failed checkouts",
                ))
                .with_proposition(claim.negate())
                .with_context("week", "42"),
        ),
    ])
    .await;

    let conflicts = optimist.detect_conflicts(&skeptic).await;
    let mut outcomes = Vec::with_capacity(conflicts.len());
    for conflict in &conflicts {
        match optimist.exchange_justifications(conflict, &skeptic).await {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => warn!("Exchange on {} failed: {}", conflict.id, e),
        }
    }

    let goal = Goal::new("publish the customer newsletter").requires(claim);
    let agents = vec![
        summarize(&optimist, Some(&goal)).await,
        summarize(&skeptic, None).await,
    ];

    Ok(ScenarioReport::Conflict {
        conflicts,
        outcomes,
        agents,
    })
}

/// An advocate and a critic disagree on a cache rollout; they negotiate and
/// the configured arbiter weighs in on whatever is left.
pub async fn debate(
    env: &ScenarioEnv,
    frame_a: Option<&str>,
    frame_b: Option<&str>,
) -> Result<ScenarioReport> {
    let advocate = env.agent("advocate", env.frame(frame_a.unwrap_or("advocate"))?);
    let critic = env.agent("critic", env.frame(frame_b.unwrap_or("critic"))?);

    let cache_safe = Proposition::new("CacheIsSafe");
    let rollout_ready = Proposition::new("RolloutIsReady");
    let latency_ok = Proposition::new("LatencyIsAcceptable");

    perceive_all(vec![
        (
            Arc::clone(&advocate),
            Perception::new("load-test", "cache load test")
                .with_element(JustificationElement::inference(
                    "load-test",
                    "cache safe: load test passed, hit ratio stable",
                ))
                .with_proposition(cache_safe.clone()),
        ),
        (
            Arc::clone(&advocate),
            Perception::new("release-board", "release checklist")
                .with_element(JustificationElement::testimony(
                    "release-manager",
                    "rollout ready, checklist confirmed green",
                ))
                .with_proposition(rollout_ready.clone()),
        ),
        (
            Arc::clone(&advocate),
            Perception::new("benchmark", "latency benchmark")
                .with_element(
                    JustificationElement::tool_result(
                        "benchmark",
                        "latency acceptable, p99 under budget, fast",
                    )
                    .with_tag("performance"),
                )
                .with_proposition(latency_ok),
        ),
        (
            Arc::clone(&critic),
            Perception::new("staging", "staging incident log")
                .with_element(JustificationElement::observation(
                    "staging",
                    "cache served stale auth token, error on logout",
                ))
                .with_proposition(cache_safe.negate()),
        ),
        (
            Arc::clone(&critic),
            Perception::new("ci", "pipeline status")
                .with_element(JustificationElement::tool_result(
                    "ci",
                    "rollout blocked, integration suite failed",
                ))
                .with_proposition(rollout_ready.negate()),
        ),
    ])
    .await;

    let negotiation = NegotiateUseCase::new(env.params.clone(), Arc::clone(&env.scorer))
        .with_observer(Arc::clone(&env.observer))
        .execute(Arc::clone(&advocate), Arc::clone(&critic))
        .await?;

    let goal = Goal::new("enable the cache in production")
        .requires(cache_safe)
        .requires(rollout_ready);
    let agents = vec![
        summarize(&advocate, Some(&goal)).await,
        summarize(&critic, Some(&goal)).await,
    ];

    Ok(ScenarioReport::Debate {
        negotiation,
        agents,
    })
}

/// One agent collects evidence about its build, then re-reads it under
/// each frame of `frames` in turn.
pub async fn frame_switch(env: &ScenarioEnv, frames: &[String]) -> Result<ScenarioReport> {
    let sequence: Vec<&str> = if frames.is_empty() {
        DEFAULT_FRAME_SEQUENCE.to_vec()
    } else {
        frames.iter().map(String::as_str).collect()
    };
    let Some((first, rest)) = sequence.split_first() else {
        bail!("Frame sequence is empty");
    };
    let targets = rest
        .iter()
        .map(|name| env.frame(name))
        .collect::<Result<Vec<_>>>()?;

    let agent = env.agent("solo", env.frame(first)?);
    let build_fast = Proposition::new("BuildIsFast");
    let build_tested = Proposition::new("BuildIsTested");

    agent
        .perceive(
            Perception::new("ci", "nightly build report")
                .with_element(
                    JustificationElement::tool_result("benchmark", "build p99 latency 40 ms, fast")
                        .with_tag("performance"),
                )
                .with_element(
                    JustificationElement::observation(
                        "coverage",
                        "coverage report incomplete, tests failed on edge cases",
                    )
                    .with_tag("coverage"),
                )
                .with_proposition(build_fast.clone())
                .with_proposition(build_tested),
        )
        .await;

    let initial = summarize(&agent, None).await;
    let mut steps = Vec::with_capacity(targets.len());
    for frame in targets {
        steps.push(FrameStep::from(agent.set_frame(frame).await));
    }

    let goal = Goal::new("cut the release").requires(build_fast);
    let r#final = summarize(&agent, Some(&goal)).await;

    Ok(ScenarioReport::FrameSwitch {
        initial,
        steps,
        r#final,
    })
}
