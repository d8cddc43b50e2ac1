//! Perception pipeline: context → interpret → relevant propositions →
//! form or update beliefs.

use super::{Agent, PerceptionReport};
use doxa_domain::util::truncate_str;
use doxa_domain::{
    Belief, EventKind, Frame, FrameStrategy, Justification, JustificationElement, Perception,
    Proposition, Stimulus,
};
use futures::future::join_all;
use tracing::{debug, info, warn};

/// Maximum perception content carried in a `perception_received` event.
const EVENT_CONTENT_MAX_BYTES: usize = 200;

enum Absorbed {
    Formed(Belief),
    Updated(Belief),
    Discarded(Proposition),
    Unchanged,
}

impl Agent {
    /// Process one perception.
    ///
    /// Existing beliefs on relevant propositions are updated with the
    /// perception's elements; unknown propositions get a fresh belief only
    /// when the perception carries evidence.
    pub async fn perceive(&self, perception: Perception) -> PerceptionReport {
        self.emit(EventKind::PerceptionReceived {
            source: perception.source.clone(),
            content: truncate_str(&perception.content, EVENT_CONTENT_MAX_BYTES).to_string(),
            elements: perception.elements.len(),
        });

        let evicted_context = self
            .context
            .lock()
            .await
            .merge(perception.context.iter().cloned());

        let (frame, epoch) = self.active_frame().await;
        let scorer = self.scorer.as_ref();

        let interpreted = frame.interpret_perception(&perception, scorer).await;
        let propositions = frame
            .relevant_propositions(Stimulus::Perception(&interpreted), scorer)
            .await;

        debug!(
            "Agent {} perceived '{}' from {}: {} relevant propositions under {}",
            self.id,
            truncate_str(&interpreted.content, 60),
            interpreted.source,
            propositions.len(),
            frame
        );

        let results = join_all(
            propositions
                .iter()
                .map(|p| self.absorb(p, &interpreted.elements, &frame, epoch)),
        )
        .await;

        let mut report = PerceptionReport {
            evicted_context,
            ..PerceptionReport::default()
        };
        for result in results {
            match result {
                Absorbed::Formed(b) => report.formed.push(b),
                Absorbed::Updated(b) => report.updated.push(b),
                Absorbed::Discarded(p) => report.discarded.push(p),
                Absorbed::Unchanged => {}
            }
        }

        if report.changed() > 0 {
            info!(
                "Agent {}: {} beliefs formed, {} updated",
                self.id,
                report.formed.len(),
                report.updated.len()
            );
        }
        report
    }

    /// Fold the perception's elements into the belief on one proposition.
    async fn absorb(
        &self,
        proposition: &Proposition,
        elements: &[JustificationElement],
        frame: &Frame,
        epoch: u64,
    ) -> Absorbed {
        if elements.is_empty() {
            return Absorbed::Unchanged;
        }

        let _guard = self.proposition_lock(proposition).await;
        let scorer = self.scorer.as_ref();
        let existing = self.store.read().await.get(proposition).cloned();

        let candidate = match &existing {
            Some(current) => {
                let confidence = frame
                    .update_confidence(
                        proposition,
                        current.confidence(),
                        current.justification(),
                        elements,
                        None,
                        scorer,
                    )
                    .await;
                let mut justification = current.justification().clone();
                justification.extend(elements.iter().cloned());
                current.revise(confidence, justification)
            }
            None => {
                let confidence = frame
                    .compute_initial_confidence(proposition, elements, scorer)
                    .await;
                Belief::new(
                    proposition.clone(),
                    confidence,
                    Justification::from_elements(elements.to_vec()),
                )
            }
        };

        // The store stays locked from the epoch check to the write, so a
        // switch either discards this result or sees it when recomputing.
        {
            let mut store = self.store.write().await;
            if self.current_epoch().await != epoch {
                warn!(
                    "Agent {}: frame changed while updating {}, discarding result",
                    self.id, proposition
                );
                return Absorbed::Discarded(proposition.clone());
            }
            store.put(candidate.clone());
        }

        match existing {
            Some(previous) => {
                self.emit_updated(previous, candidate.clone());
                Absorbed::Updated(candidate)
            }
            None => {
                self.emit(EventKind::BeliefFormed {
                    belief: candidate.clone(),
                });
                Absorbed::Formed(candidate)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::{
        GatedScorer, RecordingObserver, ScriptedScorer, mixed_evidence, tool_evidence,
    };
    use doxa_domain::{FrameKind, NeutralScorer};
    use std::sync::Arc;

    fn agent(kind: FrameKind) -> (Agent, Arc<RecordingObserver>) {
        let observer = Arc::new(RecordingObserver::new());
        let agent = Agent::new("alpha", Frame::new(kind), Arc::new(NeutralScorer))
            .with_observer(observer.clone());
        (agent, observer)
    }

    #[tokio::test]
    async fn test_perception_forms_belief() {
        let (agent, observer) = agent(FrameKind::Security);
        let report = agent
            .perceive(
                Perception::new("sentiment-api", "0.85 positive")
                    .with_proposition("SentimentIsPositive")
                    .with_element(tool_evidence(0.85)),
            )
            .await;

        assert_eq!(report.formed.len(), 1);
        let belief = agent.belief(&Proposition::new("SentimentIsPositive")).await.unwrap();
        assert!((belief.confidence() - 0.85).abs() < 1e-9);
        assert_eq!(belief.justification().len(), 1);
        assert_eq!(observer.types(), vec!["perception_received", "belief_formed"]);
    }

    #[tokio::test]
    async fn test_perception_without_evidence_forms_nothing() {
        let (agent, observer) = agent(FrameKind::Security);
        let report = agent
            .perceive(Perception::new("chat", "is the API fast?").with_proposition("ApiIsFast"))
            .await;
        assert_eq!(report.changed(), 0);
        assert!(agent.beliefs(0.0).await.is_empty());
        assert_eq!(observer.types(), vec!["perception_received"]);
    }

    #[tokio::test]
    async fn test_perception_updates_existing_belief() {
        let (agent, observer) = agent(FrameKind::Moderator);
        let p = Proposition::new("ApiIsFast");
        agent
            .perceive(Perception::new("probe", "fast").with_proposition(p.clone()).with_element(tool_evidence(0.8)))
            .await;
        let report = agent
            .perceive(Perception::new("probe", "slow").with_proposition(p.clone()).with_element(tool_evidence(0.2)))
            .await;

        assert_eq!(report.updated.len(), 1);
        let belief = agent.belief(&p).await.unwrap();
        // moderator weight 0.5: 0.5*0.8 + 0.5*0.2
        assert!((belief.confidence() - 0.5).abs() < 1e-9);
        assert_eq!(belief.justification().len(), 2);
        assert_eq!(observer.count("belief_updated"), 1);
    }

    #[tokio::test]
    async fn test_scorer_extraction_adds_propositions() {
        let scorer = ScriptedScorer::default().extracting(&["DbIsHealthy"]);
        let agent = Agent::new("alpha", Frame::new(FrameKind::Judge), Arc::new(scorer));
        let report = agent
            .perceive(
                Perception::new("probe", "db replied")
                    .with_proposition("ApiIsUp")
                    .with_element(tool_evidence(0.9)),
            )
            .await;
        let props: Vec<String> = report.formed.iter().map(|b| b.proposition().to_string()).collect();
        assert_eq!(props.len(), 2);
        assert!(props.contains(&"ApiIsUp".to_string()));
        assert!(props.contains(&"DbIsHealthy".to_string()));
    }

    #[tokio::test]
    async fn test_failing_scorer_degrades_to_neutral() {
        let agent = Agent::new("alpha", Frame::new(FrameKind::Security), Arc::new(ScriptedScorer::failing()));
        let report = agent
            .perceive(
                Perception::new("probe", "unscored")
                    .with_proposition("PortIsOpen")
                    .with_element(JustificationElement::observation("nmap", "22/tcp open")),
            )
            .await;
        assert_eq!(report.formed.len(), 1);
        assert_eq!(report.formed[0].confidence(), 0.5);
    }

    #[tokio::test]
    async fn test_concurrent_perceptions_on_one_proposition_are_serialized() {
        let agent = Arc::new(Agent::new("alpha", Frame::new(FrameKind::Moderator), Arc::new(NeutralScorer)));
        let p = Proposition::new("ApiIsFast");

        let mut set = tokio::task::JoinSet::new();
        for i in 0..8 {
            let agent = agent.clone();
            let p = p.clone();
            set.spawn(async move {
                agent
                    .perceive(
                        Perception::new("probe", format!("sample {i}"))
                            .with_proposition(p)
                            .with_element(tool_evidence(0.9)),
                    )
                    .await
            });
        }
        while let Some(result) = set.join_next().await {
            result.unwrap();
        }

        // one formation plus seven updates, none lost
        let belief = agent.belief(&p).await.unwrap();
        assert_eq!(belief.justification().len(), 8);
        assert!((0.0..=1.0).contains(&belief.confidence()));
    }

    #[tokio::test]
    async fn test_frame_switch_discards_in_flight_perception() {
        let scorer = Arc::new(GatedScorer::new());
        let agent = Arc::new(Agent::new("alpha", Frame::new(FrameKind::Security), scorer.clone()));
        let p = Proposition::new("PortIsOpen");

        let perceiving = {
            let agent = agent.clone();
            let p = p.clone();
            tokio::spawn(async move {
                agent
                    .perceive(
                        Perception::new("nmap", "22/tcp open")
                            .with_proposition(p)
                            .with_element(JustificationElement::observation("nmap", "22/tcp open")),
                    )
                    .await
            })
        };

        // scoring is under way with the security frame; switch before it returns
        scorer.entered().await;
        let switch = agent.set_frame(Frame::new(FrameKind::Efficiency)).await;
        assert_eq!(switch.recomputed, 0);
        scorer.release();

        let report = perceiving.await.unwrap();
        assert_eq!(report.discarded, vec![p.clone()]);
        assert_eq!(report.changed(), 0);
        assert!(agent.belief(&p).await.is_none());
        assert!(agent.beliefs(0.0).await.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_formed_belief_is_never_left_under_old_frame() {
        let p = Proposition::new("ApiIsFast");
        let under_new_frame = Frame::new(FrameKind::Security)
            .compute_initial_confidence(&p, &mixed_evidence(), &NeutralScorer)
            .await;

        for _ in 0..50 {
            let agent = Arc::new(Agent::new("alpha", Frame::new(FrameKind::Efficiency), Arc::new(NeutralScorer)));

            let perceiving = {
                let agent = agent.clone();
                let p = p.clone();
                tokio::spawn(async move {
                    let mut perception = Perception::new("bench", "p99 under 20ms").with_proposition(p);
                    for element in mixed_evidence() {
                        perception = perception.with_element(element);
                    }
                    agent.perceive(perception).await
                })
            };
            let switching = {
                let agent = agent.clone();
                tokio::spawn(async move { agent.set_frame(Frame::new(FrameKind::Security)).await })
            };
            let report = perceiving.await.unwrap();
            let switch = switching.await.unwrap();

            match agent.belief(&p).await {
                None => assert_eq!(report.discarded, vec![p.clone()]),
                // either the switch recomputed it, or it was formed under the new frame
                Some(belief) if switch.recomputed == 0 => {
                    assert!((belief.confidence() - under_new_frame).abs() < 1e-9);
                }
                Some(_) => assert_eq!(switch.recomputed, 1),
            }
        }
    }
}
