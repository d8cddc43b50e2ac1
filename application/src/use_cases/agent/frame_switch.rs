//! Switching the active frame and recomputing stored beliefs.

use super::{ActiveFrame, Agent, FrameSwitchReport};
use doxa_domain::{Belief, EventKind, Frame, FrameStrategy, Proposition};
use futures::future::join_all;
use std::sync::Arc;
use tracing::info;

/// Confidence changes at or below this leave a belief untouched.
const RECOMPUTE_EPSILON: f64 = 1e-12;

impl Agent {
    /// Install `frame` and re-read every stored belief under it.
    ///
    /// The epoch bump happens before recomputation starts, so perception
    /// results still computing under the old frame are discarded.
    pub async fn set_frame(&self, frame: Frame) -> FrameSwitchReport {
        let _switching = self.frame_switch.lock().await;

        let frame = Arc::new(frame);
        let from = {
            let mut active = self.frame.write().await;
            let from = active.frame.to_string();
            *active = ActiveFrame {
                frame: frame.clone(),
                epoch: active.epoch + 1,
            };
            from
        };

        let propositions = self.store.read().await.propositions();
        let recomputed = propositions.len();
        let changed: Vec<Belief> = join_all(
            propositions
                .iter()
                .map(|p| self.recompute(p, frame.as_ref())),
        )
        .await
        .into_iter()
        .flatten()
        .collect();

        let to = frame.to_string();
        info!(
            "Agent {} switched frame {} -> {} ({} recomputed, {} changed)",
            self.id,
            from,
            to,
            recomputed,
            changed.len()
        );
        self.emit(EventKind::FrameChanged {
            from: from.clone(),
            to: to.clone(),
            recomputed,
        });

        FrameSwitchReport {
            from,
            to,
            recomputed,
            changed,
        }
    }

    async fn recompute(&self, proposition: &Proposition, frame: &Frame) -> Option<Belief> {
        let _guard = self.proposition_lock(proposition).await;
        let current = self.store.read().await.get(proposition).cloned()?;

        let confidence = frame
            .recompute_confidence(
                proposition,
                current.justification(),
                current.confidence(),
                self.scorer.as_ref(),
            )
            .await;
        if (confidence - current.confidence()).abs() <= RECOMPUTE_EPSILON {
            return None;
        }

        let revised = current.revise(confidence, current.justification().clone());
        self.store.write().await.put(revised.clone());
        self.emit_updated(current, revised.clone());
        Some(revised)
    }
}
