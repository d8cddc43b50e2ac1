//! Escalating an unresolved conflict to a third-party frame.

use super::entities::{ConflictId, EpistemicConflict};
use crate::core::agent_id::AgentId;
use crate::core::proposition::Proposition;
use crate::frame::{EvidenceScorer, FrameKind, FrameStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An arbiter's reading of both sides' evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrationVerdict {
    pub conflict_id: ConflictId,
    /// Name of the arbitrating frame
    pub arbiter: String,
    /// The proposition as held by side A
    pub proposition: Proposition,
    /// Arbiter's evaluation of A's justification
    pub support_for: f64,
    /// Arbiter's evaluation of B's justification
    pub support_against: f64,
    /// The side whose evidence the arbiter favors, if the margin is met
    pub favored: Option<AgentId>,
}

impl ArbitrationVerdict {
    pub fn is_decisive(&self) -> bool {
        self.favored.is_some()
    }
}

impl fmt::Display for ArbitrationVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.favored {
            Some(agent) => write!(
                f,
                "{} favors {} on {} ({:.2} vs {:.2})",
                self.arbiter, agent, self.proposition, self.support_for, self.support_against
            ),
            None => write!(
                f,
                "{} is undecided on {} ({:.2} vs {:.2})",
                self.arbiter, self.proposition, self.support_for, self.support_against
            ),
        }
    }
}

/// Evaluate both justifications through `arbiter`, each discounted by the
/// arbiter's compatibility with the frame it came from. A side is favored
/// only when its support exceeds the other's by at least `margin`.
pub async fn arbitrate(
    arbiter: &dyn FrameStrategy,
    conflict: &EpistemicConflict,
    frame_a: FrameKind,
    frame_b: FrameKind,
    margin: f64,
    scorer: &dyn EvidenceScorer,
) -> ArbitrationVerdict {
    let (support_for, support_against) = futures::join!(
        arbiter.evaluate_external_justification(
            conflict.belief_a.proposition(),
            conflict.belief_a.justification(),
            frame_a,
            scorer,
        ),
        arbiter.evaluate_external_justification(
            conflict.belief_b.proposition(),
            conflict.belief_b.justification(),
            frame_b,
            scorer,
        ),
    );

    let favored = if support_for - support_against >= margin {
        Some(conflict.agent_a.clone())
    } else if support_against - support_for >= margin {
        Some(conflict.agent_b.clone())
    } else {
        None
    };

    ArbitrationVerdict {
        conflict_id: conflict.id.clone(),
        arbiter: arbiter.name().to_string(),
        proposition: conflict.proposition().clone(),
        support_for,
        support_against,
        favored,
    }
}
