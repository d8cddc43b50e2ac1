//! Timeout and retry policy for any evidence scorer.

use async_trait::async_trait;
use doxa_domain::{
    EvidenceScorer, FrameRef, JustificationElement, NEUTRAL_CONFIDENCE, Perception, Proposition,
    ScorerError, Stimulus,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default per-call timeout.
pub const DEFAULT_SCORER_TIMEOUT: Duration = Duration::from_millis(2_000);

/// Wraps a scorer with a per-call timeout and a bounded number of retries.
///
/// With `neutral_fallback` (the default) a call that keeps failing yields the
/// neutral answer itself (0.5, no propositions, the unmodified perception);
/// otherwise the last error is returned and the caller substitutes.
pub struct TimeoutScorer {
    inner: Arc<dyn EvidenceScorer>,
    timeout: Duration,
    retries: u32,
    neutral_fallback: bool,
}

impl TimeoutScorer {
    pub fn new(inner: Arc<dyn EvidenceScorer>, timeout: Duration) -> Self {
        Self {
            inner,
            timeout,
            retries: 0,
            neutral_fallback: true,
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn with_neutral_fallback(mut self, enabled: bool) -> Self {
        self.neutral_fallback = enabled;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `call` up to `1 + retries` times, each bounded by the timeout.
    async fn attempt<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, ScorerError>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<T, ScorerError>> + Send,
        T: Send,
    {
        let mut last_error = ScorerError::Unavailable("no attempt made".to_string());
        for attempt in 0..=self.retries {
            match tokio::time::timeout(self.timeout, call()).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(e)) => {
                    debug!("Scorer {} attempt {} failed: {}", operation, attempt + 1, e);
                    if matches!(e, ScorerError::Unsupported(_)) {
                        return Err(e);
                    }
                    last_error = e;
                }
                Err(_) => {
                    debug!(
                        "Scorer {} attempt {} timed out after {:?}",
                        operation,
                        attempt + 1,
                        self.timeout
                    );
                    last_error = ScorerError::Timeout(self.timeout.as_millis() as u64);
                }
            }
        }
        Err(last_error)
    }

    fn settle<T>(
        &self,
        operation: &str,
        result: Result<T, ScorerError>,
        neutral: impl FnOnce() -> T,
    ) -> Result<T, ScorerError> {
        match result {
            Ok(value) => Ok(value),
            Err(e) if self.neutral_fallback => {
                warn!("Scorer {} gave up ({}), using neutral answer", operation, e);
                Ok(neutral())
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl EvidenceScorer for TimeoutScorer {
    async fn score_strength(
        &self,
        element: &JustificationElement,
        proposition: &Proposition,
    ) -> Result<f64, ScorerError> {
        let result = self
            .attempt("strength", || self.inner.score_strength(element, proposition))
            .await;
        self.settle("strength", result, || NEUTRAL_CONFIDENCE)
    }

    async fn score_saliency(
        &self,
        element: &JustificationElement,
        frame: FrameRef<'_>,
    ) -> Result<f64, ScorerError> {
        let result = self
            .attempt("saliency", || self.inner.score_saliency(element, frame))
            .await;
        self.settle("saliency", result, || NEUTRAL_CONFIDENCE)
    }

    async fn extract_propositions(
        &self,
        stimulus: Stimulus<'_>,
        frame: FrameRef<'_>,
    ) -> Result<Vec<Proposition>, ScorerError> {
        let result = self
            .attempt("extraction", || {
                self.inner.extract_propositions(stimulus, frame)
            })
            .await;
        self.settle("extraction", result, Vec::new)
    }

    async fn interpret(
        &self,
        perception: &Perception,
        frame: FrameRef<'_>,
    ) -> Result<Perception, ScorerError> {
        let result = self
            .attempt("interpretation", || self.inner.interpret(perception, frame))
            .await;
        self.settle("interpretation", result, || perception.clone())
    }
}
