//! Remote evidence scorer over HTTP.
//!
//! Talks JSON to a scoring service (typically an LLM behind a small API):
//!
//! | Call                   | Endpoint             | Response                 |
//! |------------------------|----------------------|--------------------------|
//! | `score_strength`       | `POST /strength`     | `{"score": f64}`         |
//! | `score_saliency`       | `POST /saliency`     | `{"score": f64}`         |
//! | `extract_propositions` | `POST /propositions` | `{"propositions": [..]}` |
//! | `interpret`            | `POST /interpret`    | a `Perception`           |
//!
//! Timeouts are enforced by the HTTP client; wrap this scorer in a
//! [`TimeoutScorer`](super::TimeoutScorer) for retries and neutral fallback.

use async_trait::async_trait;
use doxa_domain::{
    EvidenceScorer, FrameRef, JustificationElement, Perception, Proposition, ScorerError,
    Stimulus,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Serialize)]
struct StrengthRequest<'a> {
    element: &'a JustificationElement,
    proposition: &'a Proposition,
}

#[derive(Serialize)]
struct SaliencyRequest<'a> {
    element: &'a JustificationElement,
    frame: FrameRef<'a>,
}

#[derive(Serialize)]
struct ExtractionRequest<'a> {
    text: &'a str,
    explicit: &'a [Proposition],
    frame: FrameRef<'a>,
}

#[derive(Serialize)]
struct InterpretRequest<'a> {
    perception: &'a Perception,
    frame: FrameRef<'a>,
}

#[derive(Deserialize)]
struct ScoreResponse {
    score: f64,
}

#[derive(Deserialize)]
struct PropositionsResponse {
    propositions: Vec<Proposition>,
}

/// Evidence scorer backed by a JSON HTTP service.
pub struct HttpEvidenceScorer {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpEvidenceScorer {
    /// Create a scorer for the service at `endpoint` (e.g.
    /// `http://localhost:8080/v1`).
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ScorerError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScorerError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path)
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ScorerError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("POST {}", url);

        let response = self.client.post(&url).json(body).send().await.map_err(|e| {
            if e.is_timeout() {
                ScorerError::Timeout(self.timeout.as_millis() as u64)
            } else if e.is_connect() {
                ScorerError::Unavailable(e.to_string())
            } else {
                ScorerError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScorerError::Transport(format!(
                "HTTP error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| ScorerError::InvalidResponse(e.to_string()))
    }
}

/// Reject scores outside [0, 1] instead of silently clamping them.
fn checked_score(response: ScoreResponse) -> Result<f64, ScorerError> {
    if (0.0..=1.0).contains(&response.score) {
        Ok(response.score)
    } else {
        Err(ScorerError::InvalidResponse(format!(
            "score {} outside [0, 1]",
            response.score
        )))
    }
}

#[async_trait]
impl EvidenceScorer for HttpEvidenceScorer {
    async fn score_strength(
        &self,
        element: &JustificationElement,
        proposition: &Proposition,
    ) -> Result<f64, ScorerError> {
        let response = self
            .post("strength", &StrengthRequest { element, proposition })
            .await?;
        checked_score(response)
    }

    async fn score_saliency(
        &self,
        element: &JustificationElement,
        frame: FrameRef<'_>,
    ) -> Result<f64, ScorerError> {
        let response = self
            .post("saliency", &SaliencyRequest { element, frame })
            .await?;
        checked_score(response)
    }

    async fn extract_propositions(
        &self,
        stimulus: Stimulus<'_>,
        frame: FrameRef<'_>,
    ) -> Result<Vec<Proposition>, ScorerError> {
        let request = ExtractionRequest {
            text: stimulus.text(),
            explicit: stimulus.explicit_propositions(),
            frame,
        };
        let response: PropositionsResponse = self.post("propositions", &request).await?;
        Ok(response.propositions)
    }

    async fn interpret(
        &self,
        perception: &Perception,
        frame: FrameRef<'_>,
    ) -> Result<Perception, ScorerError> {
        self.post("interpret", &InterpretRequest { perception, frame })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doxa_domain::FrameKind;

    #[test]
    fn test_endpoint_is_normalized() {
        let scorer =
            HttpEvidenceScorer::new("http://localhost:8080/v1/", Duration::from_secs(1)).unwrap();
        assert_eq!(scorer.endpoint(), "http://localhost:8080/v1");
        assert_eq!(scorer.url("strength"), "http://localhost:8080/v1/strength");
    }

    #[test]
    fn test_checked_score() {
        assert_eq!(checked_score(ScoreResponse { score: 0.25 }).unwrap(), 0.25);
        let err = checked_score(ScoreResponse { score: 1.5 }).unwrap_err();
        assert!(matches!(err, ScorerError::InvalidResponse(_)));
    }

    #[test]
    fn test_request_shapes() {
        let element = JustificationElement::observation("bench", "p99 20ms");
        let frame = FrameRef {
            name: "efficiency",
            kind: FrameKind::Efficiency,
        };
        let body = serde_json::to_value(SaliencyRequest {
            element: &element,
            frame,
        })
        .unwrap();
        assert_eq!(body["frame"]["name"], "efficiency");
        assert_eq!(body["frame"]["kind"], "efficiency");
        assert_eq!(body["element"]["content"], "p99 20ms");

        let response: PropositionsResponse =
            serde_json::from_str(r#"{"propositions": ["ApiIsFast", "NOT CacheIsWarm"]}"#).unwrap();
        assert_eq!(response.propositions[1].as_str(), "¬CacheIsWarm");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_an_error() {
        let scorer =
            HttpEvidenceScorer::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        let result = scorer
            .score_strength(
                &JustificationElement::observation("bench", "fast"),
                &Proposition::new("ApiIsFast"),
            )
            .await;
        assert!(result.is_err());
    }
}
