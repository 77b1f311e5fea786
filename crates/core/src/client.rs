use async_trait::async_trait;
use serde::Deserialize;

use crate::{config::ServiceConfig, error::AnalysisError, types::Concept};

/// Turns a video reference into key concepts.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    async fn analyze(&self, video_reference: &str) -> Result<Vec<Concept>, AnalysisError>;
}

#[derive(Debug, Deserialize)]
struct AnalysisResponse {
    key_concepts: Vec<Concept>,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorEnvelope {
    status: String,
    message: String,
}

/// Client for the HTTP analysis endpoint.
#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpAnalysisClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl AnalysisClient for HttpAnalysisClient {
    async fn analyze(&self, video_reference: &str) -> Result<Vec<Concept>, AnalysisError> {
        tracing::debug!(endpoint = %self.endpoint, video_reference, "requesting analysis");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&serde_json::json!({ "youtube_link": video_reference }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "analysis service rejected request");
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let concepts = parse_concepts(&body)?;
        tracing::info!(count = concepts.len(), "analysis returned concepts");
        Ok(concepts)
    }
}

/// Parse a successful response body into concepts.
///
/// The body must be a JSON object whose `key_concepts` field is an array of
/// `{term, definition}` objects; anything else is a malformed response. The
/// service reports its own internal failures as `{"status": "error", "message": ..}`
/// with a success status, so that shape is surfaced with its message.
pub fn parse_concepts(body: &str) -> Result<Vec<Concept>, AnalysisError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| AnalysisError::MalformedResponse {
            reason: format!("body is not JSON: {e}"),
        })?;

    if let Ok(envelope) = serde_json::from_value::<ServiceErrorEnvelope>(value.clone()) {
        if envelope.status == "error" {
            return Err(AnalysisError::MalformedResponse {
                reason: format!("service reported an error: {}", envelope.message),
            });
        }
    }

    serde_json::from_value::<AnalysisResponse>(value)
        .map(|response| response.key_concepts)
        .map_err(|e| AnalysisError::MalformedResponse {
            reason: e.to_string(),
        })
}
