//! AI collaborator: an opaque text-in / text-out participant.
//!
//! The router hands it a prompt (trigger already stripped) and broadcasts
//! whatever comes back as a synthetic AI-sender message. Model internals
//! are out of scope; failures surface as upstream errors.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the AI collaborator
#[derive(Debug, Error)]
pub enum AiError {
    /// The upstream call failed (network, non-2xx, bad body)
    #[error("AI upstream error: {0}")]
    Upstream(String),
}

/// Text-in / text-out collaborator invoked by the message router.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiCollaborator: Send + Sync {
    /// Produce a reply for the given prompt.
    async fn complete(&self, prompt: &str) -> Result<String, AiError>;
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    text: String,
}

/// HTTP-backed collaborator: POSTs `{prompt}` to an endpoint, reads `{text}`.
pub struct HttpAiCollaborator {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAiCollaborator {
    /// Create a collaborator for the given completion endpoint.
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl AiCollaborator for HttpAiCollaborator {
    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&CompletionRequest { prompt })
            .send()
            .await
            .map_err(|e| AiError::Upstream(e.to_string()))?;
        let response = response
            .error_for_status()
            .map_err(|e| AiError::Upstream(e.to_string()))?;
        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AiError::Upstream(e.to_string()))?;
        Ok(body.text)
    }
}

/// Offline collaborator for local runs without an AI endpoint configured.
pub struct EchoCollaborator;

#[async_trait]
impl AiCollaborator for EchoCollaborator {
    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        Ok(format!("(echo) {prompt}"))
    }
}
