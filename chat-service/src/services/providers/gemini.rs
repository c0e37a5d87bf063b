//! Gemini generateContent transport and wire types.

use super::{ProviderError, Upstream, UpstreamReply};
use crate::services::endpoint::{redact_key, resolve_endpoint};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_base: String,
    pub api_key: Secret<String>,
    pub model: String,
}

/// Gemini transport. Holds the endpoint resolved once at startup.
pub struct GeminiClient {
    model: String,
    endpoint: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        if config.api_key.expose_secret().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Gemini API key not configured".to_string(),
            ));
        }

        let endpoint = resolve_endpoint(
            &config.api_base,
            &config.model,
            config.api_key.expose_secret(),
        );
        let client = Client::builder().build()?;

        tracing::info!(
            model = %config.model,
            endpoint = %redact_key(&endpoint),
            "Resolved Gemini endpoint"
        );

        Ok(Self {
            model: config.model,
            endpoint,
            client,
        })
    }
}

#[async_trait]
impl Upstream for GeminiClient {
    async fn send(&self, request: &GenerateContentRequest) -> Result<UpstreamReply, ProviderError> {
        tracing::debug!(
            model = %self.model,
            endpoint = %redact_key(&self.endpoint),
            "Sending request to Gemini API"
        );

        let response = self.client.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::info!(status = %status, body_len = body.len(), "Gemini API responded");

        Ok(UpstreamReply { status, body })
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

/// Response body. Both fields are optional so that error payloads and
/// partial success payloads deserialize alike.
#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .and_then(|p| p.text.as_deref())
    }

    pub fn has_error(&self) -> bool {
        self.error.as_ref().is_some_and(|e| !e.is_null())
    }
}
