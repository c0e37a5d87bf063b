//! Upstream transport abstraction.
//!
//! The dispatcher only needs "send this request, give me status and body";
//! keeping that behind a trait lets tests count and script attempts without
//! a network.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use gemini::GenerateContentRequest;

/// Error type for transport failures.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// Raw upstream answer. The body is kept as text so the normalizer can
/// decide how to read it.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: String,
}

impl UpstreamReply {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// A single-shot call to the generative-language API.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Send one request. Any HTTP status is a successful send.
    async fn send(&self, request: &GenerateContentRequest) -> Result<UpstreamReply, ProviderError>;

    /// Model identifier this transport talks to, for logging.
    fn model(&self) -> &str;
}
