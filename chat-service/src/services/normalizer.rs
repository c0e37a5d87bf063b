//! Upstream response normalization.
//!
//! Turns a raw status/body pair into either reply text or a classified
//! failure. Never fails itself.

use crate::services::providers::gemini::GenerateContentResponse;
use reqwest::StatusCode;

pub const RATE_LIMITED_MESSAGE: &str =
    "⚠️ Cosmic bandwidth limit reached. The alien network must rest before responding again. Try soon.";
pub const UNAVAILABLE_MESSAGE: &str =
    "🌌 The stars are busy transmitting other signals... please wait a bit.";
pub const UPSTREAM_ERROR_MESSAGE: &str =
    "💥 A rift in the space-time continuum has interrupted communication. Try again.";
/// Returned instead of an empty success body.
pub const NO_SIGNAL_PLACEHOLDER: &str = "👽 [Alien silence] No signal received.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    RateLimited,
    Unavailable,
    UpstreamError,
}

impl ErrorKind {
    pub fn display_message(&self) -> &'static str {
        match self {
            ErrorKind::RateLimited => RATE_LIMITED_MESSAGE,
            ErrorKind::Unavailable => UNAVAILABLE_MESSAGE,
            ErrorKind::UpstreamError => UPSTREAM_ERROR_MESSAGE,
        }
    }
}

pub fn classify_status(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::TOO_MANY_REQUESTS => ErrorKind::RateLimited,
        StatusCode::SERVICE_UNAVAILABLE => ErrorKind::Unavailable,
        _ => ErrorKind::UpstreamError,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamFailure {
    pub kind: ErrorKind,
    /// Status forwarded to the caller.
    pub status: StatusCode,
    /// Upstream body, for operator logs only.
    pub detail: String,
}

impl UpstreamFailure {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            kind: classify_status(status),
            status,
            detail: detail.into(),
        }
    }

    pub fn display_message(&self) -> &'static str {
        self.kind.display_message()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// Trimmed reply text, never empty.
    Text(String),
    Failed(UpstreamFailure),
    /// Success status with a body that is not JSON. `raw` is the body as received.
    Unparseable { status: StatusCode, raw: String },
}

pub fn normalize(status: StatusCode, body: &str) -> Normalized {
    if !status.is_success() {
        return Normalized::Failed(UpstreamFailure::new(status, body.trim()));
    }

    let Ok(response) = serde_json::from_str::<GenerateContentResponse>(body) else {
        return Normalized::Unparseable {
            status,
            raw: body.to_string(),
        };
    };

    if response.has_error() {
        return Normalized::Failed(UpstreamFailure::new(status, body.trim()));
    }

    let text = response
        .first_text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(NO_SIGNAL_PLACEHOLDER);

    Normalized::Text(text.to_string())
}
