use crate::services::normalizer::{ErrorKind, UpstreamFailure};
use crate::services::providers::ProviderError;
use crate::services::DispatchError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

pub const MISSING_PROMPT_MESSAGE: &str = "❌ Missing prompt.";
pub const INTERNAL_ERROR_MESSAGE: &str =
    "💥 Alien core malfunction. The cosmos ripples with interference. Try again later.";

/// Failures of `POST /api/generate`.
///
/// Every variant renders as a fixed plain-text message; upstream detail stays
/// in the logs.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Missing prompt")]
    MissingPrompt,

    #[error("Upstream returned {}", .0.status)]
    Upstream(UpstreamFailure),

    #[error("Upstream rate limit exceeded after {attempts} attempts")]
    RateLimitExhausted { attempts: u32 },

    #[error("Upstream returned a body that is not JSON")]
    MalformedUpstreamBody,

    #[error("Upstream call failed: {0}")]
    Provider(ProviderError),
}

impl From<DispatchError> for ChatError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::RateLimitExhausted { attempts } => {
                ChatError::RateLimitExhausted { attempts }
            }
            DispatchError::Provider(e) => ChatError::Provider(e),
        }
    }
}

impl ChatError {
    pub fn status(&self) -> StatusCode {
        match self {
            ChatError::MissingPrompt => StatusCode::BAD_REQUEST,
            ChatError::Upstream(failure) => failure.status,
            ChatError::RateLimitExhausted { .. } => StatusCode::TOO_MANY_REQUESTS,
            ChatError::MalformedUpstreamBody | ChatError::Provider(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn display_message(&self) -> &'static str {
        match self {
            ChatError::MissingPrompt => MISSING_PROMPT_MESSAGE,
            ChatError::Upstream(failure) => failure.display_message(),
            ChatError::RateLimitExhausted { .. } => ErrorKind::RateLimited.display_message(),
            ChatError::MalformedUpstreamBody | ChatError::Provider(_) => INTERNAL_ERROR_MESSAGE,
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        (self.status(), self.display_message()).into_response()
    }
}
