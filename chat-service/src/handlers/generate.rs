use crate::error::ChatError;
use crate::services::normalizer::{normalize, Normalized};
use crate::services::prompt::{build_request, MAX_OUTPUT_TOKENS};
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    /// Accepted for compatibility with the UI; the server cap always applies.
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
}

/// `POST /api/generate`
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Response, ChatError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Rejected unreadable generate request");
        ChatError::MissingPrompt
    })?;

    let prompt = request
        .prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or(ChatError::MissingPrompt)?;

    if let Some(requested) = request.max_output_tokens {
        if requested != MAX_OUTPUT_TOKENS {
            tracing::debug!(
                requested,
                cap = MAX_OUTPUT_TOKENS,
                "Ignoring client-supplied maxOutputTokens"
            );
        }
    }

    tracing::info!(prompt_len = prompt.len(), "Dispatching prompt");

    let reply = state
        .dispatcher
        .dispatch(&build_request(&prompt))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Upstream dispatch failed");
            ChatError::from(e)
        })?;

    match normalize(reply.status, &reply.body) {
        Normalized::Text(text) => Ok(text.into_response()),
        Normalized::Failed(failure) => {
            tracing::error!(
                status = %failure.status,
                kind = ?failure.kind,
                detail = %failure.detail,
                "Upstream API error"
            );
            Err(ChatError::Upstream(failure))
        }
        Normalized::Unparseable { status, raw } => {
            tracing::error!(status = %status, body = %raw, "Failed to parse Gemini JSON");
            Err(ChatError::MalformedUpstreamBody)
        }
    }
}
