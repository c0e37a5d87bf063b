//! Upstream request construction.

use crate::services::providers::gemini::{Content, GenerateContentRequest, GenerationConfig, Part};

/// Persona instructions placed before every prompt.
pub const PERSONA_PREAMBLE: &str = "You are Xy'Lorith — an ancient alien intelligence who speaks in mysterious cosmic tones but gives helpful and clear answers. Respond to the user in an alien style.\n\nUser: ";

pub const TEMPERATURE: f32 = 0.8;
pub const TOP_P: f32 = 0.9;
pub const TOP_K: u32 = 40;
/// Server-side output cap. Client-supplied limits are never forwarded.
pub const MAX_OUTPUT_TOKENS: u32 = 512;

pub fn build_request(prompt: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: Some(format!("{}{}", PERSONA_PREAMBLE, prompt)),
            }],
        }],
        generation_config: GenerationConfig {
            temperature: TEMPERATURE,
            top_p: TOP_P,
            top_k: TOP_K,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        },
    }
}
