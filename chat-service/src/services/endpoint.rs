//! Gemini endpoint resolution.

use std::fmt;

/// Model name fragments that are only served from the stable `v1` API.
const V1_MODEL_PATTERNS: &[&str] = &["gemini-1.5-pro", "gemini-1.0-pro"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    V1,
    V1Beta,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V1Beta => "v1beta",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn api_version_for(model: &str) -> ApiVersion {
    if V1_MODEL_PATTERNS.iter().any(|p| model.contains(p)) {
        ApiVersion::V1
    } else {
        ApiVersion::V1Beta
    }
}

/// Full `generateContent` URL, credential included.
pub fn resolve_endpoint(api_base: &str, model: &str, api_key: &str) -> String {
    let model = model.strip_prefix("models/").unwrap_or(model);
    format!(
        "{}/{}/models/{}:generateContent?key={}",
        api_base.trim_end_matches('/'),
        api_version_for(model),
        model,
        api_key
    )
}

/// Mask the `key` query parameter so the URL can be logged.
pub fn redact_key(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };

    let query = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some(("key", _)) => "key=***".to_string(),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", base, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://generativelanguage.googleapis.com";

    #[test]
    fn test_legacy_models_use_v1() {
        assert_eq!(api_version_for("models/gemini-1.5-pro"), ApiVersion::V1);
        assert_eq!(api_version_for("gemini-1.0-pro-001"), ApiVersion::V1);
    }

    #[test]
    fn test_other_models_use_v1beta() {
        assert_eq!(api_version_for("models/gemini-2.5-flash"), ApiVersion::V1Beta);
        assert_eq!(api_version_for("gemini-1.5-flash"), ApiVersion::V1Beta);
        assert_eq!(api_version_for(""), ApiVersion::V1Beta);
    }

    #[test]
    fn test_resolve_endpoint() {
        assert_eq!(
            resolve_endpoint(BASE, "models/gemini-2.5-flash", "k"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent?key=k"
        );
        assert_eq!(
            resolve_endpoint(BASE, "models/gemini-1.5-pro", "k"),
            "https://generativelanguage.googleapis.com/v1/models/gemini-1.5-pro:generateContent?key=k"
        );
    }

    #[test]
    fn test_model_prefix_and_trailing_slash_are_optional() {
        let with_prefix = resolve_endpoint(BASE, "models/gemini-2.5-flash", "k");
        let bare = resolve_endpoint(&format!("{}/", BASE), "gemini-2.5-flash", "k");
        assert_eq!(with_prefix, bare);
    }

    #[test]
    fn test_redact_key() {
        let url = resolve_endpoint(BASE, "gemini-2.5-flash", "secret-key");
        let redacted = redact_key(&url);
        assert!(!redacted.contains("secret-key"));
        assert!(redacted.ends_with(":generateContent?key=***"));
        assert_eq!(redact_key("http://host/path"), "http://host/path");
    }
}
