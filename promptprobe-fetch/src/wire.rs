//! Upstream wire envelopes.
//!
//! The generative API's request, success, error, and model-list shapes.
//! Every response field is optional on the way in; a missing field means a
//! failed attempt, never a panic.

use promptprobe_core::GenerationParams;
use serde::Deserialize;
use serde_json::json;

use crate::error::AttemptError;

// ============================================================================
// Defaults
// ============================================================================

/// Default endpoint templates, newest API version first.
pub const DEFAULT_TEMPLATES: &[&str] = &[
    "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent?key={key}",
    "https://generativelanguage.googleapis.com/v1/models/{model}:generateContent?key={key}",
];

/// Default models, fastest first.
pub const DEFAULT_MODELS: &[&str] = &[
    "gemini-2.5-flash",
    "gemini-2.5-pro",
    "gemini-2.0-flash",
    "gemini-exp-1206",
];

/// Default model discovery URL.
pub const DEFAULT_MODELS_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models?key={key}";

/// Default instruction text placed before the question.
pub const DEFAULT_PREAMBLE: &str = "You are a study assistant for students. \
Solve math, physics, chemistry and programming problems step by step, \
showing every formula and calculation. Explain concepts in plain language \
and answer general questions helpfully. Reply in the language of the question \
and format the answer with paragraphs and lists where they help.";

/// Upstream API host.
pub const DEFAULT_API_HOST: &str = "generativelanguage.googleapis.com";

/// Prefix stripped from discovered model names.
const MODEL_NAME_PREFIX: &str = "models/";

// ============================================================================
// Request
// ============================================================================

/// Builds the `generateContent` request body.
pub fn request_body(prompt: &str, params: &GenerationParams) -> serde_json::Value {
    json!({
        "contents": [
            { "parts": [ { "text": prompt } ] }
        ],
        "generationConfig": {
            "temperature": params.temperature,
            "maxOutputTokens": params.max_output_tokens,
            "topP": params.top_p,
            "topK": params.top_k,
        }
    })
}

// ============================================================================
// Responses
// ============================================================================

/// Success envelope of `generateContent`.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    /// Generated candidates.
    #[serde(default)]
    pub candidates: Vec<ResponseCandidate>,
}

/// One generated candidate.
#[derive(Debug, Default, Deserialize)]
pub struct ResponseCandidate {
    /// Candidate content.
    #[serde(default)]
    pub content: Option<ResponseContent>,
}

/// Content of a generated candidate.
#[derive(Debug, Default, Deserialize)]
pub struct ResponseContent {
    /// Content parts.
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// One content part.
#[derive(Debug, Default, Deserialize)]
pub struct ResponsePart {
    /// Text of the part.
    #[serde(default)]
    pub text: Option<String>,
}

/// Error envelope: `{"error": {"message": "..."}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Model list response.
#[derive(Debug, Deserialize)]
pub struct ModelsResponse {
    /// Available models.
    #[serde(default)]
    pub models: Vec<ModelDescriptor>,
}

/// Model information.
#[derive(Debug, Deserialize)]
pub struct ModelDescriptor {
    /// Model name (e.g., "models/gemini-2.5-pro").
    pub name: String,
}

// ============================================================================
// Extraction
// ============================================================================

/// Extracts the first candidate's first text part.
///
/// Unparsable bodies, missing candidates, and blank text are all
/// [`AttemptError::MalformedResponse`].
pub fn extract_answer(body: &str) -> Result<String, AttemptError> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| AttemptError::MalformedResponse(format!("JSON error: {e}")))?;

    let first = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| AttemptError::MalformedResponse("no candidates".to_string()))?;

    let text = first
        .content
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AttemptError::MalformedResponse("empty answer text".to_string()));
    }

    Ok(text)
}

/// Extracts `error.message` from an error body, if present and non-blank.
pub fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .filter(|message| !message.trim().is_empty())
}

/// Parses a model list and strips the `models/` prefix from each name.
pub fn parse_model_names(body: &str) -> Result<Vec<String>, AttemptError> {
    let response: ModelsResponse = serde_json::from_str(body)
        .map_err(|e| AttemptError::MalformedResponse(format!("JSON error: {e}")))?;

    Ok(response
        .models
        .into_iter()
        .map(|m| {
            m.name
                .strip_prefix(MODEL_NAME_PREFIX)
                .map_or_else(|| m.name.clone(), str::to_string)
        })
        .collect())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = request_body("hello", &GenerationParams::default());
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 2000);
        assert_eq!(body["generationConfig"]["topK"], 40);
        assert_eq!(body["generationConfig"]["temperature"], 0.7);
        assert_eq!(body["generationConfig"]["topP"], 0.95);
    }

    #[test]
    fn test_extract_answer() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"4"},{"text":"ignored"}]}}]}"#;
        assert_eq!(extract_answer(body).unwrap(), "4");
    }

    #[test]
    fn test_extract_answer_rejects_blank_text() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#;
        assert!(matches!(extract_answer(body), Err(AttemptError::MalformedResponse(_))));
    }

    #[test]
    fn test_extract_answer_tolerates_missing_fields() {
        for body in [
            "{}",
            r#"{"candidates":[]}"#,
            r#"{"candidates":[{}]}"#,
            r#"{"candidates":[{"content":{}}]}"#,
            r#"{"candidates":[{"content":{"parts":[{}]}}]}"#,
            "not json",
            "",
        ] {
            assert!(
                matches!(extract_answer(body), Err(AttemptError::MalformedResponse(_))),
                "expected malformed for {body:?}"
            );
        }
    }

    #[test]
    fn test_extract_error_message() {
        assert_eq!(
            extract_error_message(r#"{"error":{"code":400,"message":"API key not valid"}}"#),
            Some("API key not valid".to_string())
        );
        assert_eq!(extract_error_message(r#"{"error":{"code":500}}"#), None);
        assert_eq!(extract_error_message(r#"{"error":{"message":""}}"#), None);
        assert_eq!(extract_error_message("<html>Bad Gateway</html>"), None);
    }

    #[test]
    fn test_parse_model_names_strips_prefix() {
        let body = r#"{"models":[
            {"name":"models/gemini-2.5-flash","displayName":"Gemini 2.5 Flash"},
            {"name":"tunedModels/custom"}
        ]}"#;
        assert_eq!(
            parse_model_names(body).unwrap(),
            vec!["gemini-2.5-flash".to_string(), "tunedModels/custom".to_string()]
        );
    }

    #[test]
    fn test_parse_model_names_empty_list() {
        assert!(parse_model_names("{}").unwrap().is_empty());
        assert!(parse_model_names("[").is_err());
    }
}
