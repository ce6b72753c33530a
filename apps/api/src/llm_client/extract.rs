//! Best-effort extraction of structured payloads from free-form model text.
//!
//! Malformed model output is an expected, frequent case, not an exceptional
//! one, so extraction returns a typed error that callers surface as a
//! retryable parse failure.

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no JSON payload found in model output")]
    NoJson,

    #[error("JSON parse error: {0}")]
    Parse(String),

    #[error("JSON shape mismatch: {0}")]
    Shape(String),
}

/// Pulls a JSON value out of model text. Handles bare JSON, JSON wrapped in
/// markdown code fences, and JSON embedded in surrounding prose (first `{`
/// to last `}`).
pub fn extract_json(text: &str) -> Result<Value, ExtractError> {
    let stripped = strip_code_fences(text);

    if let Ok(value) = serde_json::from_str::<Value>(stripped) {
        return Ok(value);
    }

    // Fall back to the outermost brace span inside surrounding prose.
    let start = stripped.find('{').ok_or(ExtractError::NoJson)?;
    let end = stripped.rfind('}').ok_or(ExtractError::NoJson)?;
    if end <= start {
        return Err(ExtractError::NoJson);
    }

    serde_json::from_str(&stripped[start..=end]).map_err(|e| ExtractError::Parse(e.to_string()))
}

/// Extracts a JSON payload and deserializes it into `T`.
pub fn extract_typed<T: DeserializeOwned>(text: &str) -> Result<T, ExtractError> {
    let value = extract_json(text)?;
    serde_json::from_value(value).map_err(|e| ExtractError::Shape(e.to_string()))
}

/// Unwraps a plain quoted string ("..." or '...' or «...»), used for the
/// title-generation call where the model answers with a short phrase.
pub fn extract_quoted(text: &str) -> String {
    let trimmed = text.trim();
    for (open, close) in [("\"", "\""), ("'", "'"), ("«", "»")] {
        if let Some(inner) = trimmed
            .strip_prefix(open)
            .and_then(|s| s.strip_suffix(close))
        {
            return inner.trim().to_string();
        }
    }
    trimmed.to_string()
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
