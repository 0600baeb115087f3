//! Reply handling: pull the model text out of the provider envelope, strip
//! markdown fences and decode the drill payload.

use serde_json::Value;

use crate::drill::payload::DrillPayload;
use crate::generator::error::GenerationError;

/// Provider error message carried in an `{"error": {"message": ...}}` body.
pub fn provider_error(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    match error.get("message").and_then(Value::as_str) {
        Some(message) => Some(message.to_string()),
        None => error.as_str().map(str::to_string),
    }
}

pub fn extract_reply_text(body: &Value) -> Result<&str, GenerationError> {
    if let Some(message) = provider_error(body) {
        return Err(GenerationError::Provider(message));
    }
    body.pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .ok_or_else(|| GenerationError::MalformedResponse("reply contained no text".to_string()))
}

/// Content of the first ``` fenced block (an optional `json` tag is dropped),
/// or the trimmed text when there is no fence.
pub fn strip_code_fences(text: &str) -> &str {
    let Some(start) = text.find("```") else {
        return text.trim();
    };
    let mut inner = &text[start + 3..];
    for tag in ["json", "JSON"] {
        if let Some(rest) = inner.strip_prefix(tag) {
            inner = rest;
            break;
        }
    }
    let inner = match inner.find("```") {
        Some(end) => &inner[..end],
        None => inner,
    };
    inner.trim()
}

pub fn parse_payload(reply: &str) -> Result<DrillPayload, GenerationError> {
    let json = strip_code_fences(reply);
    let value: Value = serde_json::from_str(json)
        .map_err(|e| GenerationError::MalformedResponse(format!("invalid JSON: {e}")))?;
    DrillPayload::from_value(&value).map_err(|e| GenerationError::MalformedResponse(e.to_string()))
}

/// Full decode of a provider response body.
pub fn decode_body(body: &str) -> Result<DrillPayload, GenerationError> {
    let envelope: Value = serde_json::from_str(body).map_err(|e| {
        GenerationError::MalformedResponse(format!("response body is not JSON: {e}"))
    })?;
    let reply = extract_reply_text(&envelope)?;
    parse_payload(reply)
}
