use serde_json::{Value, json};

use crate::generator::error::GenerationError;
#[cfg(feature = "network")]
use crate::generator::response::provider_error;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Everything needed for one generation call.
#[derive(Clone)]
pub struct GenerationRequest {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub prompt: String,
}

impl GenerationRequest {
    /// Endpoint URL without the credential, which travels as a query parameter.
    pub fn url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    pub fn body(&self) -> Value {
        json!({ "contents": [{ "parts": [{ "text": self.prompt }] }] })
    }
}

impl std::fmt::Debug for GenerationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationRequest")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("prompt_chars", &self.prompt.chars().count())
            .finish()
    }
}

/// Performs the single POST and returns the raw response body.
pub trait GenerationClient: Send + Sync {
    fn send(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

/// Client for the Gemini `generateContent` endpoint.
#[derive(Default)]
pub struct GeminiClient;

impl GeminiClient {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "network")]
impl GenerationClient for GeminiClient {
    fn send(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let transport = |e: reqwest::Error| GenerationError::Transport(e.without_url().to_string());

        let client = reqwest::blocking::Client::builder().build().map_err(transport)?;
        let body = serde_json::to_string(&request.body())
            .map_err(|e| GenerationError::Transport(e.to_string()))?;
        let response = client
            .post(request.url())
            .query(&[("key", request.api_key.as_str())])
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(transport)?;

        let status = response.status();
        let text = response.text().map_err(transport)?;
        if status.is_success() {
            return Ok(text);
        }
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|value| provider_error(&value))
            .unwrap_or_else(|| format!("HTTP {status}"));
        Err(GenerationError::Provider(message))
    }
}

#[cfg(not(feature = "network"))]
impl GenerationClient for GeminiClient {
    fn send(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
        Err(GenerationError::Transport(
            "built without network support".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest {
            endpoint: format!("{DEFAULT_ENDPOINT}/"),
            model: DEFAULT_MODEL.to_string(),
            api_key: "secret-key".to_string(),
            prompt: "Make drills".to_string(),
        }
    }

    #[test]
    fn url_joins_endpoint_and_model() {
        assert_eq!(
            request().url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn body_wraps_prompt_in_contents() {
        let body = request().body();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Make drills");
    }

    #[test]
    fn debug_never_shows_the_key() {
        assert!(!format!("{:?}", request()).contains("secret-key"));
    }
}
