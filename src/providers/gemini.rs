//! Gemini provider (Google Generative Language API).
//!
//! One call per prompt via the non-streaming `generateContent` endpoint;
//! the caller suspends until a response or error is returned. No retries,
//! no timeouts beyond the HTTP client defaults.

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{Value, json};

use crate::providers::shared::classify_reqwest_error;
use crate::providers::{ProviderError, ProviderErrorKind, Summarizer};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini API configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_output_tokens: u32,
}

impl GeminiConfig {
    /// Creates a new config from environment.
    ///
    /// Environment variables:
    /// - `GEMINI_API_KEY` (required)
    /// - `GEMINI_BASE_URL` (optional, wins over the config file)
    pub fn from_env(
        model: String,
        max_output_tokens: u32,
        config_base_url: Option<&str>,
    ) -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .context("GEMINI_API_KEY is not set. Set it to use Gemini.")?;
        let base_url = resolve_base_url(config_base_url)?;

        Ok(Self {
            api_key,
            base_url,
            model,
            max_output_tokens,
        })
    }
}

/// Gemini client.
pub struct GeminiClient {
    config: GeminiConfig,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    async fn generate_content(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = build_request(prompt, self.config.max_output_tokens);
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );

        tracing::debug!(model = %self.config.model, "sending generateContent request");

        let response = self
            .http
            .post(&url)
            .headers(build_headers(&self.config.api_key))
            .json(&request)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(ProviderError::http_status(status.as_u16(), &error_body));
        }

        let body: Value = response.json().await.map_err(|e| {
            ProviderError::new(
                ProviderErrorKind::Parse,
                format!("Failed to parse response JSON: {e}"),
            )
        })?;

        extract_text(&body)
    }
}

impl Summarizer for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.generate_content(prompt).await
    }
}

fn resolve_base_url(config_base_url: Option<&str>) -> Result<String> {
    if let Ok(env_url) = std::env::var("GEMINI_BASE_URL") {
        let trimmed = env_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.to_string());
        }
    }

    if let Some(config_url) = config_base_url {
        let trimmed = config_url.trim();
        if !trimmed.is_empty() {
            validate_url(trimmed)?;
            return Ok(trimmed.to_string());
        }
    }

    Ok(DEFAULT_BASE_URL.to_string())
}

fn validate_url(url: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid Gemini base URL: {url}"))?;
    Ok(())
}

fn build_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-goog-api-key",
        HeaderValue::from_str(api_key).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    headers.insert("accept", HeaderValue::from_static("application/json"));
    headers
}

fn build_request(prompt: &str, max_output_tokens: u32) -> Value {
    let mut request = json!({
        "contents": [
            {
                "role": "user",
                "parts": [{"text": prompt}]
            }
        ],
    });

    if max_output_tokens > 0 {
        request["generation_config"] = json!({
            "max_output_tokens": max_output_tokens
        });
    }

    request
}

/// Pulls the concatenated candidate text out of a `generateContent` response.
///
/// A response with an `error` object maps to an API error; a response whose
/// candidates carry no text (safety block, empty parts) maps to an
/// empty-response error.
fn extract_text(body: &Value) -> Result<String, ProviderError> {
    if let Some(error) = body.get("error") {
        let error_type = error
            .get("status")
            .or_else(|| error.get("code"))
            .and_then(|v| v.as_str())
            .unwrap_or("error");
        let message = error
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown error");
        return Err(ProviderError::api(error_type, message));
    }

    let mut text = String::new();
    if let Some(candidates) = body.get("candidates").and_then(|v| v.as_array())
        && let Some(candidate) = candidates.first()
        && let Some(parts) = candidate
            .get("content")
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
    {
        for part in parts {
            if let Some(chunk) = part.get("text").and_then(|v| v.as_str()) {
                text.push_str(chunk);
            }
        }
    }

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ProviderError::empty());
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_extract_text_concatenates_parts() {
        let body = json!({
            "candidates": [
                {
                    "content": {
                        "parts": [{"text": "Sales are up."}, {"text": " Costs are down."}],
                        "role": "model"
                    },
                    "finishReason": "STOP"
                }
            ]
        });
        assert_eq!(
            extract_text(&body).unwrap(),
            "Sales are up. Costs are down."
        );
    }

    #[test]
    fn test_extract_text_empty_candidates_is_error() {
        let body = json!({"candidates": []});
        let err = extract_text(&body).unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Empty);
    }

    #[test]
    fn test_extract_text_whitespace_only_is_error() {
        let body = json!({
            "candidates": [
                {"content": {"parts": [{"text": "   \n"}]}}
            ]
        });
        assert_eq!(
            extract_text(&body).unwrap_err().kind,
            ProviderErrorKind::Empty
        );
    }

    #[test]
    fn test_extract_text_surfaces_api_error() {
        let body = json!({
            "error": {"status": "RESOURCE_EXHAUSTED", "message": "Quota exceeded"}
        });
        let err = extract_text(&body).unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Api);
        assert!(err.message.contains("Quota exceeded"));
    }

    #[test]
    fn test_build_request_embeds_prompt_and_tokens() {
        let request = build_request("hello", 256);
        assert_eq!(request["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(request["generation_config"]["max_output_tokens"], 256);
    }

    #[test]
    fn test_build_request_zero_tokens_omits_generation_config() {
        let request = build_request("hello", 0);
        assert!(request.get("generation_config").is_none());
    }
}
