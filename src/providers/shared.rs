//! Provider-agnostic error types.

use std::fmt;

use serde_json::Value;

/// Categories of provider errors for consistent error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// HTTP status error (4xx, 5xx)
    HttpStatus,
    /// Connection timeout or request timeout
    Timeout,
    /// Failed to parse the response body
    Parse,
    /// API-level error returned by the provider (e.g., quota, safety block)
    Api,
    /// The call succeeded but returned no text
    Empty,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderErrorKind::HttpStatus => write!(f, "http_status"),
            ProviderErrorKind::Timeout => write!(f, "timeout"),
            ProviderErrorKind::Parse => write!(f, "parse"),
            ProviderErrorKind::Api => write!(f, "api_error"),
            ProviderErrorKind::Empty => write!(f, "empty_response"),
        }
    }
}

/// Structured error from the provider with kind and details.
#[derive(Debug, Clone)]
pub struct ProviderError {
    /// Error category
    pub kind: ProviderErrorKind,
    /// One-line summary suitable for display
    pub message: String,
    /// Optional additional details (e.g., raw error body)
    pub details: Option<String>,
}

impl ProviderError {
    /// Creates a new provider error.
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(status: u16, body: &str) -> Self {
        let message = format!("HTTP {status}");
        let details = if body.is_empty() {
            None
        } else {
            // Try to extract a cleaner error message from JSON
            if let Ok(json) = serde_json::from_str::<Value>(body)
                && let Some(error_obj) = json.get("error")
                && let Some(msg) = error_obj.get("message").and_then(|v| v.as_str())
            {
                return Self {
                    kind: ProviderErrorKind::HttpStatus,
                    message: format!("HTTP {status}: {msg}"),
                    details: Some(body.to_string()),
                };
            }
            Some(body.to_string())
        };
        Self {
            kind: ProviderErrorKind::HttpStatus,
            message,
            details,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message)
    }

    /// Creates an API error from a provider error object.
    pub fn api(error_type: &str, message: &str) -> Self {
        Self {
            kind: ProviderErrorKind::Api,
            message: format!("{error_type}: {message}"),
            details: None,
        }
    }

    /// Creates an empty-response error. An empty answer is never appended
    /// to a transcript; it surfaces as this error instead.
    pub fn empty() -> Self {
        Self::new(ProviderErrorKind::Empty, "model returned an empty response")
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ProviderError {}

/// Maps a reqwest transport error onto the provider error taxonomy.
pub(crate) fn classify_reqwest_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::timeout(format!("Request timed out: {e}"))
    } else if e.is_connect() {
        ProviderError::timeout(format!("Connection failed: {e}"))
    } else {
        ProviderError::new(ProviderErrorKind::HttpStatus, format!("Network error: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_extracts_json_message() {
        let body =
            r#"{"error":{"code":429,"message":"Quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        let err = ProviderError::http_status(429, body);
        assert_eq!(err.kind, ProviderErrorKind::HttpStatus);
        assert_eq!(err.message, "HTTP 429: Quota exceeded");
        assert!(err.details.is_some());
    }

    #[test]
    fn test_http_status_without_body() {
        let err = ProviderError::http_status(500, "");
        assert_eq!(err.message, "HTTP 500");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_empty_response_kind() {
        let err = ProviderError::empty();
        assert_eq!(err.kind, ProviderErrorKind::Empty);
    }
}
