//! AI Provider Port - Interface for LLM completions.
//!
//! The provider is the only network boundary of the editor core. A request
//! is the full context window plus sampling parameters; a response is one
//! text completion. Retry and backoff are the caller's responsibility, the
//! provider performs exactly one attempt per call.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoProvider;
//!
//! #[async_trait]
//! impl AIProvider for EchoProvider {
//!     async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
//!         let last = request.messages.last().map(|m| m.content.clone()).unwrap_or_default();
//!         Ok(CompletionResponse::new(last, request.model))
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::conversation::ContextMessage;

/// HTTP statuses worth retrying: rate limiting and transient server errors.
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Port for AI/LLM provider interactions.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Generate a single completion (non-streaming).
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError>;
}

/// Request for AI completion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    /// Ordered, role-tagged context window.
    pub messages: Vec<ContextMessage>,
    /// Model identifier.
    pub model: String,
    /// Temperature for response randomness.
    pub temperature: f32,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Creates a request with the default model parameters.
    pub fn new(messages: Vec<ContextMessage>) -> Self {
        Self {
            messages,
            model: "gpt-4".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
        }
    }

    /// Sets the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Response from AI completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated content.
    pub content: String,
    /// Model that generated the response.
    pub model: String,
}

impl CompletionResponse {
    pub fn new(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
        }
    }
}

/// AI provider errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AIError {
    /// Provider answered with an error status.
    #[error("API request failed with status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Provider-specific error code, e.g. `rate_limit_exceeded`.
        code: Option<String>,
        /// Provider-specific error type, e.g. `requests`.
        error_type: Option<String>,
        /// Human readable message.
        message: String,
    },

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl AIError {
    /// Creates a status error without provider code or type.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            code: None,
            error_type: None,
            message: message.into(),
        }
    }

    /// Creates a status error carrying the provider's code and type.
    pub fn api_with_details(
        status: u16,
        code: impl Into<String>,
        error_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Status {
            status,
            code: Some(code.into()),
            error_type: Some(error_type.into()),
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// HTTP status, if the provider answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Provider error code, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Status { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Provider error type, if any.
    pub fn error_type(&self) -> Option<&str> {
        match self {
            Self::Status { error_type, .. } => error_type.as_deref(),
            _ => None,
        }
    }

    /// Returns true only for transient statuses (429 and 5xx gateway errors).
    pub fn is_retryable(&self) -> bool {
        self.status()
            .map(|status| RETRYABLE_STATUSES.contains(&status))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::MessageRole;

    #[test]
    fn completion_request_builder_works() {
        let request = CompletionRequest::new(vec![ContextMessage::user("Hello")])
            .with_model("gpt-4o")
            .with_max_tokens(100)
            .with_temperature(0.2);

        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, MessageRole::User);
        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.max_tokens, 100);
        assert_eq!(request.temperature, 0.2);
    }

    #[test]
    fn completion_request_defaults() {
        let request = CompletionRequest::new(vec![]);
        assert_eq!(request.model, "gpt-4");
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, 1000);
    }

    #[test]
    fn ai_error_retryable_classification() {
        for status in [429, 500, 502, 503, 504] {
            assert!(AIError::api(status, "x").is_retryable(), "{} should retry", status);
        }
        for status in [400, 401, 403, 404, 501] {
            assert!(!AIError::api(status, "x").is_retryable(), "{} should not retry", status);
        }
        assert!(!AIError::network("reset").is_retryable());
        assert!(!AIError::parse("bad json").is_retryable());
    }

    #[test]
    fn ai_error_exposes_status_code_and_type() {
        let err = AIError::api_with_details(429, "rate_limit_exceeded", "requests", "slow down");
        assert_eq!(err.status(), Some(429));
        assert_eq!(err.code(), Some("rate_limit_exceeded"));
        assert_eq!(err.error_type(), Some("requests"));

        let err = AIError::network("down");
        assert_eq!(err.status(), None);
        assert_eq!(err.code(), None);
    }

    #[test]
    fn ai_error_displays_correctly() {
        let err = AIError::api(503, "overloaded");
        assert_eq!(err.to_string(), "API request failed with status 503: overloaded");

        let err = AIError::InvalidRequest("empty window".into());
        assert_eq!(err.to_string(), "invalid request: empty window");
    }
}
