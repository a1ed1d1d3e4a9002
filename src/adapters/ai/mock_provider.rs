//! Mock AI Provider for testing.
//!
//! Provides a configurable mock implementation of the AIProvider port,
//! allowing tests to run without calling real AI APIs.
//!
//! # Features
//!
//! - Pre-configured responses, consumed in order
//! - Status error injection for retry testing
//! - Simulated latency
//! - Call tracking with request snapshots and call instants
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_status_error(429)
//!     .with_response("Hello, I'm the assistant!");
//!
//! let response = provider.complete(request).await?;
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::{sleep, Instant};

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse};

/// Content returned once the configured queue is exhausted.
pub const DEFAULT_MOCK_RESPONSE: &str = "Mock response";

/// Mock AI provider for testing.
///
/// Clones share the same queue and call log.
#[derive(Debug, Clone, Default)]
pub struct MockAIProvider {
    /// Pre-configured responses (consumed in order).
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    /// Simulated latency per request.
    delay: Duration,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a successful completion.
    Success { content: String },
    /// Return an error.
    Error(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    /// Simulate an error status from the provider API.
    Status {
        status: u16,
        code: Option<String>,
        error_type: Option<String>,
        message: String,
    },
    /// Simulate a network failure.
    Network { message: String },
}

impl MockError {
    /// Status error with a generic message.
    pub fn status(status: u16) -> Self {
        Self::Status {
            status,
            code: None,
            error_type: None,
            message: format!("mock status {}", status),
        }
    }
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::Status {
                status,
                code,
                error_type,
                message,
            } => AIError::Status {
                status,
                code,
                error_type,
                message,
            },
            MockError::Network { message } => AIError::network(message),
        }
    }
}

/// One recorded `complete` call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Request as received.
    pub request: CompletionRequest,
    /// When the call arrived (tokio clock, so paused-time tests see virtual time).
    pub at: Instant,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockAIProvider {
    /// Creates a new mock provider with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a successful response to the queue.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        lock(&self.responses).push_back(MockResponse::Success {
            content: content.into(),
        });
        self
    }

    /// Adds an error response to the queue.
    pub fn with_error(self, error: MockError) -> Self {
        lock(&self.responses).push_back(MockResponse::Error(error));
        self
    }

    /// Adds an error status response to the queue.
    pub fn with_status_error(self, status: u16) -> Self {
        self.with_error(MockError::status(status))
    }

    /// Adds `times` identical error status responses to the queue.
    pub fn with_status_errors(self, status: u16, times: usize) -> Self {
        (0..times).fold(self, |provider, _| provider.with_status_error(status))
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queues a response on an already shared provider.
    pub fn push_response(&self, content: impl Into<String>) {
        lock(&self.responses).push_back(MockResponse::Success {
            content: content.into(),
        });
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Returns all recorded requests.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        lock(&self.calls).iter().map(|c| c.request.clone()).collect()
    }

    /// Returns the instant of every call, in order.
    pub fn call_instants(&self) -> Vec<Instant> {
        lock(&self.calls).iter().map(|c| c.at).collect()
    }

    /// Clears the call history.
    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    /// Number of queued responses not yet consumed.
    pub fn remaining_responses(&self) -> usize {
        lock(&self.responses).len()
    }

    /// Gets the next response or a default.
    fn next_response(&self) -> MockResponse {
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| MockResponse::Success {
                content: DEFAULT_MOCK_RESPONSE.to_string(),
            })
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let model = request.model.clone();

        // Record the call
        lock(&self.calls).push(RecordedCall {
            request,
            at: Instant::now(),
        });

        // Simulate delay
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Success { content } => Ok(CompletionResponse::new(content, model)),
            MockResponse::Error(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::ContextMessage;

    fn test_request() -> CompletionRequest {
        CompletionRequest::new(vec![
            ContextMessage::system("Be helpful"),
            ContextMessage::user("Hello"),
        ])
    }

    #[tokio::test]
    async fn mock_provider_returns_configured_response() {
        let provider = MockAIProvider::new().with_response("Hello from mock!");

        let response = provider.complete(test_request()).await.unwrap();

        assert_eq!(response.content, "Hello from mock!");
        assert_eq!(response.model, "gpt-4");
    }

    #[tokio::test]
    async fn mock_provider_returns_responses_in_order() {
        let provider = MockAIProvider::new()
            .with_response("First")
            .with_response("Second");

        let r1 = provider.complete(test_request()).await.unwrap();
        let r2 = provider.complete(test_request()).await.unwrap();

        assert_eq!(r1.content, "First");
        assert_eq!(r2.content, "Second");
    }

    #[tokio::test]
    async fn mock_provider_returns_default_after_exhausted() {
        let provider = MockAIProvider::new().with_response("Only one");

        provider.complete(test_request()).await.unwrap();
        let r2 = provider.complete(test_request()).await.unwrap();

        assert_eq!(r2.content, DEFAULT_MOCK_RESPONSE);
    }

    #[tokio::test]
    async fn mock_provider_returns_configured_status_error() {
        let provider = MockAIProvider::new().with_error(MockError::Status {
            status: 429,
            code: Some("rate_limit_exceeded".into()),
            error_type: Some("requests".into()),
            message: "slow down".into(),
        });

        let err = provider.complete(test_request()).await.unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(err.status(), Some(429));
        assert_eq!(err.code(), Some("rate_limit_exceeded"));
    }

    #[tokio::test]
    async fn mock_provider_queues_repeated_errors() {
        let provider = MockAIProvider::new()
            .with_status_errors(503, 2)
            .with_response("ok");

        assert_eq!(provider.remaining_responses(), 3);
        assert!(provider.complete(test_request()).await.is_err());
        assert!(provider.complete(test_request()).await.is_err());
        assert_eq!(provider.complete(test_request()).await.unwrap().content, "ok");
    }

    #[tokio::test]
    async fn mock_provider_tracks_calls() {
        let provider = MockAIProvider::new();
        assert_eq!(provider.call_count(), 0);

        provider.complete(test_request()).await.unwrap();
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.get_calls()[0].messages.len(), 2);

        provider.clear_calls();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn clones_share_queue_and_log() {
        let provider = MockAIProvider::new();
        let handle = provider.clone();
        handle.push_response("shared");

        let response = provider.complete(test_request()).await.unwrap();

        assert_eq!(response.content, "shared");
        assert_eq!(handle.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn mock_provider_respects_delay() {
        let provider = MockAIProvider::new()
            .with_response("Delayed response")
            .with_delay(Duration::from_millis(50));

        let start = Instant::now();
        provider.complete(test_request()).await.unwrap();

        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn mock_error_converts_to_ai_error() {
        let err: AIError = MockError::status(500).into();
        assert_eq!(err.status(), Some(500));

        let err: AIError = MockError::Network {
            message: "reset".into(),
        }
        .into();
        assert!(matches!(err, AIError::Network(_)));
    }
}
