//! Conversation context manager.
//!
//! One manager per (document, agent) pair. It owns the context window for
//! that pair, performs the send/receive cycle against the AI provider with
//! retry, and injects the current document text around each turn.
//!
//! Only one send may be in flight per manager; a second concurrent send is
//! rejected immediately and never queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use super::retry::RetryPolicy;
use crate::config::AppConfig;
use crate::domain::agent::Agent;
use crate::domain::conversation::{ContextMessage, ContextWindow, DEFAULT_MAX_RECENT_MESSAGES};
use crate::domain::foundation::{DomainError, ErrorCode, StateMachine};
use crate::ports::{AIError, AIProvider, CompletionRequest};

/// Errors returned by [`ConversationManager::send_message`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversationError {
    /// A send is already in flight on this manager.
    #[error("a message is already being processed")]
    AlreadyProcessing,

    /// The provider failed after retries, or with a non-retryable error.
    #[error(transparent)]
    Api(#[from] AIError),
}

impl ConversationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::AlreadyProcessing => ErrorCode::AlreadyProcessing,
            Self::Api(_) => ErrorCode::AIProviderError,
        }
    }
}

impl From<ConversationError> for DomainError {
    fn from(err: ConversationError) -> Self {
        let mut domain = DomainError::new(err.code(), err.to_string());
        if let ConversationError::Api(api) = &err {
            if let Some(status) = api.status() {
                domain = domain.with_detail("status", status.to_string());
            }
            if let Some(code) = api.code() {
                domain = domain.with_detail("code", code);
            }
            if let Some(error_type) = api.error_type() {
                domain = domain.with_detail("type", error_type);
            }
        }
        domain
    }
}

/// Lifecycle of a manager: `Idle -> Sending -> (Idle | Failed)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerState {
    Idle,
    Sending,
    Failed,
}

impl StateMachine for ManagerState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ManagerState::*;
        matches!(
            (self, target),
            (Idle, Sending) | (Failed, Sending) | (Sending, Idle) | (Sending, Failed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ManagerState::*;
        match self {
            Idle | Failed => vec![Sending],
            Sending => vec![Idle, Failed],
        }
    }

    fn is_terminal(&self) -> bool {
        false
    }
}

/// Request parameters shared by every manager of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct ManagerSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub max_recent_messages: usize,
    pub retry: RetryPolicy,
}

impl ManagerSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model: config.llm.model.clone(),
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
            max_recent_messages: config.conversation.max_recent_messages,
            retry: RetryPolicy::from_config(&config.llm),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            max_recent_messages: DEFAULT_MAX_RECENT_MESSAGES,
            retry: RetryPolicy::default(),
        }
    }
}

/// Clears the in-flight flag when the send finishes, however it finishes.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Context manager for one agent conversation.
pub struct ConversationManager {
    agent: Agent,
    provider: Arc<dyn AIProvider>,
    settings: ManagerSettings,
    window: Mutex<ContextWindow>,
    document: Mutex<Option<String>>,
    in_flight: AtomicBool,
    last_failed: AtomicBool,
}

impl ConversationManager {
    /// Creates a manager whose window holds only the agent's instruction.
    pub fn new(agent: Agent, provider: Arc<dyn AIProvider>, settings: ManagerSettings) -> Self {
        let window = ContextWindow::new(&agent.system_instruction, settings.max_recent_messages);
        Self {
            agent,
            provider,
            settings,
            window: Mutex::new(window),
            document: Mutex::new(None),
            in_flight: AtomicBool::new(false),
            last_failed: AtomicBool::new(false),
        }
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// True while a send is in flight.
    pub fn is_processing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn state(&self) -> ManagerState {
        if self.is_processing() {
            ManagerState::Sending
        } else if self.last_failed.load(Ordering::Acquire) {
            ManagerState::Failed
        } else {
            ManagerState::Idle
        }
    }

    /// Snapshot of the current context window.
    pub async fn window(&self) -> ContextWindow {
        self.window.lock().await.clone()
    }

    /// Replaces the document text injected at the next send. The window
    /// itself is not touched. An empty document is not injected.
    pub async fn update_document_content(&self, content: impl Into<String>) {
        *self.document.lock().await = Some(content.into());
    }

    /// Sends a user message and returns the assistant's reply.
    ///
    /// On failure the window is restored to its state before the call, so
    /// the manager can be reused.
    ///
    /// # Errors
    ///
    /// - `AlreadyProcessing` if another send is in flight
    /// - `Api` if the provider failed after retries
    pub async fn send_message(&self, text: impl Into<String>) -> Result<String, ConversationError> {
        let _in_flight = InFlight::acquire(&self.in_flight).ok_or_else(|| {
            tracing::warn!(agent = %self.agent.id, "send rejected, already processing");
            ConversationError::AlreadyProcessing
        })?;

        let (request, previous) = self.prepare_request(text.into()).await;

        tracing::info!(
            agent = %self.agent.id,
            messages = request.messages.len(),
            "sending message"
        );

        let provider = &self.provider;
        let result = self
            .settings
            .retry
            .run(|| provider.complete(request.clone()))
            .await;

        let mut window = self.window.lock().await;
        match result {
            Ok(response) => {
                window.push(ContextMessage::assistant(&response.content));
                let retracted = window.retract_documents();
                window.truncate();
                self.last_failed.store(false, Ordering::Release);
                tracing::debug!(
                    agent = %self.agent.id,
                    window_len = window.len(),
                    retracted,
                    "reply received"
                );
                Ok(response.content)
            }
            Err(err) => {
                *window = previous;
                self.last_failed.store(true, Ordering::Release);
                tracing::error!(
                    agent = %self.agent.id,
                    status = ?err.status(),
                    error = %err,
                    "provider call failed"
                );
                Err(err.into())
            }
        }
    }

    async fn prepare_request(&self, text: String) -> (CompletionRequest, ContextWindow) {
        let document = self.document.lock().await.clone();
        let mut window = self.window.lock().await;
        let previous = window.clone();

        if let Some(document) = document.as_deref().filter(|d| !d.is_empty()) {
            window.inject_document(document);
        }
        window.push(ContextMessage::user(text));
        let dropped = window.truncate();
        if dropped > 0 {
            tracing::debug!(agent = %self.agent.id, dropped, "context window truncated");
        }

        let request = CompletionRequest::new(window.messages().to_vec())
            .with_model(&self.settings.model)
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.max_tokens);

        (request, previous)
    }
}

impl std::fmt::Debug for ConversationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationManager")
            .field("agent", &self.agent.id)
            .field("state", &self.state())
            .finish()
    }
}
