//! Context window management for LLM requests.
//!
//! The window is the ordered, role-tagged history sent to the provider on
//! every turn. It always starts with exactly one system message holding the
//! agent's instruction and keeps at most `max_recent` messages after it.
//! Document snapshots are injected as transient system messages around a
//! turn and retracted afterwards so they never pile up.

use serde::{Deserialize, Serialize};

/// Prefix marking a transient document snapshot message.
pub const DOCUMENT_CONTEXT_PREFIX: &str = "Current document content:";

/// Messages kept after the system instruction.
pub const DEFAULT_MAX_RECENT_MESSAGES: usize = 10;

/// Role of a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System prompt (instructions to the AI).
    System,
    /// User input.
    User,
    /// AI response.
    Assistant,
}

/// A message in the conversation context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMessage {
    /// The role of the message sender.
    pub role: MessageRole,
    /// The content of the message.
    pub content: String,
}

impl ContextMessage {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }

    /// Creates the transient system message wrapping a document snapshot.
    pub fn document_snapshot(document: &str) -> Self {
        Self::system(format!(
            "{}\n```markdown\n{}\n```",
            DOCUMENT_CONTEXT_PREFIX, document
        ))
    }

    /// True for transient document snapshot messages.
    pub fn is_document_snapshot(&self) -> bool {
        self.role == MessageRole::System && self.content.starts_with(DOCUMENT_CONTEXT_PREFIX)
    }
}

/// Bounded, ordered history for one agent conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextWindow {
    messages: Vec<ContextMessage>,
    max_recent: usize,
}

impl ContextWindow {
    /// Creates a window holding only the system instruction.
    pub fn new(system_instruction: impl Into<String>, max_recent: usize) -> Self {
        Self {
            messages: vec![ContextMessage::system(system_instruction)],
            max_recent: max_recent.max(1),
        }
    }

    /// The permanent system instruction at index 0.
    pub fn system_instruction(&self) -> &str {
        &self.messages[0].content
    }

    /// All messages, oldest first.
    pub fn messages(&self) -> &[ContextMessage] {
        &self.messages
    }

    /// Number of messages including the system instruction.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True when only the system instruction is present.
    pub fn is_empty(&self) -> bool {
        self.messages.len() <= 1
    }

    /// Largest length the window reaches after truncation.
    pub fn capacity(&self) -> usize {
        self.max_recent + 1
    }

    /// Appends a message at the end.
    pub fn push(&mut self, message: ContextMessage) {
        self.messages.push(message);
    }

    /// Appends a transient document snapshot.
    pub fn inject_document(&mut self, document: &str) {
        self.messages.push(ContextMessage::document_snapshot(document));
    }

    /// Removes every transient document snapshot. Returns how many were removed.
    pub fn retract_documents(&mut self) -> usize {
        let before = self.messages.len();
        let mut index = 0;
        self.messages.retain(|message| {
            let keep = index == 0 || !message.is_document_snapshot();
            index += 1;
            keep
        });
        before - self.messages.len()
    }

    /// Keeps the system instruction plus the most recent `max_recent`
    /// messages. Returns how many messages were dropped.
    pub fn truncate(&mut self) -> usize {
        let limit = self.capacity();
        if self.messages.len() <= limit {
            return 0;
        }
        let dropped = self.messages.len() - limit;
        self.messages.drain(1..1 + dropped);
        dropped
    }
}
