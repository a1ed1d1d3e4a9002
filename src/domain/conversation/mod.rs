//! Conversation domain module.
//!
//! One conversation per (document, agent) pair. Holds the user-visible
//! chat history and the bounded context window sent to the provider.

mod context;
mod message;
mod state;

pub use context::{
    ContextMessage, ContextWindow, MessageRole, DEFAULT_MAX_RECENT_MESSAGES,
    DOCUMENT_CONTEXT_PREFIX,
};
pub use message::{ChatMessage, ChatRole, FAILURE_PREFIX};
pub use state::{Conversation, ConversationKey};
