//! Keyed container of conversations.
//!
//! Both the send flow and the review flow write here. Every write clones
//! the current conversation, mutates the clone, and replaces the stored
//! value with a bumped revision, so readers always observe whole values
//! and never a half-applied change.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::domain::agent::Agent;
use crate::domain::conversation::{Conversation, ConversationKey};

/// In-memory conversation state owned by one orchestrator.
#[derive(Debug, Default)]
pub struct ConversationStore {
    conversations: RwLock<HashMap<ConversationKey, Conversation>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a conversation.
    pub async fn get(&self, key: &ConversationKey) -> Option<Conversation> {
        self.conversations.read().await.get(key).cloned()
    }

    /// Returns the conversation, seeding it with the agent's introduction
    /// on first access.
    pub async fn get_or_seed(&self, key: &ConversationKey, agent: &Agent) -> Conversation {
        if let Some(existing) = self.get(key).await {
            return existing;
        }
        let mut conversations = self.conversations.write().await;
        conversations
            .entry(key.clone())
            .or_insert_with(|| {
                tracing::info!(conversation = %key, "conversation seeded");
                let mut conversation = Conversation::seeded(key.clone(), agent);
                conversation.extract_pending_proposals();
                conversation
            })
            .clone()
    }

    /// Applies `change` to a copy of the conversation and stores the copy.
    /// Returns `None` if the conversation does not exist.
    pub async fn update<R>(
        &self,
        key: &ConversationKey,
        change: impl FnOnce(&mut Conversation) -> R,
    ) -> Option<R> {
        let mut conversations = self.conversations.write().await;
        let mut next = conversations.get(key)?.clone();
        let result = change(&mut next);
        next.bump_revision();
        conversations.insert(key.clone(), next);
        Some(result)
    }

    /// Like [`update`](Self::update) but commits only when `change`
    /// succeeds; on error the stored value is left untouched.
    pub async fn try_update<R, E>(
        &self,
        key: &ConversationKey,
        change: impl FnOnce(&mut Conversation) -> Result<R, E>,
    ) -> Option<Result<R, E>> {
        let mut conversations = self.conversations.write().await;
        let current = conversations.get(key)?;

        let mut next = current.clone();
        let result = change(&mut next);
        if result.is_ok() {
            next.bump_revision();
            conversations.insert(key.clone(), next);
        }
        Some(result)
    }

    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }
}
