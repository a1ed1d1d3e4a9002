//! Conversation aggregate: the message history for one document and agent.

use serde::{Deserialize, Serialize};

use super::message::ChatMessage;
use crate::domain::agent::Agent;
use crate::domain::foundation::{AgentId, DocumentId, MessageId};

/// Identifies a conversation. Each (document, agent) pair has its own
/// independent history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationKey {
    pub document_id: DocumentId,
    pub agent_id: AgentId,
}

impl ConversationKey {
    pub fn new(document_id: DocumentId, agent_id: AgentId) -> Self {
        Self {
            document_id,
            agent_id,
        }
    }
}

impl std::fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.document_id, self.agent_id)
    }
}

/// Ordered messages of one conversation.
///
/// `revision` increases on every committed write so observers can detect
/// changes by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    key: ConversationKey,
    messages: Vec<ChatMessage>,
    revision: u64,
}

impl Conversation {
    /// Starts a conversation with the agent's introduction as the only
    /// message.
    pub fn seeded(key: ConversationKey, agent: &Agent) -> Self {
        Self {
            key,
            messages: vec![ChatMessage::assistant(&agent.intro_message, &agent.name)],
            revision: 0,
        }
    }

    pub fn key(&self) -> &ConversationKey {
        &self.key
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// True while any message is still waiting for the provider.
    pub fn is_loading(&self) -> bool {
        self.messages.iter().any(ChatMessage::is_loading)
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn message(&self, id: MessageId) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.id() == id)
    }

    pub fn message_mut(&mut self, id: MessageId) -> Option<&mut ChatMessage> {
        self.messages.iter_mut().find(|m| m.id() == id)
    }

    /// Parses every final, not yet parsed message. Returns how many
    /// proposals were attached.
    pub fn extract_pending_proposals(&mut self) -> usize {
        self.messages
            .iter_mut()
            .map(ChatMessage::extract_proposals)
            .sum()
    }

    pub(crate) fn bump_revision(&mut self) {
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(doc: &str, agent: &str) -> ConversationKey {
        ConversationKey::new(DocumentId::new(doc).unwrap(), AgentId::new(agent).unwrap())
    }

    fn agent() -> Agent {
        Agent::new(
            AgentId::new("editor").unwrap(),
            "Editor",
            "Be an editor.",
            "Hello, I edit.",
        )
    }

    #[test]
    fn seeded_conversation_holds_the_intro() {
        let conversation = Conversation::seeded(key("1", "editor"), &agent());

        assert_eq!(conversation.messages().len(), 1);
        let intro = &conversation.messages()[0];
        assert_eq!(intro.content(), "Hello, I edit.");
        assert_eq!(intro.agent(), Some("Editor"));
        assert!(!intro.is_loading());
        assert!(!conversation.is_loading());
        assert_eq!(conversation.revision(), 0);
    }

    #[test]
    fn loading_placeholder_makes_conversation_loading() {
        let mut conversation = Conversation::seeded(key("1", "editor"), &agent());
        conversation.push(ChatMessage::user("hi"));
        let placeholder = ChatMessage::placeholder("Editor");
        let id = placeholder.id();
        conversation.push(placeholder);

        assert!(conversation.is_loading());

        conversation.message_mut(id).unwrap().finalize("done");
        assert!(!conversation.is_loading());
    }

    #[test]
    fn extract_pending_proposals_skips_loading_messages() {
        let mut conversation = Conversation::seeded(key("1", "editor"), &agent());
        conversation.push(ChatMessage::placeholder("Editor"));

        assert_eq!(conversation.extract_pending_proposals(), 0);
        assert!(conversation.messages().iter().all(|m| m.is_parsed() != m.is_loading()));
    }

    #[test]
    fn keys_differ_per_axis() {
        assert_ne!(key("1", "editor"), key("2", "editor"));
        assert_ne!(key("1", "editor"), key("1", "reviewer"));
        assert_eq!(key("1", "editor").to_string(), "1-editor");
    }
}
