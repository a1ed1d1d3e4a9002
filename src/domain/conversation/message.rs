//! Chat message entity.
//!
//! Unlike context messages, chat messages are what the user sees. An
//! assistant message is created as a loading placeholder when a request
//! starts and is then resolved in place, first with its final content and
//! later as the statuses of its proposals change.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MessageId, ProposalId, Timestamp};
use crate::domain::proposal::{parse_change_proposals, ChangeProposal};

/// Prefix of the content shown when the provider call failed.
pub const FAILURE_PREFIX: &str = "Failed to get a response:";

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

/// A user-visible message in a conversation.
///
/// # Invariants
///
/// - `proposals` is populated at most once, the first time the message is
///   observed with `loading == false`
/// - a failed message never carries proposals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    id: MessageId,
    role: ChatRole,
    content: String,
    agent: Option<String>,
    timestamp: Timestamp,
    loading: bool,
    proposals: Option<Vec<ChangeProposal>>,
    failure: Option<String>,
    #[serde(default)]
    proposals_parsed: bool,
}

impl ChatMessage {
    fn new(role: ChatRole, content: String, agent: Option<String>, loading: bool) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content,
            agent,
            timestamp: Timestamp::now(),
            loading,
            proposals: None,
            failure: None,
            proposals_parsed: role == ChatRole::User,
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content.into(), None, false)
    }

    /// Creates a final assistant message attributed to `agent`.
    pub fn assistant(content: impl Into<String>, agent: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content.into(), Some(agent.into()), false)
    }

    /// Creates an empty, loading assistant placeholder attributed to `agent`.
    pub fn placeholder(agent: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, String::new(), Some(agent.into()), true)
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn role(&self) -> ChatRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Name of the agent that wrote the message, if any.
    pub fn agent(&self) -> Option<&str> {
        self.agent.as_deref()
    }

    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Proposals found in the message, if any were found.
    pub fn proposals(&self) -> Option<&[ChangeProposal]> {
        self.proposals.as_deref()
    }

    /// Looks up one of the message's proposals.
    pub fn proposal(&self, id: &ProposalId) -> Option<&ChangeProposal> {
        self.proposals.as_ref()?.iter().find(|p| &p.id == id)
    }

    /// Mutable access to one of the message's proposals.
    pub fn proposal_mut(&mut self, id: &ProposalId) -> Option<&mut ChangeProposal> {
        self.proposals.as_mut()?.iter_mut().find(|p| &p.id == id)
    }

    /// Error text if the provider call behind this message failed.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// True once the message has been run through the proposal parser
    /// (or can never carry proposals).
    pub fn is_parsed(&self) -> bool {
        self.proposals_parsed
    }

    /// Resolves a loading placeholder with its final content.
    pub fn finalize(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.loading = false;
    }

    /// Resolves a loading placeholder as failed. The message is marked
    /// parsed so the error text is never scanned for proposals.
    pub fn fail(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        self.content = format!("{} {}", FAILURE_PREFIX, reason);
        self.failure = Some(reason);
        self.loading = false;
        self.proposals_parsed = true;
    }

    /// Runs the proposal parser over the final content, at most once.
    ///
    /// When proposals are found the content is replaced with the cleaned
    /// text and the proposals are attached. Returns the number of
    /// proposals attached by this call.
    pub fn extract_proposals(&mut self) -> usize {
        if self.loading || self.proposals_parsed {
            return 0;
        }
        self.proposals_parsed = true;

        let parsed = parse_change_proposals(&self.content);
        if !parsed.has_proposals() {
            return 0;
        }

        let count = parsed.proposals.len();
        self.content = parsed.content;
        self.proposals = Some(parsed.proposals);
        count
    }
}
