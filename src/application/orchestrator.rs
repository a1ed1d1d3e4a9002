//! Conversation orchestrator.
//!
//! Session-level coordinator. Maps each (document, agent) pair to its own
//! conversation and context manager, drives the message lifecycle
//! (`loading` placeholder, then resolved in place), triggers proposal
//! extraction once per finished reply, and runs the accept/reject flow.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

use super::conversation_manager::{ConversationError, ConversationManager, ManagerSettings};
use super::conversation_store::ConversationStore;
use crate::config::{AppConfig, ValidationError};
use crate::domain::agent::Agent;
use crate::domain::conversation::{ChatMessage, Conversation, ConversationKey};
use crate::domain::foundation::{
    AgentId, DocumentId, DomainError, ErrorCode, MessageId, ProposalId,
};
use crate::domain::proposal::{apply_proposal, ApplyError, ChangeProposal, ProposalStatus};
use crate::ports::{AIProvider, AgentStore, DocumentStore, DocumentStoreError};

/// Errors returned by orchestrator operations other than review.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrchestratorError {
    #[error("no document is selected")]
    NoActiveConversation,

    #[error("agent not found: {0}")]
    AgentNotFound(AgentId),

    #[error(transparent)]
    Document(#[from] DocumentStoreError),

    #[error(transparent)]
    Conversation(#[from] ConversationError),
}

impl OrchestratorError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NoActiveConversation => ErrorCode::NoActiveConversation,
            Self::AgentNotFound(_) => ErrorCode::AgentNotFound,
            Self::Document(DocumentStoreError::NotFound(_)) => ErrorCode::DocumentNotFound,
            Self::Document(DocumentStoreError::Storage(_)) => ErrorCode::StorageError,
            Self::Conversation(err) => err.code(),
        }
    }
}

impl From<OrchestratorError> for DomainError {
    fn from(err: OrchestratorError) -> Self {
        match err {
            OrchestratorError::Document(err) => err.into(),
            OrchestratorError::Conversation(err) => err.into(),
            other => DomainError::new(other.code(), other.to_string()),
        }
    }
}

/// What the user decided about a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Accept,
    Reject,
}

/// Why a review did nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewSkip {
    #[error("no document is selected")]
    NoActiveConversation,

    #[error("message {0} not found")]
    MessageNotFound(MessageId),

    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),

    #[error("proposal was already {0:?}")]
    AlreadyReviewed(ProposalStatus),

    #[error(transparent)]
    Apply(#[from] ApplyError),

    #[error("document unavailable: {0}")]
    DocumentUnavailable(#[from] DocumentStoreError),
}

impl ReviewSkip {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NoActiveConversation => ErrorCode::NoActiveConversation,
            Self::MessageNotFound(_) => ErrorCode::MessageNotFound,
            Self::ProposalNotFound(_) => ErrorCode::ProposalNotFound,
            Self::AlreadyReviewed(_) => ErrorCode::InvalidStateTransition,
            Self::Apply(ApplyError::MissingLocation) => ErrorCode::MissingLocation,
            Self::Apply(ApplyError::OutOfBounds { .. }) => ErrorCode::OutOfBounds,
            Self::DocumentUnavailable(DocumentStoreError::NotFound(_)) => ErrorCode::DocumentNotFound,
            Self::DocumentUnavailable(DocumentStoreError::Storage(_)) => ErrorCode::StorageError,
        }
    }
}

/// Result of a review action. Reviews never fail; problems are reported
/// as `Skipped` and leave both the proposal and the document unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// Proposal accepted and the document rewritten.
    Applied {
        document_id: DocumentId,
        content: String,
    },
    /// Proposal rejected; the document was not touched.
    Rejected,
    Skipped(ReviewSkip),
}

/// A finished send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    /// The assistant message that now carries the reply.
    pub message_id: MessageId,
    /// Proposals found in the reply.
    pub proposals: usize,
}

#[derive(Debug, Clone)]
struct Selection {
    document: Option<DocumentId>,
    agent: AgentId,
}

/// Coordinates conversations for one editing session.
pub struct ConversationOrchestrator {
    provider: Arc<dyn AIProvider>,
    agents: Arc<dyn AgentStore>,
    documents: Arc<dyn DocumentStore>,
    store: Arc<ConversationStore>,
    settings: ManagerSettings,
    managers: Mutex<HashMap<ConversationKey, Arc<ConversationManager>>>,
    selection: RwLock<Selection>,
}

impl ConversationOrchestrator {
    /// Creates an orchestrator with no document selected.
    pub fn new(
        provider: Arc<dyn AIProvider>,
        agents: Arc<dyn AgentStore>,
        documents: Arc<dyn DocumentStore>,
        settings: ManagerSettings,
        default_agent: AgentId,
    ) -> Self {
        Self {
            provider,
            agents,
            documents,
            store: Arc::new(ConversationStore::new()),
            settings,
            managers: Mutex::new(HashMap::new()),
            selection: RwLock::new(Selection {
                document: None,
                agent: default_agent,
            }),
        }
    }

    /// Creates an orchestrator from application configuration. The
    /// configured default agent is selected initially.
    ///
    /// # Errors
    ///
    /// `MissingRequired` if no default agent is configured.
    pub fn from_config(
        provider: Arc<dyn AIProvider>,
        agents: Arc<dyn AgentStore>,
        documents: Arc<dyn DocumentStore>,
        config: &AppConfig,
    ) -> Result<Self, ValidationError> {
        let default_agent = AgentId::new(config.conversation.default_agent.trim())
            .map_err(|_| ValidationError::MissingRequired("CONVERSATION__DEFAULT_AGENT"))?;
        Ok(Self::new(
            provider,
            agents,
            documents,
            ManagerSettings::from_config(config),
            default_agent,
        ))
    }

    /// Uses an existing conversation store instead of a fresh one.
    pub fn with_store(mut self, store: Arc<ConversationStore>) -> Self {
        self.store = store;
        self
    }

    pub fn store(&self) -> &Arc<ConversationStore> {
        &self.store
    }

    /// Selects the document whose conversations are shown, or none.
    pub async fn select_document(&self, document: Option<DocumentId>) {
        tracing::info!(document = ?document.as_ref().map(DocumentId::as_str), "document selected");
        self.selection.write().await.document = document;
    }

    /// Switches the active agent.
    ///
    /// # Errors
    ///
    /// `AgentNotFound` if the agent store does not know the id.
    pub async fn select_agent(&self, agent: AgentId) -> Result<(), OrchestratorError> {
        if self.agents.get_agent(&agent).await.is_none() {
            return Err(OrchestratorError::AgentNotFound(agent));
        }
        tracing::info!(agent = %agent, "agent selected");
        self.selection.write().await.agent = agent;
        Ok(())
    }

    pub async fn selected_agent(&self) -> AgentId {
        self.selection.read().await.agent.clone()
    }

    /// Key of the active conversation; `None` until a document is selected.
    pub async fn active_key(&self) -> Option<ConversationKey> {
        let selection = self.selection.read().await;
        selection
            .document
            .clone()
            .map(|document| ConversationKey::new(document, selection.agent.clone()))
    }

    /// The active conversation, seeded on first access.
    pub async fn conversation(&self) -> Result<Conversation, OrchestratorError> {
        let key = self
            .active_key()
            .await
            .ok_or(OrchestratorError::NoActiveConversation)?;
        let agent = self.agent(&key.agent_id).await?;
        Ok(self.store.get_or_seed(&key, &agent).await)
    }

    /// Messages of the active conversation.
    pub async fn messages(&self) -> Result<Vec<ChatMessage>, OrchestratorError> {
        Ok(self.conversation().await?.messages().to_vec())
    }

    /// True while the active conversation waits for a reply. A host must
    /// not offer sending while this is true.
    pub async fn is_loading(&self) -> bool {
        match self.active_key().await {
            Some(key) => self
                .store
                .get(&key)
                .await
                .map(|c| c.is_loading())
                .unwrap_or(false),
            None => false,
        }
    }

    /// Sends a user message in the active conversation.
    ///
    /// The user message and a loading placeholder are committed together
    /// before the provider is called. The placeholder is then resolved in
    /// place: with the reply (and its proposals) on success, or with a
    /// failure text on error.
    ///
    /// # Errors
    ///
    /// - `NoActiveConversation` if no document is selected
    /// - `AgentNotFound` if the selected agent disappeared
    /// - `Document` if the document cannot be read
    /// - `Conversation` if a send is in flight or the provider failed
    pub async fn send_message(
        &self,
        text: impl Into<String>,
    ) -> Result<SendOutcome, OrchestratorError> {
        let text = text.into();
        let key = self
            .active_key()
            .await
            .ok_or(OrchestratorError::NoActiveConversation)?;
        let agent = self.agent(&key.agent_id).await?;
        self.store.get_or_seed(&key, &agent).await;

        let content = self.documents.get_content(&key.document_id).await?;
        let manager = self.manager_for(&key, agent.clone()).await;
        if manager.is_processing() {
            return Err(ConversationError::AlreadyProcessing.into());
        }

        let placeholder = ChatMessage::placeholder(&agent.name);
        let message_id = placeholder.id();
        self.store
            .try_update(&key, |conversation| {
                if conversation.is_loading() {
                    return Err(ConversationError::AlreadyProcessing);
                }
                conversation.push(ChatMessage::user(&text));
                conversation.push(placeholder);
                Ok(())
            })
            .await
            .unwrap_or(Ok(()))?;

        manager.update_document_content(content).await;
        let result = manager.send_message(text).await;

        match result {
            Ok(reply) => {
                let proposals = self
                    .store
                    .update(&key, |conversation| {
                        if let Some(message) = conversation.message_mut(message_id) {
                            message.finalize(reply);
                        }
                        conversation.extract_pending_proposals()
                    })
                    .await
                    .unwrap_or(0);
                tracing::info!(conversation = %key, proposals, "reply stored");
                Ok(SendOutcome {
                    message_id,
                    proposals,
                })
            }
            Err(err) => {
                let reason = err.to_string();
                self.store
                    .update(&key, |conversation| {
                        if let Some(message) = conversation.message_mut(message_id) {
                            message.fail(reason);
                        }
                    })
                    .await;
                tracing::error!(conversation = %key, error = %err, "send failed");
                Err(err.into())
            }
        }
    }

    /// Accepts or rejects a proposal in the active conversation.
    ///
    /// Acceptance first computes the new document text; if that fails the
    /// proposal stays pending and nothing is written. Otherwise the status
    /// change is committed and the document write follows as the next
    /// step of the same call.
    pub async fn review_proposal(
        &self,
        message_id: MessageId,
        proposal_id: &ProposalId,
        action: ReviewAction,
    ) -> ReviewOutcome {
        let Some(key) = self.active_key().await else {
            return ReviewOutcome::Skipped(ReviewSkip::NoActiveConversation);
        };

        let outcome = match action {
            ReviewAction::Reject => self.reject(&key, message_id, proposal_id).await,
            ReviewAction::Accept => self.accept(&key, message_id, proposal_id).await,
        };

        match &outcome {
            ReviewOutcome::Skipped(reason) => tracing::warn!(
                conversation = %key,
                proposal = %proposal_id,
                code = %reason.code(),
                reason = %reason,
                "proposal review skipped"
            ),
            _ => tracing::info!(
                conversation = %key,
                proposal = %proposal_id,
                action = ?action,
                "proposal reviewed"
            ),
        }
        outcome
    }

    async fn reject(
        &self,
        key: &ConversationKey,
        message_id: MessageId,
        proposal_id: &ProposalId,
    ) -> ReviewOutcome {
        let result = self
            .store
            .try_update(key, |conversation| {
                let proposal = find_proposal_mut(conversation, message_id, proposal_id)?;
                proposal
                    .reject()
                    .map_err(|_| ReviewSkip::AlreadyReviewed(proposal.status()))
            })
            .await
            .unwrap_or(Err(ReviewSkip::MessageNotFound(message_id)));

        match result {
            Ok(()) => ReviewOutcome::Rejected,
            Err(skip) => ReviewOutcome::Skipped(skip),
        }
    }

    async fn accept(
        &self,
        key: &ConversationKey,
        message_id: MessageId,
        proposal_id: &ProposalId,
    ) -> ReviewOutcome {
        let proposal = match self.pending_proposal(key, message_id, proposal_id).await {
            Ok(proposal) => proposal,
            Err(skip) => return ReviewOutcome::Skipped(skip),
        };
        if !proposal.can_apply() {
            return ReviewOutcome::Skipped(ApplyError::MissingLocation.into());
        }

        let document = match self.documents.get_content(&key.document_id).await {
            Ok(document) => document,
            Err(err) => return ReviewOutcome::Skipped(err.into()),
        };
        let updated = match apply_proposal(&document, &proposal) {
            Ok(updated) => updated,
            Err(err) => return ReviewOutcome::Skipped(err.into()),
        };

        let committed = self
            .store
            .try_update(key, |conversation| {
                let proposal = find_proposal_mut(conversation, message_id, proposal_id)?;
                proposal
                    .accept()
                    .map_err(|_| ReviewSkip::AlreadyReviewed(proposal.status()))
            })
            .await
            .unwrap_or(Err(ReviewSkip::MessageNotFound(message_id)));
        if let Err(skip) = committed {
            return ReviewOutcome::Skipped(skip);
        }

        if let Err(err) = self
            .documents
            .set_content(&key.document_id, updated.clone())
            .await
        {
            tracing::error!(
                document = %key.document_id,
                error = %err,
                "accepted proposal could not be written"
            );
            return ReviewOutcome::Skipped(err.into());
        }

        ReviewOutcome::Applied {
            document_id: key.document_id.clone(),
            content: updated,
        }
    }

    async fn pending_proposal(
        &self,
        key: &ConversationKey,
        message_id: MessageId,
        proposal_id: &ProposalId,
    ) -> Result<ChangeProposal, ReviewSkip> {
        let conversation = self
            .store
            .get(key)
            .await
            .ok_or(ReviewSkip::MessageNotFound(message_id))?;
        let proposal = conversation
            .message(message_id)
            .ok_or(ReviewSkip::MessageNotFound(message_id))?
            .proposal(proposal_id)
            .ok_or_else(|| ReviewSkip::ProposalNotFound(proposal_id.clone()))?;
        if !proposal.status().is_pending() {
            return Err(ReviewSkip::AlreadyReviewed(proposal.status()));
        }
        Ok(proposal.clone())
    }

    async fn agent(&self, id: &AgentId) -> Result<Agent, OrchestratorError> {
        self.agents
            .get_agent(id)
            .await
            .ok_or_else(|| OrchestratorError::AgentNotFound(id.clone()))
    }

    async fn manager_for(&self, key: &ConversationKey, agent: Agent) -> Arc<ConversationManager> {
        let mut managers = self.managers.lock().await;
        managers
            .entry(key.clone())
            .or_insert_with(|| {
                tracing::debug!(conversation = %key, "context manager created");
                Arc::new(ConversationManager::new(
                    agent,
                    self.provider.clone(),
                    self.settings.clone(),
                ))
            })
            .clone()
    }
}

fn find_proposal_mut<'a>(
    conversation: &'a mut Conversation,
    message_id: MessageId,
    proposal_id: &ProposalId,
) -> Result<&'a mut ChangeProposal, ReviewSkip> {
    conversation
        .message_mut(message_id)
        .ok_or(ReviewSkip::MessageNotFound(message_id))?
        .proposal_mut(proposal_id)
        .ok_or_else(|| ReviewSkip::ProposalNotFound(proposal_id.clone()))
}

impl std::fmt::Debug for ConversationOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationOrchestrator")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
