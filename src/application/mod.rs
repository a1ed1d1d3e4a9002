//! Application layer - conversation management and orchestration.
//!
//! Coordinates the domain with the provider, agent and document ports.
//! The orchestrator is the entry point for hosts; the manager owns the
//! context window of a single conversation.

pub mod conversation_manager;
pub mod conversation_store;
pub mod orchestrator;
pub mod retry;

pub use conversation_manager::{
    ConversationError, ConversationManager, ManagerSettings, ManagerState,
};
pub use conversation_store::ConversationStore;
pub use orchestrator::{
    ConversationOrchestrator, OrchestratorError, ReviewAction, ReviewOutcome, ReviewSkip,
    SendOutcome,
};
pub use retry::RetryPolicy;
