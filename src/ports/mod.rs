//! Ports - Interfaces for external collaborators.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the editor core and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - LLM completions (the only network boundary)
//! - `DocumentStore` - Whole-document text by id
//! - `AgentStore` - Agent definitions, read-only

mod agent_store;
mod ai_provider;
mod document_store;

pub use agent_store::AgentStore;
pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, RETRYABLE_STATUSES,
};
pub use document_store::{DocumentStore, DocumentStoreError};
