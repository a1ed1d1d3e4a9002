//! Storage Adapters
//!
//! In-memory implementations of the document and agent store ports.
//!
//! ## Available Adapters
//!
//! - **InMemoryDocumentStore** - Whole-document text keyed by id
//! - **InMemoryAgentStore** - Agent definitions plus global template variables
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{InMemoryAgentStore, InMemoryDocumentStore};
//!
//! let documents = InMemoryDocumentStore::with_samples();
//! let agents = InMemoryAgentStore::new();
//! ```

mod in_memory_agent_store;
mod in_memory_document_store;

pub use in_memory_agent_store::{AgentUpdate, InMemoryAgentStore};
pub use in_memory_document_store::{InMemoryDocumentStore, StoredDocument};
