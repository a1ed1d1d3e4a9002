//! Adapters - Implementations of port interfaces.
//!
//! - `ai` - AI provider implementations (mock)
//! - `storage` - In-memory document and agent stores

pub mod ai;
pub mod storage;

pub use ai::{MockAIProvider, MockError};
pub use storage::{AgentUpdate, InMemoryAgentStore, InMemoryDocumentStore};
