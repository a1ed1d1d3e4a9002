//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types
//! that form the vocabulary of the agent editor domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AgentId, DocumentId, MessageId, ProposalId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
