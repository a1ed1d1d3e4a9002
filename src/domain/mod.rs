//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `proposal` - Change-proposal markup, parsing, review and application
//! - `agent` - Agent definitions, defaults and template variables
//! - `conversation` - Chat messages, conversations and the context window

pub mod agent;
pub mod conversation;
pub mod foundation;
pub mod proposal;
