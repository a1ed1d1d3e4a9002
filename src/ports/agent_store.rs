//! Agent Store Port - Read-only access to agent configuration.

use async_trait::async_trait;

use crate::domain::agent::Agent;
use crate::domain::foundation::AgentId;

/// Port for looking up agent definitions.
///
/// Returned agents have their template variables already rendered. The
/// core treats them as immutable values.
#[async_trait]
pub trait AgentStore: Send + Sync {
    /// Looks up an agent, `None` if it does not exist.
    async fn get_agent(&self, id: &AgentId) -> Option<Agent>;

    /// All agents in display order.
    async fn list_agents(&self) -> Vec<Agent>;
}
