//! In-Memory Agent Store Adapter
//!
//! Holds agent definitions and the global template variables. Agents are
//! stored with their `{{variable}}` placeholders intact and rendered on
//! every lookup, so changing a variable affects all agents.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::agent::{
    default_agents, default_global_variables, render_template, Agent, AgentCapabilities,
};
use crate::domain::foundation::AgentId;
use crate::ports::AgentStore;

/// Partial update of an agent; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct AgentUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub system_instruction: Option<String>,
    pub intro_message: Option<String>,
    pub capabilities: Option<AgentCapabilities>,
}

#[derive(Debug)]
struct Inner {
    agents: Vec<Agent>,
    variables: HashMap<String, String>,
}

/// In-memory storage for agents and global variables
#[derive(Debug, Clone)]
pub struct InMemoryAgentStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryAgentStore {
    /// Create a store holding the default agents and variables
    pub fn new() -> Self {
        Self::with_agents(default_agents())
    }

    /// Create a store holding the given agents and the default variables
    pub fn with_agents(agents: Vec<Agent>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                agents,
                variables: default_global_variables(),
            })),
        }
    }

    /// Add a user-defined agent. Any id on the input is replaced by a
    /// freshly generated one, which is returned.
    pub async fn add_agent(&self, mut agent: Agent) -> AgentId {
        agent.id = AgentId::generate();
        let id = agent.id.clone();
        self.inner.write().await.agents.push(agent);
        tracing::debug!(agent_id = %id, "agent added");
        id
    }

    /// Apply a partial update. Returns false if the agent does not exist.
    pub async fn update_agent(&self, id: &AgentId, update: AgentUpdate) -> bool {
        let mut inner = self.inner.write().await;
        let Some(agent) = inner.agents.iter_mut().find(|a| &a.id == id) else {
            return false;
        };
        if let Some(name) = update.name {
            agent.name = name;
        }
        if let Some(description) = update.description {
            agent.description = description;
        }
        if let Some(instruction) = update.system_instruction {
            agent.system_instruction = instruction;
        }
        if let Some(intro) = update.intro_message {
            agent.intro_message = intro;
        }
        if let Some(capabilities) = update.capabilities {
            agent.capabilities = capabilities;
        }
        true
    }

    /// Remove an agent. Returns false if it did not exist.
    pub async fn delete_agent(&self, id: &AgentId) -> bool {
        let mut inner = self.inner.write().await;
        let before = inner.agents.len();
        inner.agents.retain(|a| &a.id != id);
        inner.agents.len() != before
    }

    /// Replace all agents with the defaults. Variables are kept.
    pub async fn restore_default_agents(&self) {
        self.inner.write().await.agents = default_agents();
        tracing::info!("default agents restored");
    }

    /// Add or overwrite a global variable
    pub async fn set_global_variable(&self, key: impl Into<String>, value: impl Into<String>) {
        self.inner
            .write()
            .await
            .variables
            .insert(key.into(), value.into());
    }

    /// Remove a global variable. Returns false if it did not exist.
    pub async fn delete_global_variable(&self, key: &str) -> bool {
        self.inner.write().await.variables.remove(key).is_some()
    }

    /// Snapshot of the global variables
    pub async fn global_variables(&self) -> HashMap<String, String> {
        self.inner.read().await.variables.clone()
    }

    /// The agent as stored, placeholders not rendered
    pub async fn raw_agent(&self, id: &AgentId) -> Option<Agent> {
        self.inner
            .read()
            .await
            .agents
            .iter()
            .find(|a| &a.id == id)
            .cloned()
    }
}

impl Default for InMemoryAgentStore {
    fn default() -> Self {
        Self::new()
    }
}

fn render(agent: &Agent, variables: &HashMap<String, String>) -> Agent {
    let mut rendered = agent.clone();
    rendered.system_instruction = render_template(&agent.system_instruction, variables);
    rendered.intro_message = render_template(&agent.intro_message, variables);
    rendered
}

#[async_trait]
impl AgentStore for InMemoryAgentStore {
    async fn get_agent(&self, id: &AgentId) -> Option<Agent> {
        let inner = self.inner.read().await;
        inner
            .agents
            .iter()
            .find(|a| &a.id == id)
            .map(|agent| render(agent, &inner.variables))
    }

    async fn list_agents(&self) -> Vec<Agent> {
        let inner = self.inner.read().await;
        inner
            .agents
            .iter()
            .map(|agent| render(agent, &inner.variables))
            .collect()
    }
}
