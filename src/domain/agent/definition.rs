//! Agent definition consumed read-only by conversations.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::AgentId;

/// Optional tool capabilities an agent advertises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AgentCapabilities {
    pub web_search: bool,
    pub code_execution: bool,
    pub file_access: bool,
}

/// A configured LLM persona.
///
/// Conversation managers treat an agent as an immutable value for their
/// whole lifetime; edits in the agent store only affect managers created
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub description: String,
    pub system_instruction: String,
    pub intro_message: String,
    #[serde(default)]
    pub capabilities: AgentCapabilities,
}

impl Agent {
    /// Creates an agent with no capabilities and an empty description.
    pub fn new(
        id: AgentId,
        name: impl Into<String>,
        system_instruction: impl Into<String>,
        intro_message: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            system_instruction: system_instruction.into(),
            intro_message: intro_message.into(),
            capabilities: AgentCapabilities::default(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the capability flags.
    pub fn with_capabilities(mut self, capabilities: AgentCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_optional_fields() {
        let agent = Agent::new(AgentId::new("editor").unwrap(), "Editor", "Be terse.", "Hi!")
            .with_description("Helps with prose")
            .with_capabilities(AgentCapabilities {
                file_access: true,
                ..Default::default()
            });

        assert_eq!(agent.name, "Editor");
        assert_eq!(agent.description, "Helps with prose");
        assert!(agent.capabilities.file_access);
        assert!(!agent.capabilities.web_search);
    }

    #[test]
    fn capabilities_default_when_missing_from_json() {
        let json = r#"{
            "id": "custom",
            "name": "Custom",
            "description": "",
            "system_instruction": "x",
            "intro_message": "y"
        }"#;
        let agent: Agent = serde_json::from_str(json).unwrap();
        assert_eq!(agent.capabilities, AgentCapabilities::default());
    }
}
