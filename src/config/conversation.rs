//! Conversation configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::conversation::DEFAULT_MAX_RECENT_MESSAGES;

/// Context window and session defaults
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationConfig {
    /// Messages kept after the system instruction
    #[serde(default = "default_max_recent")]
    pub max_recent_messages: usize,

    /// Agent selected when a session starts
    #[serde(default = "default_agent")]
    pub default_agent: String,
}

impl ConversationConfig {
    /// Validate conversation configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_recent_messages == 0 {
            return Err(ValidationError::InvalidWindowSize);
        }
        if self.default_agent.trim().is_empty() {
            return Err(ValidationError::MissingRequired("CONVERSATION__DEFAULT_AGENT"));
        }
        Ok(())
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            max_recent_messages: default_max_recent(),
            default_agent: default_agent(),
        }
    }
}

fn default_max_recent() -> usize {
    DEFAULT_MAX_RECENT_MESSAGES
}

fn default_agent() -> String {
    "editor".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_config_defaults() {
        let config = ConversationConfig::default();
        assert_eq!(config.max_recent_messages, 10);
        assert_eq!(config.default_agent, "editor");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_zero_window() {
        let config = ConversationConfig {
            max_recent_messages: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidWindowSize));
    }
}
