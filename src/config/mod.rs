//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `AGENT_EDITOR` prefix and nested values use double underscores as separators.
//! Every section has defaults, so an empty environment yields a usable config.
//!
//! # Example
//!
//! ```no_run
//! use agent_editor::config::{init_tracing, AppConfig};
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! init_tracing(&config.logging).expect("Failed to install tracing");
//! ```

mod conversation;
mod error;
mod llm;
mod logging;

pub use conversation::ConversationConfig;
pub use error::{ConfigError, ValidationError};
pub use llm::LlmConfig;
pub use logging::{init_tracing, LoggingConfig};

use serde::Deserialize;
use std::path::Path;

const ENV_PREFIX: &str = "AGENT_EDITOR";
const ENV_SEPARATOR: &str = "__";

/// Root application configuration
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Model parameters and retry schedule
    #[serde(default)]
    pub llm: LlmConfig,

    /// Context window and default agent
    #[serde(default)]
    pub conversation: ConversationConfig,

    /// Log level and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn environment() -> config::Environment {
    config::Environment::default()
        .prefix(ENV_PREFIX)
        .separator(ENV_SEPARATOR)
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `AGENT_EDITOR` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `AGENT_EDITOR__LLM__MODEL=gpt-4o` -> `llm.model = "gpt-4o"`
    /// - `AGENT_EDITOR__CONVERSATION__MAX_RECENT_MESSAGES=20`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load configuration from a TOML file, with environment variables
    /// taking precedence over file values
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing or malformed
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).format(config::FileFormat::Toml))
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.llm.validate()?;
        self.conversation.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
