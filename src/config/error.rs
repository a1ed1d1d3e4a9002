//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("Logging initialization failed: {0}")]
    LoggingInit(String),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Temperature {0} is outside 0.0..=2.0")]
    InvalidTemperature(f32),

    #[error("max_tokens must be greater than zero")]
    InvalidMaxTokens,

    #[error("Retries are enabled but the retry delay schedule is empty")]
    EmptyRetrySchedule,

    #[error("max_recent_messages must be at least 1")]
    InvalidWindowSize,

    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Unknown log level: {0}")]
    InvalidLogLevel(String),
}
