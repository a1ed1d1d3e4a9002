//! LLM request configuration

use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Model parameters and retry schedule for provider calls
#[derive(Debug, Deserialize)]
pub struct LlmConfig {
    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Retries after the first attempt for transient failures
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Fixed delay before each retry, in milliseconds
    #[serde(default = "default_retry_delays")]
    pub retry_delays_ms: Vec<u64>,

    /// Provider API key, consumed by transport adapters
    pub api_key: Option<SecretString>,
}

impl LlmConfig {
    /// Retry delays as durations
    pub fn retry_delays(&self) -> Vec<Duration> {
        self.retry_delays_ms
            .iter()
            .map(|ms| Duration::from_millis(*ms))
            .collect()
    }

    /// Check if an API key is configured
    pub fn has_api_key(&self) -> bool {
        use secrecy::ExposeSecret;
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Validate LLM configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature(self.temperature));
        }
        if self.max_tokens == 0 {
            return Err(ValidationError::InvalidMaxTokens);
        }
        if self.max_retries > 0 && self.retry_delays_ms.is_empty() {
            return Err(ValidationError::EmptyRetrySchedule);
        }
        if self.model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("LLM__MODEL"));
        }
        Ok(())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_retries: default_retries(),
            retry_delays_ms: default_retry_delays(),
            api_key: None,
        }
    }
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_retries() -> u32 {
    3
}

fn default_retry_delays() -> Vec<u64> {
    vec![1000, 2000, 4000]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_config_defaults() {
        let config = LlmConfig::default();
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 1000);
        assert_eq!(config.max_retries, 3);
        assert_eq!(
            config.retry_delays(),
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4)
            ]
        );
        assert!(!config.has_api_key());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_temperature_range() {
        let config = LlmConfig {
            temperature: 2.5,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidTemperature(2.5)));
    }

    #[test]
    fn test_validation_zero_max_tokens() {
        let config = LlmConfig {
            max_tokens: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidMaxTokens));
    }

    #[test]
    fn test_validation_retries_need_schedule() {
        let config = LlmConfig {
            retry_delays_ms: vec![],
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::EmptyRetrySchedule));

        let no_retries = LlmConfig {
            max_retries: 0,
            retry_delays_ms: vec![],
            ..Default::default()
        };
        assert!(no_retries.validate().is_ok());
    }

    #[test]
    fn test_api_key_is_redacted_in_debug() {
        let config = LlmConfig {
            api_key: Some(SecretString::new("sk-very-secret".to_string())),
            ..Default::default()
        };
        assert!(config.has_api_key());
        assert!(!format!("{:?}", config).contains("sk-very-secret"));
    }
}
