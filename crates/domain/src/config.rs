//! Configuration structures
//!
//! Every section deserializes with defaults except the model selection,
//! which must at least name a primary model.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BACKOFF_FACTOR, DEFAULT_INITIAL_DELAY_MS, DEFAULT_JITTER_RATIO, DEFAULT_LOG_LEVEL,
    DEFAULT_MAX_DELAY_MS, DEFAULT_MAX_RETRIES, DEFAULT_RETRYABLE_STATUS_CODES,
};
use crate::types::{CandidateId, ModelSelection};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub retry: RetrySettings,
    pub models: ModelSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Config {
    /// Configuration with default retry and logging settings
    pub fn for_models(models: ModelSettings) -> Self {
        Self { retry: RetrySettings::default(), models, logging: LoggingSettings::default() }
    }
}

/// Retry policy in serializable form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub backoff_factor: f64,
    pub max_delay_ms: u64,
    pub retryable_status_codes: Vec<u16>,
    pub jitter_ratio: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay_ms: DEFAULT_INITIAL_DELAY_MS,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            retryable_status_codes: DEFAULT_RETRYABLE_STATUS_CODES.to_vec(),
            jitter_ratio: DEFAULT_JITTER_RATIO,
        }
    }
}

/// Primary model plus ordered fallbacks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSettings {
    pub primary_model: String,
    #[serde(default)]
    pub fallback_models: Vec<String>,
}

impl ModelSettings {
    pub fn new(primary_model: impl Into<String>, fallback_models: Vec<String>) -> Self {
        Self { primary_model: primary_model.into(), fallback_models }
    }

    /// Candidate order for a fallback chain
    pub fn selection(&self) -> ModelSelection {
        ModelSelection::new(
            CandidateId::from(self.primary_model.as_str()),
            self.fallback_models.iter().map(|model| CandidateId::from(model.as_str())).collect(),
        )
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.to_string(), json: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_json_applies_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"models": {"primary_model": "gpt-4"}}"#).unwrap();

        assert_eq!(config.retry, RetrySettings::default());
        assert_eq!(config.logging, LoggingSettings::default());
        assert_eq!(config.models.primary_model, "gpt-4");
        assert!(config.models.fallback_models.is_empty());
    }

    #[test]
    fn test_config_toml_overrides() {
        let config: Config = toml::from_str(
            r#"
            [retry]
            max_retries = 5
            initial_delay_ms = 250

            [models]
            primary_model = "gpt-4"
            fallback_models = ["claude-3", "gemini-pro"]

            [logging]
            level = "debug"
            json = true
            "#,
        )
        .unwrap();

        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.initial_delay_ms, 250);
        assert_eq!(config.retry.max_delay_ms, DEFAULT_MAX_DELAY_MS);
        assert_eq!(config.models.fallback_models, vec!["claude-3", "gemini-pro"]);
        assert!(config.logging.json);
    }

    #[test]
    fn test_missing_models_is_rejected() {
        let result: std::result::Result<Config, _> = serde_json::from_str(r#"{"retry": {}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_model_settings_selection_order() {
        let settings = ModelSettings::new("a", vec!["b".into(), "c".into()]);
        let names: Vec<String> =
            settings.selection().candidates().iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
