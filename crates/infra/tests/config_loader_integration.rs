//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files and
//! turning it into a working fallback sequencer.

use std::io::Write;
use std::path::PathBuf;

use namewizard_core::fallback::FallbackSequencer;
use namewizard_core::retry_policy_from_settings;
use namewizard_domain::{CandidateId, NameWizardError};
use namewizard_infra::config;
use tempfile::NamedTempFile;

fn write_config(contents: &str, extension: &str) -> PathBuf {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    path
}

#[test]
fn test_load_config_from_json_file() {
    let path = write_config(
        r#"{
            "retry": {
                "max_retries": 4,
                "initial_delay_ms": 500,
                "backoff_factor": 3.0,
                "max_delay_ms": 10000,
                "retryable_status_codes": [429, 503],
                "jitter_ratio": 0.0
            },
            "models": {
                "primary_model": "gpt-4",
                "fallback_models": ["claude-3", "gemini-pro"]
            },
            "logging": {"level": "debug", "json": true}
        }"#,
        "json",
    );

    let result = config::load_from_file(Some(path.clone()));
    std::fs::remove_file(path).ok();
    let config = result.expect("Failed to load config from JSON file");

    let policy = retry_policy_from_settings(&config.retry).expect("valid retry policy");
    assert_eq!(policy.max_attempts(), 5);
    assert!(policy.is_retryable_status(429));
    assert!(!policy.is_retryable_status(500));

    let candidates = config.models.selection().candidates();
    assert_eq!(
        candidates,
        vec![CandidateId::from("gpt-4"), CandidateId::from("claude-3"), CandidateId::from("gemini-pro")]
    );
    assert!(config.logging.json);
}

#[test]
fn test_load_config_from_toml_file() {
    let path = write_config(
        r#"
[retry]
max_retries = 0

[models]
primary_model = "gpt-4"
"#,
        "toml",
    );

    let result = config::load_from_file(Some(path.clone()));
    std::fs::remove_file(path).ok();
    let config = result.expect("Failed to load config from TOML file");

    assert_eq!(config.retry.max_retries, 0);
    assert_eq!(config.models.selection().candidate_count(), 1);

    let sequencer = FallbackSequencer::builder()
        .retry_settings(&config.retry)
        .expect("valid retry settings")
        .build();
    assert_eq!(sequencer.retry_policy().map(|policy| policy.max_attempts()), Some(1));
}

#[test]
fn test_invalid_retry_settings_rejected() {
    let path = write_config(
        r#"{
            "retry": {"initial_delay_ms": 5000, "max_delay_ms": 1000},
            "models": {"primary_model": "gpt-4"}
        }"#,
        "json",
    );

    let result = config::load_from_file(Some(path.clone()));
    std::fs::remove_file(path).ok();

    match result {
        Err(NameWizardError::Config(message)) => assert!(message.contains("max_delay")),
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn test_missing_models_section_rejected() {
    let path = write_config("[retry]\nmax_retries = 2\n", "toml");

    let result = config::load_from_file(Some(path.clone()));
    std::fs::remove_file(path).ok();

    assert!(matches!(result, Err(NameWizardError::Config(ref msg)) if msg.contains("TOML")));
}
