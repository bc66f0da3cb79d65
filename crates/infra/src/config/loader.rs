//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the primary model is not set there, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! Whatever the source, the loaded configuration is validated before it is
//! returned: the primary model must be named and the retry settings must
//! form a valid policy.
//!
//! ## Environment Variables
//! - `NAMEWIZARD_PRIMARY_MODEL`: Primary model identifier (required)
//! - `NAMEWIZARD_FALLBACK_MODELS`: Comma-separated fallback models, in order
//! - `NAMEWIZARD_MAX_RETRIES`: Retries per model after the first attempt
//! - `NAMEWIZARD_INITIAL_DELAY_MS`: Delay before the first retry
//! - `NAMEWIZARD_BACKOFF_FACTOR`: Multiplier applied per retry
//! - `NAMEWIZARD_MAX_DELAY_MS`: Upper bound on a single backoff delay
//! - `NAMEWIZARD_LOG_LEVEL`: Default log filter directive
//! - `NAMEWIZARD_LOG_JSON`: Emit JSON log lines (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./namewizard.toml` or `./namewizard.json` (current working directory)
//! 2. `./config.toml` or `./config.json` (current working directory)
//! 3. The same names in the parent and grandparent directories
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use namewizard_core::retry_policy_from_settings;
use namewizard_domain::constants::{
    ENV_BACKOFF_FACTOR, ENV_FALLBACK_MODELS, ENV_INITIAL_DELAY_MS, ENV_LOG_JSON, ENV_LOG_LEVEL,
    ENV_MAX_DELAY_MS, ENV_MAX_RETRIES, ENV_PRIMARY_MODEL,
};
use namewizard_domain::{Config, ModelSettings, NameWizardError, Result};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["namewizard.toml", "namewizard.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variables are missing or invalid, falls back to loading from a config
/// file.
///
/// # Errors
/// Returns `NameWizardError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing or values are out of range
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `NAMEWIZARD_PRIMARY_MODEL` is required; every other setting keeps
/// its default when unset.
///
/// # Errors
/// Returns `NameWizardError::Config` if the primary model is missing or a
/// variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let primary_model = env_var(ENV_PRIMARY_MODEL)?;
    let fallback_models = std::env::var(ENV_FALLBACK_MODELS)
        .map(|raw| split_models(&raw))
        .unwrap_or_default();

    let mut config = Config::for_models(ModelSettings::new(primary_model, fallback_models));

    if let Some(max_retries) = env_parse(ENV_MAX_RETRIES)? {
        config.retry.max_retries = max_retries;
    }
    if let Some(initial_delay_ms) = env_parse(ENV_INITIAL_DELAY_MS)? {
        config.retry.initial_delay_ms = initial_delay_ms;
    }
    if let Some(backoff_factor) = env_parse(ENV_BACKOFF_FACTOR)? {
        config.retry.backoff_factor = backoff_factor;
    }
    if let Some(max_delay_ms) = env_parse(ENV_MAX_DELAY_MS)? {
        config.retry.max_delay_ms = max_delay_ms;
    }
    if let Ok(level) = std::env::var(ENV_LOG_LEVEL) {
        config.logging.level = level;
    }
    config.logging.json = env_bool(ENV_LOG_JSON, config.logging.json);

    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `NameWizardError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing or values are out of range
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(NameWizardError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            NameWizardError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| NameWizardError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    validate(&config)?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| NameWizardError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| NameWizardError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(NameWizardError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Check invariants serde cannot express
fn validate(config: &Config) -> Result<()> {
    if config.models.primary_model.trim().is_empty() {
        return Err(NameWizardError::Config("primary_model must not be empty".to_string()));
    }

    retry_policy_from_settings(&config.retry)
        .map_err(|e| NameWizardError::Config(format!("Invalid retry settings: {e}")))?;
    Ok(())
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, its parent and grandparent, then
/// the same three levels relative to the executable.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf)) {
        roots.push(exe_dir);
    }

    roots
        .iter()
        .flat_map(|root| [root.clone(), root.join(".."), root.join("../..")])
        .flat_map(|dir| CONFIG_FILE_NAMES.map(|name| dir.join(name)))
        .find(|path| path.exists())
}

/// Split a comma-separated model list, dropping blanks
fn split_models(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|model| !model.is_empty()).map(String::from).collect()
}

/// Get required environment variable
///
/// # Errors
/// Returns `NameWizardError::Config` if the variable is not set or blank.
fn env_var(key: &str) -> Result<String> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(NameWizardError::Config(format!("Missing required environment variable: {key}"))),
    }
}

/// Parse an optional environment variable
///
/// # Errors
/// Returns `NameWizardError::Config` if the variable is set but malformed.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| NameWizardError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
