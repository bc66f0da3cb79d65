//! Application constants
//!
//! Centralized location for domain-level defaults. Durations are expressed in
//! milliseconds to match the serialized configuration.

// Retry defaults
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 1_000;
pub const DEFAULT_BACKOFF_FACTOR: f64 = 2.0;
pub const DEFAULT_MAX_DELAY_MS: u64 = 30_000;
pub const DEFAULT_JITTER_RATIO: f64 = 0.1;
pub const DEFAULT_RETRYABLE_STATUS_CODES: [u16; 6] = [408, 429, 500, 502, 503, 504];

// Logging defaults
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Environment variable names
pub const ENV_PRIMARY_MODEL: &str = "NAMEWIZARD_PRIMARY_MODEL";
pub const ENV_FALLBACK_MODELS: &str = "NAMEWIZARD_FALLBACK_MODELS";
pub const ENV_MAX_RETRIES: &str = "NAMEWIZARD_MAX_RETRIES";
pub const ENV_INITIAL_DELAY_MS: &str = "NAMEWIZARD_INITIAL_DELAY_MS";
pub const ENV_BACKOFF_FACTOR: &str = "NAMEWIZARD_BACKOFF_FACTOR";
pub const ENV_MAX_DELAY_MS: &str = "NAMEWIZARD_MAX_DELAY_MS";
pub const ENV_LOG_LEVEL: &str = "NAMEWIZARD_LOG_LEVEL";
pub const ENV_LOG_JSON: &str = "NAMEWIZARD_LOG_JSON";

