//! `tracing-subscriber` initialisation

use namewizard_domain::{LoggingSettings, NameWizardError, Result};
use tracing_subscriber::EnvFilter;

/// Install the global `fmt` subscriber
///
/// `RUST_LOG` takes precedence over `settings.level`. With `settings.json`
/// set, each event is written as one JSON line.
///
/// # Errors
/// Returns `NameWizardError::Config` if the level is not a valid filter
/// directive or a global subscriber is already installed.
pub fn init_logging(settings: &LoggingSettings) -> Result<()> {
    let filter = build_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(), &settings.level)?;

    let installed = if settings.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).with_target(true).try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).with_target(true).try_init()
    };

    installed.map_err(|e| {
        NameWizardError::Config(format!("Failed to install tracing subscriber: {e}"))
    })?;

    tracing::debug!(level = %settings.level, json = settings.json, "Logging initialised");
    Ok(())
}

/// Filter from the environment directive when present, otherwise `level`
fn build_filter(env_directive: Option<&str>, level: &str) -> Result<EnvFilter> {
    let directive = env_directive.filter(|d| !d.trim().is_empty()).unwrap_or(level);
    EnvFilter::try_new(directive).map_err(|e| {
        NameWizardError::Config(format!("Invalid log filter '{directive}': {e}"))
    })
}
