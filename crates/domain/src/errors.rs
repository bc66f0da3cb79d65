//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-facing error type for NameWizard
///
/// Adapters convert their own errors into this type before handing them to
/// callers, so the message is safe to show verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum NameWizardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Operation cancelled: {0}")]
    Cancelled(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl NameWizardError {
    /// Whether a different backend might not share this failure
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Result type alias for NameWizard operations
pub type Result<T> = std::result::Result<T, NameWizardError>;
