//! Errors produced by a single HTTP call

use namewizard_common::resilience::FailureStatus;
use namewizard_domain::NameWizardError;
use thiserror::Error;

/// Failure of one HTTP attempt
#[derive(Debug, Error)]
pub enum HttpCallError {
    /// Connection failure, reset or timeout; no response was received
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request could not be built or replayed
    #[error("invalid request: {0}")]
    Request(String),

    /// The response body was not what the caller expected
    #[error("invalid response body: {0}")]
    Decode(String),

    /// Retries were cancelled before any attempt ran
    #[error("request cancelled")]
    Cancelled,
}

impl HttpCallError {
    /// Status code of the response, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for HttpCallError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::Request(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status { status: status.as_u16(), body: err.to_string() }
        } else {
            Self::Network(err)
        }
    }
}

impl FailureStatus for HttpCallError {
    fn status_code(&self) -> Option<u16> {
        self.status()
    }

    fn is_network_error(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<HttpCallError> for NameWizardError {
    fn from(err: HttpCallError) -> Self {
        match err {
            HttpCallError::Status { status: 400 | 422, body } => Self::InvalidInput(body),
            HttpCallError::Network(_) | HttpCallError::Status { .. } => Self::Network(err.to_string()),
            HttpCallError::Cancelled => Self::Cancelled(err.to_string()),
            HttpCallError::Request(_) | HttpCallError::Decode(_) => Self::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_errors_expose_code() {
        let err = HttpCallError::Status { status: 503, body: "overloaded".into() };
        assert_eq!(err.status_code(), Some(503));
        assert!(!err.is_network_error());
        assert_eq!(err.to_string(), "HTTP 503: overloaded");
    }

    #[test]
    fn test_request_errors_are_not_network_errors() {
        let err = HttpCallError::Request("body cannot be cloned".into());
        assert_eq!(err.status_code(), None);
        assert!(!err.is_network_error());
    }

    #[test]
    fn test_domain_conversion() {
        let invalid: NameWizardError =
            HttpCallError::Status { status: 422, body: "file is empty".into() }.into();
        assert_eq!(invalid, NameWizardError::InvalidInput("file is empty".into()));

        let unavailable: NameWizardError =
            HttpCallError::Status { status: 503, body: "overloaded".into() }.into();
        assert!(matches!(unavailable, NameWizardError::Network(ref msg) if msg.contains("503")));

        let cancelled: NameWizardError = HttpCallError::Cancelled.into();
        assert!(matches!(cancelled, NameWizardError::Cancelled(_)));
    }
}
