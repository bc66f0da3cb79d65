//! Errors raised by the fallback sequencer
//!
//! Chain exhaustion is not an error: it is reported as
//! [`FallbackOutcome::Failure`](super::FallbackOutcome::Failure). These
//! variants cover configuration problems and cancellation, which happen
//! outside normal execution.

use namewizard_common::error::{CommonError, ErrorClassification, ErrorSeverity};
use namewizard_common::impl_error_classification;
use namewizard_domain::{CandidateId, ChainStatus, NameWizardError};
use thiserror::Error;

/// Illegal state-machine transition on a [`FallbackChain`](super::FallbackChain)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("chain already finished with status {0}")]
    Terminal(ChainStatus),

    #[error("candidate {0} is still in progress")]
    CandidateInProgress(CandidateId),

    #[error("no candidate is in progress")]
    NoCandidateInProgress,

    #[error("every candidate has already been attempted")]
    CandidatesExhausted,

    #[error("chain has not started")]
    NotStarted,
}

/// Errors that can occur before or outside chain execution
#[derive(Debug, Error)]
pub enum FallbackError {
    /// No candidates were supplied
    #[error("no candidate models configured")]
    EmptyCandidates,

    /// Retry settings could not be turned into a valid policy
    #[error("invalid retry policy: {0}")]
    InvalidPolicy(#[source] CommonError),

    /// The run was cancelled; `attempted` lists candidates that had failed
    #[error("fallback cancelled after {} failed candidates", attempted.len())]
    Cancelled { attempted: Vec<CandidateId>, last_error: Option<String> },

    /// The sequencer drove the chain through an illegal transition
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl From<CommonError> for FallbackError {
    fn from(err: CommonError) -> Self {
        Self::InvalidPolicy(err)
    }
}

impl_error_classification!(FallbackError, InvalidPolicy,
    Self::EmptyCandidates => {
        retryable: false,
        severity: ErrorSeverity::Error,
        critical: false,
    },
    Self::Cancelled { .. } => {
        retryable: false,
        severity: ErrorSeverity::Info,
        critical: false,
    },
    Self::Transition(_) => {
        retryable: false,
        severity: ErrorSeverity::Critical,
        critical: true,
    }
);

impl From<FallbackError> for NameWizardError {
    fn from(err: FallbackError) -> Self {
        match err {
            FallbackError::EmptyCandidates | FallbackError::InvalidPolicy(_) => {
                Self::Config(err.to_string())
            }
            FallbackError::Cancelled { .. } => Self::Cancelled(err.to_string()),
            FallbackError::Transition(_) => Self::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_candidates_is_configuration_error() {
        let err = FallbackError::EmptyCandidates;
        assert!(!err.is_retryable());
        assert_eq!(err.severity(), ErrorSeverity::Error);
        assert_eq!(
            NameWizardError::from(err),
            NameWizardError::Config("no candidate models configured".into())
        );
    }

    #[test]
    fn test_invalid_policy_delegates_classification() {
        let err: FallbackError = CommonError::config_field("backoff_factor", "must be >= 1").into();
        assert!(matches!(err, FallbackError::InvalidPolicy(_)));
        assert!(!err.is_retryable());
        assert!(err.to_string().starts_with("invalid retry policy"));
    }

    #[test]
    fn test_transition_error_is_critical() {
        let err: FallbackError = TransitionError::NoCandidateInProgress.into();
        assert!(err.is_critical());
        assert!(matches!(NameWizardError::from(err), NameWizardError::Internal(_)));
    }

    #[test]
    fn test_cancelled_display() {
        let err = FallbackError::Cancelled { attempted: vec!["a".into()], last_error: None };
        assert_eq!(err.to_string(), "fallback cancelled after 1 failed candidates");
    }
}
