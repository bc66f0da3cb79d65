//! Results of a fallback run

use std::fmt::{self, Display};

use namewizard_domain::CandidateId;
use serde::Serialize;

/// Why one candidate was given up on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateFailure {
    pub candidate: CandidateId,
    pub message: String,
}

/// Final result of [`FallbackSequencer::run_with_fallback`](super::FallbackSequencer::run_with_fallback)
#[derive(Debug)]
pub enum FallbackOutcome<T, E> {
    /// A candidate succeeded
    Success {
        backend: CandidateId,
        result: T,
        /// Candidates that failed before the winner
        attempted: Vec<CandidateId>,
        /// Whether the winner differs from the primary candidate
        used_alternative: bool,
    },
    /// No candidate succeeded
    Failure {
        /// Error of the last candidate tried
        error: E,
        attempted: Vec<CandidateId>,
        failures: Vec<CandidateFailure>,
        /// The classifier stopped the chain before every candidate was tried
        aborted: bool,
    },
}

impl<T, E> FallbackOutcome<T, E> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Winning backend, if any
    pub fn backend(&self) -> Option<&CandidateId> {
        match self {
            Self::Success { backend, .. } => Some(backend),
            Self::Failure { .. } => None,
        }
    }

    /// Candidates that failed, in the order they were tried
    pub fn attempted(&self) -> &[CandidateId] {
        match self {
            Self::Success { attempted, .. } | Self::Failure { attempted, .. } => attempted,
        }
    }

    pub fn used_alternative(&self) -> bool {
        matches!(self, Self::Success { used_alternative: true, .. })
    }

    /// Discard bookkeeping and keep the result or the last error
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Success { result, .. } => Ok(result),
            Self::Failure { error, .. } => Err(error),
        }
    }

    /// User-facing summary when the chain failed
    pub fn failure_report(&self) -> Option<FailureReport>
    where
        E: Display,
    {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error, attempted, failures, aborted } => Some(FailureReport {
                attempted: attempted.clone(),
                failures: failures.clone(),
                last_error: error.to_string(),
                aborted: *aborted,
            }),
        }
    }
}

/// Aggregated failure detail for a chain that produced no result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureReport {
    pub attempted: Vec<CandidateId>,
    pub failures: Vec<CandidateFailure>,
    pub last_error: String,
    pub aborted: bool,
}

impl Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.attempted.len();
        let noun = if count == 1 { "model" } else { "models" };
        if self.aborted {
            write!(f, "stopped after {count} {noun}; last error: {}", self.last_error)
        } else {
            write!(f, "all {count} {noun} failed; last error: {}", self.last_error)
        }
    }
}
