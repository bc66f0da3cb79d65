//! Bundled failure classifiers
//!
//! A candidate that fails with a transient or backend-specific error should
//! hand over to the next candidate. A request that is itself malformed fails
//! the same way on every backend, so the chain stops instead.

use std::collections::BTreeSet;

use namewizard_common::resilience::FailureStatus;
use namewizard_domain::NameWizardError;

use super::ports::{FailureClassifier, FailureDisposition};

/// Client-error statuses that no other backend would answer differently
pub const DEFAULT_ABORT_STATUS_CODES: [u16; 2] = [400, 422];

/// Advances to the next candidate on every failure
#[derive(Debug, Clone, Copy, Default)]
pub struct AdvanceOnAnyFailure;

impl<E> FailureClassifier<E> for AdvanceOnAnyFailure {
    fn classify(&self, _error: &E) -> FailureDisposition {
        FailureDisposition::Advance
    }
}

/// Aborts the chain on invalid-input statuses, advances otherwise
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusAwareClassifier {
    abort_on: BTreeSet<u16>,
}

impl Default for StatusAwareClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_ABORT_STATUS_CODES)
    }
}

impl StatusAwareClassifier {
    pub fn new<I>(abort_on: I) -> Self
    where
        I: IntoIterator<Item = u16>,
    {
        Self { abort_on: abort_on.into_iter().collect() }
    }

    pub fn abort_status_codes(&self) -> &BTreeSet<u16> {
        &self.abort_on
    }
}

impl<E: FailureStatus> FailureClassifier<E> for StatusAwareClassifier {
    fn classify(&self, error: &E) -> FailureDisposition {
        match error.status_code() {
            Some(status) if self.abort_on.contains(&status) => FailureDisposition::Abort,
            _ => FailureDisposition::Advance,
        }
    }
}

/// Aborts on [`NameWizardError::InvalidInput`], advances otherwise
#[derive(Debug, Clone, Copy, Default)]
pub struct InvalidInputClassifier;

impl FailureClassifier<NameWizardError> for InvalidInputClassifier {
    fn classify(&self, error: &NameWizardError) -> FailureDisposition {
        if error.is_invalid_input() {
            FailureDisposition::Abort
        } else {
            FailureDisposition::Advance
        }
    }
}
