//! Retry policy configuration and retry predicates
//!
//! A [`RetryPolicy`] is immutable once built: every constructor path goes
//! through [`RetryPolicy::validate`], so an executor never sees invalid
//! values. Whether a given failure is worth retrying is decided by a
//! [`RetryPredicate`], an explicit value handed to the executor alongside the
//! policy.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::error::{CommonError, CommonResult, ErrorClassification};
use crate::resilience::constants::{
    DEFAULT_BACKOFF_FACTOR, DEFAULT_INITIAL_DELAY, DEFAULT_JITTER_RATIO, DEFAULT_MAX_DELAY,
    DEFAULT_MAX_RETRIES, DEFAULT_RETRYABLE_STATUS_CODES,
};

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RetryPolicy {
    max_retries: u32,
    initial_delay: Duration,
    backoff_factor: f64,
    max_delay: Duration,
    retryable_status_codes: BTreeSet<u16>,
    jitter_ratio: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: DEFAULT_INITIAL_DELAY,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            max_delay: DEFAULT_MAX_DELAY,
            retryable_status_codes: DEFAULT_RETRYABLE_STATUS_CODES.into_iter().collect(),
            jitter_ratio: DEFAULT_JITTER_RATIO,
        }
    }
}

impl RetryPolicy {
    /// Create a policy builder seeded with the defaults
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::new()
    }

    /// Policy that performs exactly one attempt
    pub fn no_retry() -> Self {
        Self { max_retries: 0, ..Self::default() }
    }

    /// Number of retries after the initial attempt
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Total number of attempts the policy allows
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before the first retry
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Multiplier applied per retry
    pub fn backoff_factor(&self) -> f64 {
        self.backoff_factor
    }

    /// Upper bound on a single computed delay
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Status codes considered transient
    pub fn retryable_status_codes(&self) -> &BTreeSet<u16> {
        &self.retryable_status_codes
    }

    /// Fraction of the base delay used as the upper bound for jitter
    pub fn jitter_ratio(&self) -> f64 {
        self.jitter_ratio
    }

    /// Whether `status` is in the retryable set
    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_status_codes.contains(&status)
    }

    /// Validate the policy invariants
    pub fn validate(&self) -> CommonResult<()> {
        if self.initial_delay.is_zero() {
            return Err(CommonError::config_field("initial_delay", "must be greater than zero"));
        }

        if !self.backoff_factor.is_finite() || self.backoff_factor < 1.0 {
            return Err(CommonError::config_field(
                "backoff_factor",
                format!("must be a finite value >= 1, got {}", self.backoff_factor),
            ));
        }

        if self.max_delay < self.initial_delay {
            return Err(CommonError::config_field(
                "max_delay",
                format!(
                    "max_delay ({:?}) cannot be less than initial_delay ({:?})",
                    self.max_delay, self.initial_delay
                ),
            ));
        }

        if !(0.0..=1.0).contains(&self.jitter_ratio) {
            return Err(CommonError::config_field(
                "jitter_ratio",
                format!("must be within [0, 1], got {}", self.jitter_ratio),
            ));
        }

        Ok(())
    }
}

/// Builder for [`RetryPolicy`] with fluent API
#[derive(Debug, Clone)]
pub struct RetryPolicyBuilder {
    policy: RetryPolicy,
}

impl Default for RetryPolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryPolicyBuilder {
    pub fn new() -> Self {
        Self { policy: RetryPolicy::default() }
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.policy.max_retries = retries;
        self
    }

    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.policy.initial_delay = delay;
        self
    }

    pub fn backoff_factor(mut self, factor: f64) -> Self {
        self.policy.backoff_factor = factor;
        self
    }

    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.policy.max_delay = delay;
        self
    }

    /// Replace the retryable status code set
    pub fn retryable_status_codes<I>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = u16>,
    {
        self.policy.retryable_status_codes = codes.into_iter().collect();
        self
    }

    pub fn jitter_ratio(mut self, ratio: f64) -> Self {
        self.policy.jitter_ratio = ratio;
        self
    }

    /// Disable jitter so delays are exactly the computed backoff
    pub fn no_jitter(self) -> Self {
        self.jitter_ratio(0.0)
    }

    pub fn build(self) -> CommonResult<RetryPolicy> {
        self.policy.validate()?;
        Ok(self.policy)
    }
}

/// Decides whether a failure should be retried
///
/// `attempt` is the 0-based index of the attempt that just failed.
pub trait RetryPredicate<E> {
    fn should_retry(&self, error: &E, attempt: u32) -> bool;
}

/// Errors that can report a transport-level status
pub trait FailureStatus {
    /// Status code attached to the failure, if the remote answered
    fn status_code(&self) -> Option<u16>;

    /// Whether the failure happened before any response was received
    fn is_network_error(&self) -> bool {
        self.status_code().is_none()
    }
}

impl FailureStatus for CommonError {
    fn status_code(&self) -> Option<u16> {
        match self {
            Self::RateLimitExceeded { .. } => Some(429),
            _ => None,
        }
    }

    fn is_network_error(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Backend { is_retryable, .. } => *is_retryable,
            _ => false,
        }
    }
}

/// Default predicate: network errors, or a status in the retryable set
///
/// The status set is copied from the policy instance in effect, so a policy
/// with custom codes yields a predicate honoring them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientFailure {
    status_codes: BTreeSet<u16>,
}

impl TransientFailure {
    pub fn from_policy(policy: &RetryPolicy) -> Self {
        Self { status_codes: policy.retryable_status_codes().clone() }
    }

    pub fn with_status_codes<I>(codes: I) -> Self
    where
        I: IntoIterator<Item = u16>,
    {
        Self { status_codes: codes.into_iter().collect() }
    }

    pub fn status_codes(&self) -> &BTreeSet<u16> {
        &self.status_codes
    }
}

impl<E: FailureStatus> RetryPredicate<E> for TransientFailure {
    fn should_retry(&self, error: &E, _attempt: u32) -> bool {
        match error.status_code() {
            Some(status) => self.status_codes.contains(&status),
            None => error.is_network_error(),
        }
    }
}

/// Predicate built from a closure `(error, attempt) -> bool`
#[derive(Debug, Clone)]
pub struct RetryIf<F> {
    predicate: F,
}

impl<F> RetryIf<F> {
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<F, E> RetryPredicate<E> for RetryIf<F>
where
    F: Fn(&E, u32) -> bool,
{
    fn should_retry(&self, error: &E, attempt: u32) -> bool {
        (self.predicate)(error, attempt)
    }
}

/// Retries any error that classifies itself as retryable
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifiedFailure;

impl<E: ErrorClassification> RetryPredicate<E> for ClassifiedFailure {
    fn should_retry(&self, error: &E, _attempt: u32) -> bool {
        error.is_retryable()
    }
}

/// Always retry policy - retries on any error
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysRetry;

impl<E> RetryPredicate<E> for AlwaysRetry {
    fn should_retry(&self, _error: &E, _attempt: u32) -> bool {
        true
    }
}

/// Never retry policy - never retries
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverRetry;

impl<E> RetryPredicate<E> for NeverRetry {
    fn should_retry(&self, _error: &E, _attempt: u32) -> bool {
        false
    }
}
