//! Resilience patterns for transient failures
//!
//! - [`RetryPolicy`]: immutable, validated retry configuration
//! - [`RetryPredicate`]: decides whether a failure is worth retrying
//! - [`BackoffSchedule`]: exponential delays with bounded jitter
//! - [`RetryExecutor`]: runs an async operation under a policy
//!
//! The executor is generic over the operation's error type. Errors that can
//! report a transport status implement [`FailureStatus`] and get the default
//! [`TransientFailure`] predicate; anything else supplies its own predicate.
//!
//! ```rust,ignore
//! let policy = RetryPolicy::builder().max_retries(3).build()?;
//! let body = with_retry(|| client.fetch(), &policy).await?;
//! ```

pub mod backoff;
pub mod constants;
pub mod policy;
pub mod retry;

pub use backoff::BackoffSchedule;
pub use policy::{
    AlwaysRetry, ClassifiedFailure, FailureStatus, NeverRetry, RetryIf, RetryPolicy,
    RetryPolicyBuilder, RetryPredicate, TransientFailure,
};
pub use retry::{
    with_retry, with_retry_if, AttemptRecord, NoopObserver, RetryError, RetryExecutor,
    RetryObserver, RetryReport, RetryResult,
};
