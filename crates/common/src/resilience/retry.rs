//! Retry executor with exponential backoff
//!
//! [`RetryExecutor`] wraps an asynchronous operation and re-invokes it on
//! failure. The budget check always runs before the predicate: once
//! `max_retries` retries have been spent the run stops with
//! [`RetryError::Exhausted`] and the predicate is never consulted. Otherwise a
//! predicate rejection stops the run with [`RetryError::NonRetryable`]. Either
//! way the caller receives the last concrete error.

use std::fmt::{self, Display};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::observability::{LogField, SharedLogger, TracingLogger};
use crate::resilience::backoff::BackoffSchedule;
use crate::resilience::policy::{FailureStatus, RetryPolicy, RetryPredicate, TransientFailure};

/// Errors produced by a retry run
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// The retry budget was spent; `source` is the error of the final attempt
    #[error("retry budget exhausted after {attempts} attempts: {source}")]
    Exhausted { attempts: u32, source: E },

    /// The predicate declined to retry `source`
    #[error("operation failed with non-retryable error after {attempts} attempts: {source}")]
    NonRetryable { attempts: u32, source: E },

    /// Cancellation was observed before an attempt or during a backoff delay
    #[error("retry cancelled after {attempts} attempts")]
    Cancelled { attempts: u32, last_error: Option<E> },
}

impl<E> RetryError<E> {
    /// Number of times the operation was invoked
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Exhausted { attempts, .. }
            | Self::NonRetryable { attempts, .. }
            | Self::Cancelled { attempts, .. } => *attempts,
        }
    }

    /// The last error returned by the operation, if it ran at all
    pub fn last_error(&self) -> Option<&E> {
        match self {
            Self::Exhausted { source, .. } | Self::NonRetryable { source, .. } => Some(source),
            Self::Cancelled { last_error, .. } => last_error.as_ref(),
        }
    }

    /// Consume the error and return the last operation error
    pub fn into_last_error(self) -> Option<E> {
        match self {
            Self::Exhausted { source, .. } | Self::NonRetryable { source, .. } => Some(source),
            Self::Cancelled { last_error, .. } => last_error,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }
}

/// Result type for retry operations
pub type RetryResult<T, E> = Result<T, RetryError<E>>;

/// One invocation of the wrapped operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    /// 0-based attempt counter
    pub attempt_index: u32,
    /// Rendered failure, `None` when the attempt succeeded
    pub error: Option<String>,
    /// Backoff applied after this attempt, present only if a retry followed
    pub delay_before_next_attempt: Option<Duration>,
}

impl AttemptRecord {
    fn succeeded(attempt_index: u32) -> Self {
        Self { attempt_index, error: None, delay_before_next_attempt: None }
    }

    fn failed(attempt_index: u32, error: String, delay: Option<Duration>) -> Self {
        Self { attempt_index, error: Some(error), delay_before_next_attempt: delay }
    }
}

/// Result of a retry run together with per-attempt detail
#[derive(Debug)]
pub struct RetryReport<T, E> {
    pub result: RetryResult<T, E>,
    pub attempts: Vec<AttemptRecord>,
    /// Sum of the backoff delays actually waited
    pub total_delay: Duration,
}

impl<T, E> RetryReport<T, E> {
    fn new(result: RetryResult<T, E>, attempts: Vec<AttemptRecord>, total_delay: Duration) -> Self {
        Self { result, attempts, total_delay }
    }

    /// Consume the report and return only the result.
    pub fn into_result(self) -> RetryResult<T, E> {
        self.result
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.len()
    }

    /// Number of retries that were scheduled
    pub fn retry_count(&self) -> usize {
        self.attempts.iter().filter(|record| record.delay_before_next_attempt.is_some()).count()
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Hooks invoked while a retry run progresses
///
/// Attempt numbers reported here are 1-based.
pub trait RetryObserver<E> {
    /// A retry is about to be scheduled after `delay`
    fn on_retry(&self, _error: &E, _attempt: u32, _delay: Duration) {}

    /// The budget ran out; `attempts` operations were invoked
    fn on_max_retries_exceeded(&self, _error: &E, _attempts: u32) {}
}

/// Observer that ignores every hook
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl<E> RetryObserver<E> for NoopObserver {}

/// The main retry executor
pub struct RetryExecutor<P = TransientFailure> {
    policy: RetryPolicy,
    predicate: P,
    schedule: BackoffSchedule,
    logger: SharedLogger,
    cancellation: Option<CancellationToken>,
    operation: String,
}

impl<P: fmt::Debug> fmt::Debug for RetryExecutor<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryExecutor")
            .field("policy", &self.policy)
            .field("predicate", &self.predicate)
            .field("operation", &self.operation)
            .field("cancellable", &self.cancellation.is_some())
            .finish_non_exhaustive()
    }
}

impl RetryExecutor<TransientFailure> {
    /// Create an executor using the default transient-failure predicate
    ///
    /// The predicate is derived from `policy`, so custom retryable status
    /// codes take effect.
    pub fn new(policy: RetryPolicy) -> Self {
        let predicate = TransientFailure::from_policy(&policy);
        Self::with_predicate(policy, predicate)
    }
}

impl<P> RetryExecutor<P> {
    /// Create an executor with an explicit retry predicate
    pub fn with_predicate(policy: RetryPolicy, predicate: P) -> Self {
        let schedule = BackoffSchedule::from_policy(&policy);
        Self {
            policy,
            predicate,
            schedule,
            logger: Arc::new(TracingLogger::new("resilience")),
            cancellation: None,
            operation: "operation".to_string(),
        }
    }

    /// Route log records to `logger`
    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Stop the run once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Name attached to log records
    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation = name.into();
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn predicate(&self) -> &P {
        &self.predicate
    }

    pub fn schedule(&self) -> &BackoffSchedule {
        &self.schedule
    }

    /// Execute an operation with retry logic
    pub async fn execute<F, Fut, T, E>(&self, operation: F) -> RetryResult<T, E>
    where
        P: RetryPredicate<E>,
        E: Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.execute_with_report(operation, &NoopObserver).await.into_result()
    }

    /// Execute an operation, reporting retries to `observer`
    pub async fn execute_observed<F, Fut, T, E, O>(
        &self,
        operation: F,
        observer: &O,
    ) -> RetryResult<T, E>
    where
        P: RetryPredicate<E>,
        E: Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        O: RetryObserver<E> + ?Sized,
    {
        self.execute_with_report(operation, observer).await.into_result()
    }

    /// Execute an operation and return the per-attempt report
    pub async fn execute_with_report<F, Fut, T, E, O>(
        &self,
        mut operation: F,
        observer: &O,
    ) -> RetryReport<T, E>
    where
        P: RetryPredicate<E>,
        E: Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        O: RetryObserver<E> + ?Sized,
    {
        let mut records = Vec::new();
        let mut total_delay = Duration::ZERO;
        let mut last_error: Option<E> = None;
        let mut attempt_index: u32 = 0;

        loop {
            if self.is_cancelled() {
                self.logger.warn(
                    "Retry cancelled before attempt",
                    &self.fields(&[("attempts", attempt_index.to_string())]),
                );
                let result = Err(RetryError::Cancelled { attempts: attempt_index, last_error });
                return RetryReport::new(result, records, total_delay);
            }

            let attempt_number = attempt_index.saturating_add(1);
            self.logger.debug(
                "Executing operation",
                &self.fields(&[
                    ("attempt", attempt_number.to_string()),
                    ("max_attempts", self.policy.max_attempts().to_string()),
                ]),
            );

            let error = match operation().await {
                Ok(value) => {
                    if attempt_index > 0 {
                        self.logger.info(
                            "Operation succeeded after retries",
                            &self.fields(&[("retries", attempt_index.to_string())]),
                        );
                    }
                    records.push(AttemptRecord::succeeded(attempt_index));
                    return RetryReport::new(Ok(value), records, total_delay);
                }
                Err(error) => error,
            };
            let message = error.to_string();

            if attempt_index >= self.policy.max_retries() {
                self.logger.warn(
                    "Retry budget exhausted",
                    &self.fields(&[
                        ("attempts", attempt_number.to_string()),
                        ("error", message.clone()),
                    ]),
                );
                observer.on_max_retries_exceeded(&error, attempt_number);
                records.push(AttemptRecord::failed(attempt_index, message, None));
                let result = Err(RetryError::Exhausted { attempts: attempt_number, source: error });
                return RetryReport::new(result, records, total_delay);
            }

            if !self.predicate.should_retry(&error, attempt_index) {
                self.logger.debug(
                    "Error is not retryable",
                    &self.fields(&[
                        ("attempt", attempt_number.to_string()),
                        ("error", message.clone()),
                    ]),
                );
                records.push(AttemptRecord::failed(attempt_index, message, None));
                let result =
                    Err(RetryError::NonRetryable { attempts: attempt_number, source: error });
                return RetryReport::new(result, records, total_delay);
            }

            let delay = self.schedule.delay_for(attempt_index);
            observer.on_retry(&error, attempt_number, delay);
            self.logger.warn(
                "Operation failed, retrying after backoff",
                &self.fields(&[
                    ("attempt", attempt_number.to_string()),
                    ("delay_ms", delay.as_millis().to_string()),
                    ("error", message.clone()),
                ]),
            );
            records.push(AttemptRecord::failed(attempt_index, message, Some(delay)));

            if !self.backoff(delay).await {
                self.logger.warn(
                    "Retry cancelled during backoff",
                    &self.fields(&[("attempts", attempt_number.to_string())]),
                );
                let result = Err(RetryError::Cancelled {
                    attempts: attempt_number,
                    last_error: Some(error),
                });
                return RetryReport::new(result, records, total_delay);
            }

            total_delay += delay;
            last_error = Some(error);
            attempt_index += 1;
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    /// Sleep for `delay`; returns `false` if cancellation won the race
    async fn backoff(&self, delay: Duration) -> bool {
        match &self.cancellation {
            Some(token) => {
                tokio::select! {
                    biased;
                    () = token.cancelled() => false,
                    () = tokio::time::sleep(delay) => true,
                }
            }
            None => {
                tokio::time::sleep(delay).await;
                true
            }
        }
    }

    fn fields(&self, extra: &[LogField]) -> Vec<LogField> {
        let mut fields = Vec::with_capacity(extra.len() + 1);
        fields.push(("operation", self.operation.clone()));
        fields.extend_from_slice(extra);
        fields
    }
}

/// Run `operation` under `policy` with the default transient-failure predicate
pub async fn with_retry<F, Fut, T, E>(operation: F, policy: &RetryPolicy) -> RetryResult<T, E>
where
    E: FailureStatus + Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    RetryExecutor::new(policy.clone()).execute(operation).await
}

/// Run `operation` under `policy`, retrying only when `predicate` agrees
pub async fn with_retry_if<F, Fut, T, E, P>(
    operation: F,
    policy: &RetryPolicy,
    predicate: P,
) -> RetryResult<T, E>
where
    P: RetryPredicate<E>,
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    RetryExecutor::with_predicate(policy.clone(), predicate).execute(operation).await
}
