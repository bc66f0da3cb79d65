//! Test doubles for the logging capability and the retry executor
//!
//! Provides recording implementations of [`Logger`] and [`RetryObserver`],
//! plus [`ScriptedOperation`], an async operation that replays a fixed
//! sequence of outcomes.

#![allow(clippy::missing_panics_doc)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::observability::{LogField, LogLevel, Logger};
use crate::resilience::RetryObserver;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A log record captured by [`RecordingLogger`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl LogRecord {
    /// Value of the field named `key`, if present
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

/// Logger that keeps every record in memory
///
/// # Examples
///
/// ```
/// use namewizard_common::observability::{LogLevel, Logger};
/// use namewizard_common::testing::RecordingLogger;
///
/// let logger = RecordingLogger::new();
/// logger.warn("retrying", &[("attempt", "1".to_string())]);
///
/// assert_eq!(logger.count_at(LogLevel::Warn), 1);
/// assert!(logger.contains("retrying"));
/// ```
#[derive(Debug, Default)]
pub struct RecordingLogger {
    records: Mutex<Vec<LogRecord>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a shared logger ready to inject into a component
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn records(&self) -> Vec<LogRecord> {
        lock(&self.records).clone()
    }

    pub fn records_at(&self, level: LogLevel) -> Vec<LogRecord> {
        lock(&self.records).iter().filter(|record| record.level == level).cloned().collect()
    }

    pub fn count_at(&self, level: LogLevel) -> usize {
        lock(&self.records).iter().filter(|record| record.level == level).count()
    }

    /// Whether any record's message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        lock(&self.records).iter().any(|record| record.message.contains(needle))
    }

    pub fn clear(&self) {
        lock(&self.records).clear();
    }
}

impl Logger for RecordingLogger {
    fn log(&self, level: LogLevel, message: &str, fields: &[LogField]) {
        let fields = fields.iter().map(|(key, value)| ((*key).to_string(), value.clone())).collect();
        lock(&self.records).push(LogRecord { level, message: message.to_string(), fields });
    }
}

/// A retry hook invocation captured by [`RecordingRetryObserver`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryEvent {
    Retry { attempt: u32, delay: Duration, error: String },
    MaxRetriesExceeded { attempts: u32, error: String },
}

/// Retry observer that records every hook invocation
#[derive(Debug, Default)]
pub struct RecordingRetryObserver {
    events: Mutex<Vec<RetryEvent>>,
}

impl RecordingRetryObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RetryEvent> {
        lock(&self.events).clone()
    }

    /// Delays reported by `on_retry`, in order
    pub fn retry_delays(&self) -> Vec<Duration> {
        lock(&self.events)
            .iter()
            .filter_map(|event| match event {
                RetryEvent::Retry { delay, .. } => Some(*delay),
                RetryEvent::MaxRetriesExceeded { .. } => None,
            })
            .collect()
    }

    /// Attempt numbers reported by `on_retry`, in order
    pub fn retry_attempts(&self) -> Vec<u32> {
        lock(&self.events)
            .iter()
            .filter_map(|event| match event {
                RetryEvent::Retry { attempt, .. } => Some(*attempt),
                RetryEvent::MaxRetriesExceeded { .. } => None,
            })
            .collect()
    }

    pub fn retry_count(&self) -> usize {
        self.retry_attempts().len()
    }

    pub fn max_retries_exceeded_count(&self) -> usize {
        lock(&self.events)
            .iter()
            .filter(|event| matches!(event, RetryEvent::MaxRetriesExceeded { .. }))
            .count()
    }
}

impl<E: std::fmt::Display> RetryObserver<E> for RecordingRetryObserver {
    fn on_retry(&self, error: &E, attempt: u32, delay: Duration) {
        lock(&self.events).push(RetryEvent::Retry { attempt, delay, error: error.to_string() });
    }

    fn on_max_retries_exceeded(&self, error: &E, attempts: u32) {
        lock(&self.events)
            .push(RetryEvent::MaxRetriesExceeded { attempts, error: error.to_string() });
    }
}

type BoxedOutcome<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send>>;

/// Async operation that replays scripted outcomes
///
/// Each call pops the next outcome; once the script is exhausted the last
/// outcome is repeated.
///
/// # Examples
///
/// ```
/// use namewizard_common::testing::ScriptedOperation;
///
/// let op = ScriptedOperation::new(vec![Err("busy"), Ok(7)]);
/// # tokio_test::block_on(async {
/// assert_eq!(op.call().await, Err("busy"));
/// assert_eq!(op.call().await, Ok(7));
/// assert_eq!(op.call().await, Ok(7));
/// assert_eq!(op.calls(), 3);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedOperation<T, E> {
    script: Arc<Mutex<VecDeque<Result<T, E>>>>,
    last: Arc<Mutex<Option<Result<T, E>>>>,
    calls: Arc<AtomicU32>,
}

impl<T, E> ScriptedOperation<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    pub fn new(outcomes: Vec<Result<T, E>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(outcomes.into_iter().collect())),
            last: Arc::new(Mutex::new(None)),
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Fail `failures` times with `error`, then succeed with `value`
    pub fn failing_then(failures: usize, error: E, value: T) -> Self {
        let mut outcomes: Vec<Result<T, E>> = vec![Err(error); failures];
        outcomes.push(Ok(value));
        Self::new(outcomes)
    }

    /// Fail on every call with `error`
    pub fn always_failing(error: E) -> Self {
        Self::new(vec![Err(error)])
    }

    /// Number of times the operation was invoked
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Produce the next scripted outcome
    pub fn call(&self) -> BoxedOutcome<T, E> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = lock(&self.script).pop_front();
        let outcome = match outcome {
            Some(outcome) => {
                *lock(&self.last) = Some(outcome.clone());
                Some(outcome)
            }
            None => lock(&self.last).clone(),
        };

        Box::pin(async move {
            match outcome {
                Some(outcome) => outcome,
                None => panic!("ScriptedOperation called with an empty script"),
            }
        })
    }

    /// Closure form accepted by the retry executor
    pub fn as_operation(&self) -> impl FnMut() -> BoxedOutcome<T, E> + '_ {
        move || self.call()
    }
}
