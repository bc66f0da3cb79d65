//! Domain-free utilities shared across NameWizard crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: errors and error classification
//! - `observability`: the injected [`Logger`](observability::Logger)
//!   capability and its `tracing` implementation
//! - `runtime`: async infrastructure (retry executor, cancellation)
//! - `test-utils`: recording test doubles
//! - `serde`: serialization for policy types

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod error;

// Observability tier
// --------------------------------------------------------------
#[cfg(feature = "observability")]
pub mod observability;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod resilience;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", all(test, feature = "runtime")))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use error::{CommonError, CommonResult, ErrorClassification, ErrorSeverity};
#[cfg(feature = "observability")]
pub use observability::{noop_logger, LogLevel, Logger, NoopLogger, SharedLogger, TracingLogger};
#[cfg(feature = "runtime")]
pub use resilience::{
    with_retry, with_retry_if, BackoffSchedule, FailureStatus, RetryError, RetryExecutor,
    RetryObserver, RetryPolicy, RetryPredicate, TransientFailure,
};
#[cfg(feature = "runtime")]
pub use tokio_util::sync::CancellationToken;
