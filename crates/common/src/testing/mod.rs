//! Testing utilities and helpers
//!
//! - **[`assertions`]**: delay and error-message assertions
//! - **[`mocks`]**: recording logger, recording retry observer and a scripted
//!   async operation
//!
//! ## Usage
//!
//! ```rust
//! # #[cfg(feature = "runtime")]
//! # {
//! use std::sync::Arc;
//! use namewizard_common::resilience::{RetryExecutor, RetryPolicy};
//! use namewizard_common::testing::RecordingLogger;
//!
//! let logger = Arc::new(RecordingLogger::new());
//! let executor = RetryExecutor::new(RetryPolicy::default()).with_logger(logger.clone());
//! # let _ = executor;
//! # }
//! ```

pub mod assertions;
pub mod mocks;

pub use assertions::{assert_delay_within_jitter, assert_duration_in_range};
pub use mocks::{LogRecord, RecordingLogger, RecordingRetryObserver, RetryEvent, ScriptedOperation};
