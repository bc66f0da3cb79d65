//! Observability primitives - the injected logging capability
//!
//! Resilience components never reach for a process-wide logger. They receive
//! a [`SharedLogger`] at construction time, which keeps them free of global
//! state and lets tests substitute a recording double.
//!
//! - [`traits`]: the [`Logger`] trait, log levels and the no-op logger
//! - [`tracing_logger`]: the production implementation backed by `tracing`

pub mod tracing_logger;
pub mod traits;

pub use tracing_logger::TracingLogger;
pub use traits::{noop_logger, LogField, LogLevel, Logger, NoopLogger, SharedLogger};
