//! Observability infrastructure
//!
//! Installs the process-wide `tracing` subscriber. Library code never logs
//! through the subscriber directly; it receives a
//! [`SharedLogger`](namewizard_common::observability::SharedLogger) whose
//! default implementation forwards here.

pub mod logging;

pub use logging::init_logging;
