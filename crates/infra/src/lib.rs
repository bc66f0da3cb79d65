//! # NameWizard Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - Configuration loading (environment, JSON and TOML files)
//! - Logging initialisation (`tracing-subscriber`)
//! - An HTTP client that retries through the shared retry executor
//! - The HTTP model endpoint used as a fallback candidate
//!
//! ## Architecture
//! - Implements traits defined in `namewizard-core`
//! - Depends on `namewizard-common`, `namewizard-domain` and `namewizard-core`
//! - Contains all "impure" code (I/O, network, process-wide subscribers)

pub mod config;
pub mod http;
pub mod integrations;
pub mod observability;

// Re-export commonly used items
pub use http::{HttpCallError, HttpClient, HttpClientBuilder};
pub use integrations::ModelEndpointInvoker;
pub use observability::init_logging;
