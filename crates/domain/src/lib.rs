//! # NameWizard Domain
//!
//! Domain types shared by the resilient-call subsystem.
//!
//! This crate contains:
//! - Candidate identifiers, chain status and the chain snapshot consumed by
//!   presentation layers
//! - Configuration structures (retry, model selection, logging)
//! - Domain error types and Result definitions
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other NameWizard crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
