//! Domain types and models

pub mod chain;
pub mod model;

pub use chain::{ChainSnapshot, ChainStatus};
pub use model::{CandidateId, ModelSelection};
