//! # NameWizard Core
//!
//! Resilient-call business logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - The fallback chain state machine and its sequencer
//! - Port interfaces (traits) for invoking candidates, observing chain
//!   transitions and classifying failures
//! - Conversion from configuration settings to runtime retry policies
//!
//! ## Architecture Principles
//! - Only depends on `namewizard-common` and `namewizard-domain`
//! - No HTTP, filesystem or platform code
//! - All external calls go through [`CandidateInvoker`]

pub mod config;
pub mod fallback;

pub use config::retry_policy_from_settings;
pub use fallback::{
    invoke_fn, AdvanceOnAnyFailure, CandidateInvoker, FailureClassifier, FailureDisposition,
    FailureReport, FallbackChain, FallbackError, FallbackOutcome, FallbackSequencer,
    FallbackSequencerBuilder, OnTransition, SnapshotRecorder, StatusAwareClassifier,
    TransitionError, TransitionObserver,
};
