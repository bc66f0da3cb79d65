//! Model fallback chain
//!
//! Sequences a list of candidate backends, tries each in priority order
//! (optionally under a retry policy) and publishes every state change to
//! registered observers.
//!
//! # Example
//!
//! ```rust,ignore
//! let sequencer = FallbackSequencer::builder()
//!     .retry_policy(RetryPolicy::default())
//!     .observer(Arc::new(OnTransition::new(|snapshot: &ChainSnapshot| render(snapshot))))
//!     .build();
//!
//! let outcome = sequencer.run_selection(&selection, &invoker).await?;
//! ```

pub mod classify;
pub mod error;
pub mod observers;
pub mod outcome;
pub mod ports;
pub mod sequencer;
pub mod state;

pub use classify::{
    AdvanceOnAnyFailure, InvalidInputClassifier, StatusAwareClassifier,
    DEFAULT_ABORT_STATUS_CODES,
};
pub use error::{FallbackError, TransitionError};
pub use observers::{ObserverSet, OnTransition, SnapshotRecorder};
pub use outcome::{CandidateFailure, FailureReport, FallbackOutcome};
pub use ports::{
    invoke_fn, CandidateInvoker, ClassifyWith, FailureClassifier, FailureDisposition, FnInvoker,
    TransitionObserver,
};
pub use sequencer::{FallbackSequencer, FallbackSequencerBuilder};
pub use state::FallbackChain;
