//! Port interfaces for the fallback sequencer
//!
//! These traits define the boundaries between the chain logic and whatever
//! performs the call, reacts to progress, or judges a failure.

use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;
use namewizard_domain::{CandidateId, ChainSnapshot};

/// Performs the operation against one candidate backend
#[async_trait]
pub trait CandidateInvoker<T, E>: Send + Sync {
    /// Attempt the operation against `candidate`
    async fn invoke(&self, candidate: &CandidateId) -> Result<T, E>;
}

/// [`CandidateInvoker`] backed by a closure, see [`invoke_fn`]
pub struct FnInvoker<F, T, E> {
    f: F,
    _marker: PhantomData<fn() -> (T, E)>,
}

impl<F, T, E> std::fmt::Debug for FnInvoker<F, T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnInvoker").finish_non_exhaustive()
    }
}

/// Wrap a closure `CandidateId -> Future<Result<T, E>>` as an invoker
///
/// ```rust,ignore
/// let invoker = invoke_fn(|model: CandidateId| async move { client.rename(&model).await });
/// ```
pub fn invoke_fn<F, Fut, T, E>(f: F) -> FnInvoker<F, T, E>
where
    F: Fn(CandidateId) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, E>> + Send,
{
    FnInvoker { f, _marker: PhantomData }
}

#[async_trait]
impl<F, Fut, T, E> CandidateInvoker<T, E> for FnInvoker<F, T, E>
where
    F: Fn(CandidateId) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, E>> + Send,
    T: Send,
    E: Send,
{
    async fn invoke(&self, candidate: &CandidateId) -> Result<T, E> {
        (self.f)(candidate.clone()).await
    }
}

/// Receives chain progress as it happens
pub trait TransitionObserver: Send + Sync {
    /// Called on every status or current-candidate change, starting with the
    /// initial `idle` state
    fn on_transition(&self, snapshot: &ChainSnapshot);

    /// Called once when a candidate other than the primary wins
    fn on_alternative_selected(&self, _primary: &CandidateId, _selected: &CandidateId) {}
}

/// What the sequencer does after a candidate fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureDisposition {
    /// Try the next candidate
    Advance,
    /// Stop the chain; no other backend would do better
    Abort,
}

/// Judges a candidate's final failure
pub trait FailureClassifier<E>: Send + Sync {
    fn classify(&self, error: &E) -> FailureDisposition;
}

/// Classifier backed by a closure
#[derive(Debug, Clone)]
pub struct ClassifyWith<F> {
    f: F,
}

impl<F> ClassifyWith<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F, E> FailureClassifier<E> for ClassifyWith<F>
where
    F: Fn(&E) -> FailureDisposition + Send + Sync,
{
    fn classify(&self, error: &E) -> FailureDisposition {
        (self.f)(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invoke_fn_passes_candidate() {
        let invoker = invoke_fn(|candidate: CandidateId| async move {
            if candidate.as_str() == "gpt-4" {
                Ok(format!("renamed by {candidate}"))
            } else {
                Err("unknown model".to_string())
            }
        });

        assert_eq!(invoker.invoke(&"gpt-4".into()).await.unwrap(), "renamed by gpt-4");
        assert!(invoker.invoke(&"other".into()).await.is_err());
    }

    #[test]
    fn test_classify_with_closure() {
        let classifier = ClassifyWith::new(|error: &String| {
            if error.contains("invalid") {
                FailureDisposition::Abort
            } else {
                FailureDisposition::Advance
            }
        });

        assert_eq!(classifier.classify(&"invalid file".to_string()), FailureDisposition::Abort);
        assert_eq!(classifier.classify(&"timeout".to_string()), FailureDisposition::Advance);
    }
}
