//! Fallback sequencer - tries candidate backends in priority order
//!
//! For each candidate the sequencer marks it current, optionally wraps the
//! call in a [`RetryExecutor`], and either accepts the result or records the
//! failure and moves on. Observers see every transition as it happens.

use std::fmt::{self, Display};
use std::sync::Arc;

use namewizard_common::observability::{SharedLogger, TracingLogger};
use namewizard_common::resilience::{
    NeverRetry, RetryError, RetryExecutor, RetryPolicy, RetryPredicate, TransientFailure,
};
use namewizard_domain::{CandidateId, ModelSelection, RetrySettings};
use tokio_util::sync::CancellationToken;

use super::classify::AdvanceOnAnyFailure;
use super::error::FallbackError;
use super::observers::ObserverSet;
use super::outcome::{CandidateFailure, FallbackOutcome};
use super::ports::{CandidateInvoker, FailureClassifier, FailureDisposition, TransitionObserver};
use super::state::FallbackChain;
use crate::config::retry_policy_from_settings;

const CANCELLED_REASON: &str = "cancelled";

/// How a single candidate ended
enum CandidateResult<T, E> {
    Succeeded(T),
    Failed(E),
    Cancelled,
}

/// Runs fallback chains
///
/// A sequencer holds configuration only; every call to
/// [`run_with_fallback`](Self::run_with_fallback) creates its own chain, so
/// one sequencer can drive many chains concurrently.
///
/// Without a retry policy each candidate is invoked exactly once.
pub struct FallbackSequencer<P = NeverRetry, C = AdvanceOnAnyFailure> {
    retry: Option<RetryPolicy>,
    predicate: P,
    classifier: C,
    logger: SharedLogger,
    observers: ObserverSet,
    cancellation: Option<CancellationToken>,
}

impl<P: fmt::Debug, C: fmt::Debug> fmt::Debug for FallbackSequencer<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackSequencer")
            .field("retry", &self.retry)
            .field("predicate", &self.predicate)
            .field("classifier", &self.classifier)
            .field("observers", &self.observers)
            .finish_non_exhaustive()
    }
}

impl FallbackSequencer {
    /// Start configuring a sequencer
    pub fn builder() -> FallbackSequencerBuilder {
        FallbackSequencerBuilder::new()
    }
}

impl Default for FallbackSequencer {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl<P, C> FallbackSequencer<P, C> {
    pub fn retry_policy(&self) -> Option<&RetryPolicy> {
        self.retry.as_ref()
    }

    /// Run the selection's candidates, primary first
    pub async fn run_selection<T, E, I>(
        &self,
        selection: &ModelSelection,
        invoker: &I,
    ) -> Result<FallbackOutcome<T, E>, FallbackError>
    where
        I: CandidateInvoker<T, E> + ?Sized,
        P: RetryPredicate<E> + Clone,
        C: FailureClassifier<E>,
        E: Display,
    {
        self.run_with_fallback(selection.candidates(), invoker).await
    }

    /// Try `candidates` in order until one succeeds
    ///
    /// # Errors
    /// - [`FallbackError::EmptyCandidates`] before any invocation when
    ///   `candidates` is empty
    /// - [`FallbackError::Cancelled`] when the cancellation token fires
    ///
    /// Exhausting every candidate is not an error; it is returned as
    /// [`FallbackOutcome::Failure`].
    pub async fn run_with_fallback<T, E, I>(
        &self,
        candidates: Vec<CandidateId>,
        invoker: &I,
    ) -> Result<FallbackOutcome<T, E>, FallbackError>
    where
        I: CandidateInvoker<T, E> + ?Sized,
        P: RetryPredicate<E> + Clone,
        C: FailureClassifier<E>,
        E: Display,
    {
        let mut chain = match FallbackChain::new(candidates) {
            Ok(chain) => chain,
            Err(err) => {
                self.logger.error("Fallback chain has no candidates", &[]);
                return Err(err);
            }
        };
        self.emit(&chain);

        let total = chain.candidates().len();
        let mut failures = Vec::new();

        loop {
            if self.is_cancelled() {
                return Err(self.cancel(&mut chain)?);
            }

            let candidate = chain.begin_candidate()?.clone();
            self.emit(&chain);
            self.logger.info(
                "Trying candidate",
                &[
                    ("candidate", candidate.to_string()),
                    ("position", format!("{}/{}", total - chain.remaining(), total)),
                ],
            );

            let error = match self.invoke_candidate(invoker, &candidate).await {
                CandidateResult::Succeeded(result) => {
                    chain.succeed()?;
                    self.emit(&chain);

                    let used_alternative = chain.is_alternative(&candidate);
                    if used_alternative {
                        self.logger.info(
                            "Alternative model selected",
                            &[
                                ("primary", chain.primary().to_string()),
                                ("selected", candidate.to_string()),
                            ],
                        );
                        self.observers.on_alternative_selected(chain.primary(), &candidate);
                    }

                    return Ok(FallbackOutcome::Success {
                        backend: candidate,
                        result,
                        attempted: chain.attempted().to_vec(),
                        used_alternative,
                    });
                }
                CandidateResult::Cancelled => return Err(self.cancel(&mut chain)?),
                CandidateResult::Failed(error) => error,
            };

            let message = error.to_string();
            chain.record_failure(message.clone())?;
            self.logger.warn(
                "Candidate failed",
                &[("candidate", candidate.to_string()), ("error", message.clone())],
            );
            failures.push(CandidateFailure { candidate, message });

            let disposition = self.classifier.classify(&error);
            let aborted = disposition == FailureDisposition::Abort && chain.remaining() > 0;
            if disposition == FailureDisposition::Abort || chain.remaining() == 0 {
                chain.fail()?;
                self.emit(&chain);
                self.logger.error(
                    if aborted { "Fallback chain aborted" } else { "All candidates failed" },
                    &[
                        ("attempted", chain.attempted().len().to_string()),
                        ("last_error", chain.last_error().unwrap_or_default().to_string()),
                    ],
                );

                return Ok(FallbackOutcome::Failure {
                    error,
                    attempted: chain.attempted().to_vec(),
                    failures,
                    aborted,
                });
            }
        }
    }

    async fn invoke_candidate<T, E, I>(
        &self,
        invoker: &I,
        candidate: &CandidateId,
    ) -> CandidateResult<T, E>
    where
        I: CandidateInvoker<T, E> + ?Sized,
        P: RetryPredicate<E> + Clone,
        E: Display,
    {
        let Some(policy) = &self.retry else {
            return match invoker.invoke(candidate).await {
                Ok(result) => CandidateResult::Succeeded(result),
                Err(error) => CandidateResult::Failed(error),
            };
        };

        let mut executor = RetryExecutor::with_predicate(policy.clone(), self.predicate.clone())
            .with_logger(Arc::clone(&self.logger))
            .with_operation_name(candidate.to_string());
        if let Some(token) = &self.cancellation {
            executor = executor.with_cancellation(token.clone());
        }

        match executor.execute(|| invoker.invoke(candidate)).await {
            Ok(result) => CandidateResult::Succeeded(result),
            Err(RetryError::Cancelled { .. }) => CandidateResult::Cancelled,
            Err(RetryError::Exhausted { source, .. } | RetryError::NonRetryable { source, .. }) => {
                CandidateResult::Failed(source)
            }
        }
    }

    fn cancel(&self, chain: &mut FallbackChain) -> Result<FallbackError, FallbackError> {
        let last_error = chain.last_error().map(str::to_string);
        chain.cancel(CANCELLED_REASON)?;
        self.emit(chain);
        self.logger.warn(
            "Fallback chain cancelled",
            &[("attempted", chain.attempted().len().to_string())],
        );

        Ok(FallbackError::Cancelled { attempted: chain.attempted().to_vec(), last_error })
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    fn emit(&self, chain: &FallbackChain) {
        let snapshot = chain.snapshot();
        self.logger.debug(
            "Fallback chain transition",
            &[
                ("status", snapshot.status.to_string()),
                (
                    "current",
                    snapshot.current_model.as_ref().map(ToString::to_string).unwrap_or_default(),
                ),
            ],
        );
        self.observers.on_transition(&snapshot);
    }
}

/// Builder for [`FallbackSequencer`] with fluent API
pub struct FallbackSequencerBuilder<P = NeverRetry, C = AdvanceOnAnyFailure> {
    retry: Option<RetryPolicy>,
    predicate: P,
    classifier: C,
    logger: SharedLogger,
    observers: ObserverSet,
    cancellation: Option<CancellationToken>,
}

impl Default for FallbackSequencerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackSequencerBuilder {
    pub fn new() -> Self {
        Self {
            retry: None,
            predicate: NeverRetry,
            classifier: AdvanceOnAnyFailure,
            logger: Arc::new(TracingLogger::new("fallback")),
            observers: ObserverSet::new(),
            cancellation: None,
        }
    }
}

impl<P, C> FallbackSequencerBuilder<P, C> {
    /// Retry each candidate under `policy` with the transient-failure
    /// predicate derived from that same policy
    pub fn retry_policy(self, policy: RetryPolicy) -> FallbackSequencerBuilder<TransientFailure, C> {
        let predicate = TransientFailure::from_policy(&policy);
        self.retry_with(policy, predicate)
    }

    /// Retry each candidate under a policy built from `settings`
    ///
    /// # Errors
    /// Returns [`FallbackError::InvalidPolicy`] when the settings violate a
    /// policy invariant.
    pub fn retry_settings(
        self,
        settings: &RetrySettings,
    ) -> Result<FallbackSequencerBuilder<TransientFailure, C>, FallbackError> {
        let policy = retry_policy_from_settings(settings)?;
        Ok(self.retry_policy(policy))
    }

    /// Retry each candidate under `policy`, consulting `predicate`
    pub fn retry_with<Q>(self, policy: RetryPolicy, predicate: Q) -> FallbackSequencerBuilder<Q, C> {
        FallbackSequencerBuilder {
            retry: Some(policy),
            predicate,
            classifier: self.classifier,
            logger: self.logger,
            observers: self.observers,
            cancellation: self.cancellation,
        }
    }

    /// Decide per failure whether to advance or stop the chain
    pub fn classifier<D>(self, classifier: D) -> FallbackSequencerBuilder<P, D> {
        FallbackSequencerBuilder {
            retry: self.retry,
            predicate: self.predicate,
            classifier,
            logger: self.logger,
            observers: self.observers,
            cancellation: self.cancellation,
        }
    }

    pub fn logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Register an observer; observers are notified in registration order
    pub fn observer(mut self, observer: Arc<dyn TransitionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn build(self) -> FallbackSequencer<P, C> {
        FallbackSequencer {
            retry: self.retry,
            predicate: self.predicate,
            classifier: self.classifier,
            logger: self.logger,
            observers: self.observers,
            cancellation: self.cancellation,
        }
    }
}
