//! Fallback chain state machine
//!
//! ```text
//!   idle ──begin──▶ in-progress ──succeed──▶ success
//!                    │      ▲
//!          record_failure   │ begin (next candidate)
//!                    ▼      │
//!                 (no current) ──fail──▶ failure
//! ```
//!
//! `cancel` moves any non-terminal chain to `failure`. Every guarded
//! transition leaves the chain untouched when it is rejected.

use namewizard_domain::{CandidateId, ChainSnapshot, ChainStatus};

use super::error::{FallbackError, TransitionError};

/// Mutable state of one fallback sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackChain {
    candidates: Vec<CandidateId>,
    attempted: Vec<CandidateId>,
    current: Option<CandidateId>,
    status: ChainStatus,
    last_error: Option<String>,
    next_index: usize,
}

impl FallbackChain {
    /// Create an idle chain over `candidates`, in priority order
    ///
    /// # Errors
    /// Returns [`FallbackError::EmptyCandidates`] when `candidates` is empty.
    pub fn new(candidates: Vec<CandidateId>) -> Result<Self, FallbackError> {
        if candidates.is_empty() {
            return Err(FallbackError::EmptyCandidates);
        }

        Ok(Self {
            candidates,
            attempted: Vec::new(),
            current: None,
            status: ChainStatus::Idle,
            last_error: None,
            next_index: 0,
        })
    }

    pub fn status(&self) -> ChainStatus {
        self.status
    }

    pub fn candidates(&self) -> &[CandidateId] {
        &self.candidates
    }

    /// Candidates that failed, in the order they were tried
    pub fn attempted(&self) -> &[CandidateId] {
        &self.attempted
    }

    pub fn current(&self) -> Option<&CandidateId> {
        self.current.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn primary(&self) -> &CandidateId {
        &self.candidates[0]
    }

    /// Candidates not yet started
    pub fn remaining(&self) -> usize {
        self.candidates.len() - self.next_index
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Start the next candidate in order
    pub fn begin_candidate(&mut self) -> Result<&CandidateId, TransitionError> {
        self.ensure_not_terminal()?;
        if let Some(current) = &self.current {
            return Err(TransitionError::CandidateInProgress(current.clone()));
        }
        if self.next_index >= self.candidates.len() {
            return Err(TransitionError::CandidatesExhausted);
        }

        let candidate = self.candidates[self.next_index].clone();
        self.next_index += 1;
        self.status = ChainStatus::InProgress;
        Ok(&*self.current.insert(candidate))
    }

    /// Record that the current candidate failed
    ///
    /// The candidate moves to the attempted list and `error` becomes the
    /// chain's last error.
    pub fn record_failure(&mut self, error: impl Into<String>) -> Result<(), TransitionError> {
        self.ensure_in_progress()?;
        let candidate = self.current.take().ok_or(TransitionError::NoCandidateInProgress)?;

        self.attempted.push(candidate);
        self.last_error = Some(error.into());
        Ok(())
    }

    /// Mark the current candidate as the winner
    pub fn succeed(&mut self) -> Result<&CandidateId, TransitionError> {
        self.ensure_in_progress()?;
        let Some(winner) = self.current.as_ref() else {
            return Err(TransitionError::NoCandidateInProgress);
        };

        self.status = ChainStatus::Success;
        Ok(winner)
    }

    /// Finish the chain without a winner
    pub fn fail(&mut self) -> Result<(), TransitionError> {
        self.ensure_in_progress()?;
        if let Some(current) = &self.current {
            return Err(TransitionError::CandidateInProgress(current.clone()));
        }

        self.status = ChainStatus::Failure;
        Ok(())
    }

    /// Abandon the chain from any non-terminal state
    ///
    /// A candidate that was in flight is not counted as attempted. The last
    /// candidate error is kept; `reason` is only recorded when there is none.
    pub fn cancel(&mut self, reason: impl Into<String>) -> Result<(), TransitionError> {
        self.ensure_not_terminal()?;

        self.current = None;
        if self.last_error.is_none() {
            self.last_error = Some(reason.into());
        }
        self.status = ChainStatus::Failure;
        Ok(())
    }

    /// Whether `candidate` differs from the primary candidate
    pub fn is_alternative(&self, candidate: &CandidateId) -> bool {
        candidate != self.primary()
    }

    /// Presentation view of the current state
    pub fn snapshot(&self) -> ChainSnapshot {
        ChainSnapshot {
            status: self.status,
            current_model: self.current.clone(),
            attempted_models: self.attempted.clone(),
            error: self.last_error.clone(),
        }
    }

    fn ensure_not_terminal(&self) -> Result<(), TransitionError> {
        if self.status.is_terminal() {
            return Err(TransitionError::Terminal(self.status));
        }
        Ok(())
    }

    fn ensure_in_progress(&self) -> Result<(), TransitionError> {
        match self.status {
            ChainStatus::InProgress => Ok(()),
            ChainStatus::Idle => Err(TransitionError::NotStarted),
            status => Err(TransitionError::Terminal(status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(ids: &[&str]) -> FallbackChain {
        FallbackChain::new(ids.iter().map(|id| CandidateId::from(*id)).collect()).unwrap()
    }

    #[test]
    fn test_new_chain_is_idle() {
        let chain = chain(&["a", "b"]);

        assert_eq!(chain.status(), ChainStatus::Idle);
        assert!(chain.current().is_none());
        assert!(chain.attempted().is_empty());
        assert_eq!(chain.remaining(), 2);
        assert_eq!(chain.snapshot(), ChainSnapshot::idle());
    }

    #[test]
    fn test_empty_candidates_rejected() {
        assert!(matches!(FallbackChain::new(Vec::new()), Err(FallbackError::EmptyCandidates)));
    }

    #[test]
    fn test_candidates_visited_in_order() {
        let mut chain = chain(&["a", "b", "c"]);

        assert_eq!(chain.begin_candidate().unwrap().as_str(), "a");
        chain.record_failure("a down").unwrap();
        assert_eq!(chain.begin_candidate().unwrap().as_str(), "b");
        chain.record_failure("b down").unwrap();
        assert_eq!(chain.begin_candidate().unwrap().as_str(), "c");
        assert_eq!(chain.succeed().unwrap().as_str(), "c");

        assert_eq!(chain.status(), ChainStatus::Success);
        assert_eq!(chain.attempted(), &[CandidateId::from("a"), CandidateId::from("b")]);
        assert_eq!(chain.current().map(CandidateId::as_str), Some("c"));
        assert_eq!(chain.last_error(), Some("b down"));
    }

    #[test]
    fn test_failure_after_exhaustion() {
        let mut chain = chain(&["a"]);
        chain.begin_candidate().unwrap();
        chain.record_failure("timeout").unwrap();

        assert_eq!(chain.begin_candidate().unwrap_err(), TransitionError::CandidatesExhausted);
        chain.fail().unwrap();

        let snapshot = chain.snapshot();
        assert_eq!(snapshot.status, ChainStatus::Failure);
        assert_eq!(snapshot.current_model, None);
        assert_eq!(snapshot.error.as_deref(), Some("timeout"));
    }

    #[test]
    fn test_rejected_transitions_leave_state_untouched() {
        let mut chain = chain(&["a", "b"]);

        let before = chain.clone();
        assert_eq!(chain.succeed().unwrap_err(), TransitionError::NotStarted);
        assert_eq!(chain.record_failure("x").unwrap_err(), TransitionError::NotStarted);
        assert_eq!(chain.fail().unwrap_err(), TransitionError::NotStarted);
        assert_eq!(chain, before);

        chain.begin_candidate().unwrap();
        let before = chain.clone();
        assert_eq!(
            chain.begin_candidate().unwrap_err(),
            TransitionError::CandidateInProgress("a".into())
        );
        assert_eq!(chain.fail().unwrap_err(), TransitionError::CandidateInProgress("a".into()));
        assert_eq!(chain, before);
    }

    #[test]
    fn test_terminal_state_is_final() {
        let mut chain = chain(&["a", "b"]);
        chain.begin_candidate().unwrap();
        chain.succeed().unwrap();

        let before = chain.clone();
        assert_eq!(
            chain.begin_candidate().unwrap_err(),
            TransitionError::Terminal(ChainStatus::Success)
        );
        assert_eq!(chain.cancel("late").unwrap_err(), TransitionError::Terminal(ChainStatus::Success));
        assert_eq!(chain, before);
    }

    #[test]
    fn test_cancel_drops_in_flight_candidate() {
        let mut chain = chain(&["a", "b"]);
        chain.begin_candidate().unwrap();
        chain.record_failure("a down").unwrap();
        chain.begin_candidate().unwrap();

        chain.cancel("cancelled by caller").unwrap();

        assert_eq!(chain.status(), ChainStatus::Failure);
        assert_eq!(chain.attempted(), &[CandidateId::from("a")]);
        assert!(chain.current().is_none());
        assert_eq!(chain.last_error(), Some("a down"));
    }

    #[test]
    fn test_cancel_before_any_failure_records_reason() {
        let mut chain = chain(&["a"]);

        chain.cancel("cancelled by caller").unwrap();

        assert_eq!(chain.status(), ChainStatus::Failure);
        assert_eq!(chain.snapshot().error.as_deref(), Some("cancelled by caller"));
    }

    #[test]
    fn test_duplicates_are_not_deduplicated() {
        let mut chain = chain(&["a", "a"]);
        chain.begin_candidate().unwrap();
        chain.record_failure("first").unwrap();
        assert_eq!(chain.begin_candidate().unwrap().as_str(), "a");
        assert!(!chain.is_alternative(&"a".into()));
    }
}
