//! Transition observer implementations

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use namewizard_domain::{CandidateId, ChainSnapshot, ChainStatus};

use super::ports::TransitionObserver;

/// Fans every notification out to a list of observers, in registration order
#[derive(Clone, Default)]
pub struct ObserverSet {
    observers: Vec<Arc<dyn TransitionObserver>>,
}

impl fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverSet").field("len", &self.observers.len()).finish()
    }
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, observer: Arc<dyn TransitionObserver>) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl TransitionObserver for ObserverSet {
    fn on_transition(&self, snapshot: &ChainSnapshot) {
        for observer in &self.observers {
            observer.on_transition(snapshot);
        }
    }

    fn on_alternative_selected(&self, primary: &CandidateId, selected: &CandidateId) {
        for observer in &self.observers {
            observer.on_alternative_selected(primary, selected);
        }
    }
}

/// Observer backed by a closure over each snapshot
pub struct OnTransition<F> {
    f: F,
}

impl<F> OnTransition<F>
where
    F: Fn(&ChainSnapshot) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> fmt::Debug for OnTransition<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnTransition").finish_non_exhaustive()
    }
}

impl<F> TransitionObserver for OnTransition<F>
where
    F: Fn(&ChainSnapshot) + Send + Sync,
{
    fn on_transition(&self, snapshot: &ChainSnapshot) {
        (self.f)(snapshot);
    }
}

/// Keeps every snapshot and alternative-model signal it receives
#[derive(Debug, Default)]
pub struct SnapshotRecorder {
    history: Mutex<Vec<ChainSnapshot>>,
    alternatives: Mutex<Vec<(CandidateId, CandidateId)>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SnapshotRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<ChainSnapshot> {
        lock(&self.history).clone()
    }

    pub fn statuses(&self) -> Vec<ChainStatus> {
        lock(&self.history).iter().map(|snapshot| snapshot.status).collect()
    }

    /// Current candidate of each in-progress snapshot, in order
    pub fn visited(&self) -> Vec<CandidateId> {
        lock(&self.history)
            .iter()
            .filter(|snapshot| snapshot.status == ChainStatus::InProgress)
            .filter_map(|snapshot| snapshot.current_model.clone())
            .collect()
    }

    pub fn latest(&self) -> Option<ChainSnapshot> {
        lock(&self.history).last().cloned()
    }

    /// `(primary, selected)` pairs reported by `on_alternative_selected`
    pub fn alternatives(&self) -> Vec<(CandidateId, CandidateId)> {
        lock(&self.alternatives).clone()
    }
}

impl TransitionObserver for SnapshotRecorder {
    fn on_transition(&self, snapshot: &ChainSnapshot) {
        lock(&self.history).push(snapshot.clone());
    }

    fn on_alternative_selected(&self, primary: &CandidateId, selected: &CandidateId) {
        lock(&self.alternatives).push((primary.clone(), selected.clone()));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_observer_set_fans_out_in_order() {
        let first = Arc::new(SnapshotRecorder::new());
        let second = Arc::new(SnapshotRecorder::new());
        let mut set = ObserverSet::new();
        set.push(first.clone());
        set.push(second.clone());

        set.on_transition(&ChainSnapshot::idle());
        set.on_alternative_selected(&"a".into(), &"b".into());

        assert_eq!(set.len(), 2);
        for recorder in [first, second] {
            assert_eq!(recorder.statuses(), vec![ChainStatus::Idle]);
            assert_eq!(recorder.alternatives(), vec![("a".into(), "b".into())]);
        }
    }

    #[test]
    fn test_on_transition_closure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let observer = OnTransition::new(move |_: &ChainSnapshot| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        observer.on_transition(&ChainSnapshot::idle());
        observer.on_alternative_selected(&"a".into(), &"b".into());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
