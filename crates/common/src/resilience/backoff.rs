//! Exponential backoff schedule with bounded jitter

use std::time::Duration;

use rand::Rng;

use crate::resilience::constants::MAX_BACKOFF_EXPONENT;
use crate::resilience::policy::RetryPolicy;

/// Computes the wait before each retry
///
/// For the retry at 0-based index `n` the delay is
/// `min(initial * factor^n + jitter, max_delay)` where `jitter` is drawn
/// uniformly from `[0, jitter_ratio * initial * factor^n]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffSchedule {
    initial_delay: Duration,
    backoff_factor: f64,
    max_delay: Duration,
    jitter_ratio: f64,
}

impl BackoffSchedule {
    pub fn from_policy(policy: &RetryPolicy) -> Self {
        Self {
            initial_delay: policy.initial_delay(),
            backoff_factor: policy.backoff_factor(),
            max_delay: policy.max_delay(),
            jitter_ratio: policy.jitter_ratio(),
        }
    }

    /// Delay before jitter is applied, capped at `max_delay`
    pub fn base_delay(&self, retry_index: u32) -> Duration {
        self.delay_with_jitter_sample(retry_index, 0.0)
    }

    /// Delay for the retry at `retry_index`, with random jitter
    pub fn delay_for(&self, retry_index: u32) -> Duration {
        let sample = if self.jitter_ratio > 0.0 { rand::thread_rng().gen_range(0.0..=1.0) } else { 0.0 };
        self.delay_with_jitter_sample(retry_index, sample)
    }

    /// Delay for `retry_index` given a jitter sample in `[0, 1]`
    ///
    /// A sample of 0 yields the base delay, a sample of 1 yields the largest
    /// jittered delay. Out-of-range samples are clamped.
    pub fn delay_with_jitter_sample(&self, retry_index: u32, sample: f64) -> Duration {
        let exponent = retry_index.min(MAX_BACKOFF_EXPONENT);
        let exponent = i32::try_from(exponent).unwrap_or(i32::MAX);
        let max_nanos = duration_nanos(self.max_delay);

        let base = duration_nanos(self.initial_delay) * self.backoff_factor.powi(exponent);
        let sample = if sample.is_finite() { sample.clamp(0.0, 1.0) } else { 0.0 };
        let jittered = base + base * self.jitter_ratio * sample;

        if !jittered.is_finite() || jittered >= max_nanos {
            return self.max_delay;
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let nanos = jittered.round() as u64;
        Duration::from_nanos(nanos).min(self.max_delay)
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }
}

#[allow(clippy::cast_precision_loss)]
fn duration_nanos(duration: Duration) -> f64 {
    duration.as_nanos() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(initial_ms: u64, factor: f64, max_ms: u64, jitter: f64) -> BackoffSchedule {
        let policy = RetryPolicy::builder()
            .initial_delay(Duration::from_millis(initial_ms))
            .backoff_factor(factor)
            .max_delay(Duration::from_millis(max_ms))
            .jitter_ratio(jitter)
            .build()
            .expect("valid policy");
        BackoffSchedule::from_policy(&policy)
    }

    #[test]
    fn test_exponential_base_delays() {
        let schedule = schedule(1000, 2.0, 30_000, 0.1);

        assert_eq!(schedule.base_delay(0), Duration::from_millis(1000));
        assert_eq!(schedule.base_delay(1), Duration::from_millis(2000));
        assert_eq!(schedule.base_delay(2), Duration::from_millis(4000));
        assert_eq!(schedule.base_delay(3), Duration::from_millis(8000));
    }

    #[test]
    fn test_delay_capped_at_max() {
        let schedule = schedule(1000, 2.0, 5000, 0.1);

        assert_eq!(schedule.base_delay(3), Duration::from_millis(5000));
        assert_eq!(schedule.delay_with_jitter_sample(2, 1.0), Duration::from_millis(4400));
        assert_eq!(schedule.delay_with_jitter_sample(3, 1.0), Duration::from_millis(5000));
    }

    #[test]
    fn test_jitter_sample_bounds() {
        let schedule = schedule(1000, 2.0, 30_000, 0.1);

        assert_eq!(schedule.delay_with_jitter_sample(0, 0.0), Duration::from_millis(1000));
        assert_eq!(schedule.delay_with_jitter_sample(0, 1.0), Duration::from_millis(1100));
        assert_eq!(schedule.delay_with_jitter_sample(1, 0.5), Duration::from_millis(2100));
        assert_eq!(schedule.delay_with_jitter_sample(0, 7.0), Duration::from_millis(1100));
        assert_eq!(schedule.delay_with_jitter_sample(0, f64::NAN), Duration::from_millis(1000));
    }

    #[test]
    fn test_random_delay_within_jitter_window() {
        let schedule = schedule(1000, 2.0, 30_000, 0.1);

        for retry_index in 0..4 {
            let base = schedule.base_delay(retry_index);
            let upper = base + base.mul_f64(0.1);
            for _ in 0..50 {
                let delay = schedule.delay_for(retry_index);
                assert!(delay >= base, "delay {delay:?} below base {base:?}");
                assert!(delay <= upper, "delay {delay:?} above {upper:?}");
            }
        }
    }

    #[test]
    fn test_zero_jitter_is_deterministic() {
        let schedule = schedule(250, 3.0, 10_000, 0.0);

        assert_eq!(schedule.delay_for(0), Duration::from_millis(250));
        assert_eq!(schedule.delay_for(1), Duration::from_millis(750));
        assert_eq!(schedule.delay_for(2), Duration::from_millis(2250));
    }

    #[test]
    fn test_large_retry_index_saturates() {
        let schedule = schedule(1000, 2.0, 30_000, 0.1);

        assert_eq!(schedule.base_delay(u32::MAX), Duration::from_millis(30_000));
        assert_eq!(schedule.delay_for(500), Duration::from_millis(30_000));
    }

    #[test]
    fn test_factor_of_one_is_constant() {
        let schedule = schedule(500, 1.0, 30_000, 0.0);

        assert_eq!(schedule.base_delay(0), schedule.base_delay(10));
    }
}
