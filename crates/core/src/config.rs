//! Conversion from serializable settings to runtime policies

use std::time::Duration;

use namewizard_common::error::CommonResult;
use namewizard_common::resilience::RetryPolicy;
use namewizard_domain::RetrySettings;

/// Build a validated [`RetryPolicy`] from configuration
///
/// # Errors
/// Returns a configuration error naming the offending field when the
/// settings violate a policy invariant.
pub fn retry_policy_from_settings(settings: &RetrySettings) -> CommonResult<RetryPolicy> {
    RetryPolicy::builder()
        .max_retries(settings.max_retries)
        .initial_delay(Duration::from_millis(settings.initial_delay_ms))
        .backoff_factor(settings.backoff_factor)
        .max_delay(Duration::from_millis(settings.max_delay_ms))
        .retryable_status_codes(settings.retryable_status_codes.iter().copied())
        .jitter_ratio(settings.jitter_ratio)
        .build()
}

#[cfg(test)]
mod tests {
    use namewizard_common::error::CommonError;

    use super::*;

    #[test]
    fn test_default_settings_match_default_policy() {
        let policy = retry_policy_from_settings(&RetrySettings::default()).unwrap();
        assert_eq!(policy, RetryPolicy::default());
    }

    #[test]
    fn test_settings_carried_over() {
        let settings = RetrySettings {
            max_retries: 5,
            initial_delay_ms: 250,
            backoff_factor: 3.0,
            max_delay_ms: 4_000,
            retryable_status_codes: vec![503],
            jitter_ratio: 0.0,
        };

        let policy = retry_policy_from_settings(&settings).unwrap();

        assert_eq!(policy.max_retries(), 5);
        assert_eq!(policy.initial_delay(), Duration::from_millis(250));
        assert_eq!(policy.max_delay(), Duration::from_secs(4));
        assert!(policy.is_retryable_status(503));
        assert!(!policy.is_retryable_status(429));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = RetrySettings { initial_delay_ms: 0, ..RetrySettings::default() };
        let err = retry_policy_from_settings(&settings).unwrap_err();
        assert!(matches!(err, CommonError::Config { .. }));
    }
}
