//! Custom assertions for retry and fallback tests

#![allow(clippy::missing_panics_doc)]

use std::time::Duration;

/// Assert that an error's `Display` output contains a substring
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "runtime")]
/// # {
/// let result: Result<(), String> = Err("all 2 models failed; last error: timeout".to_string());
/// namewizard_common::assert_error_contains!(result, "last error");
/// # }
/// ```
#[macro_export]
macro_rules! assert_error_contains {
    ($result:expr, $substring:expr) => {
        match &$result {
            Ok(_) => panic!("Expected error but got Ok"),
            Err(e) => {
                let error_msg = format!("{}", e);
                assert!(
                    error_msg.contains($substring),
                    "Error message '{}' does not contain '{}'",
                    error_msg,
                    $substring
                );
            }
        }
    };
}

/// Assert that a duration is within tolerance of an expected value
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use namewizard_common::testing::assertions::assert_duration_in_range;
///
/// assert_duration_in_range(
///     Duration::from_millis(105),
///     Duration::from_millis(100),
///     Duration::from_millis(10),
/// );
/// ```
pub fn assert_duration_in_range(actual: Duration, expected: Duration, tolerance: Duration) {
    let min = expected.saturating_sub(tolerance);
    let max = expected + tolerance;

    assert!(
        actual >= min && actual <= max,
        "Duration {:?} not in range [{:?}, {:?}]",
        actual,
        min,
        max
    );
}

/// Assert that `delay` lies in the jitter window `[base, base * (1 + ratio)]`
pub fn assert_delay_within_jitter(delay: Duration, base: Duration, jitter_ratio: f64) {
    let max = base + base.mul_f64(jitter_ratio);

    assert!(
        delay >= base && delay <= max,
        "Delay {:?} outside jitter window [{:?}, {:?}]",
        delay,
        base,
        max
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_duration_in_range_accepts_tolerance() {
        assert_duration_in_range(
            Duration::from_millis(95),
            Duration::from_millis(100),
            Duration::from_millis(5),
        );
    }

    #[test]
    #[should_panic(expected = "not in range")]
    fn test_assert_duration_in_range_rejects_outlier() {
        assert_duration_in_range(
            Duration::from_millis(120),
            Duration::from_millis(100),
            Duration::from_millis(5),
        );
    }

    #[test]
    fn test_assert_delay_within_jitter() {
        assert_delay_within_jitter(Duration::from_millis(1050), Duration::from_secs(1), 0.1);
        assert_delay_within_jitter(Duration::from_millis(1100), Duration::from_secs(1), 0.1);
    }

    #[test]
    #[should_panic(expected = "outside jitter window")]
    fn test_assert_delay_within_jitter_rejects_large_delay() {
        assert_delay_within_jitter(Duration::from_millis(1200), Duration::from_secs(1), 0.1);
    }

    #[test]
    fn test_assert_error_contains_macro() {
        let result: Result<(), String> = Err("Connection timeout occurred".to_string());
        crate::assert_error_contains!(result, "timeout");
    }
}
