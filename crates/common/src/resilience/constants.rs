//! Default values and limits for retry policies
use std::time::Duration;

/// Default number of retries after the initial attempt
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay before the first retry
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1000);

/// Default multiplier applied per retry
pub const DEFAULT_BACKOFF_FACTOR: f64 = 2.0;

/// Default upper bound on a single backoff delay
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(30_000);

/// Default jitter ratio (jitter is drawn from `[0, ratio * delay]`)
pub const DEFAULT_JITTER_RATIO: f64 = 0.1;

/// Status codes treated as transient by default
pub const DEFAULT_RETRYABLE_STATUS_CODES: [u16; 6] = [408, 429, 500, 502, 503, 504];

/// Maximum exponent for the backoff calculation to keep the float finite
pub const MAX_BACKOFF_EXPONENT: u32 = 64;
