//! General time utility functions

use chrono;

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Convert a duration into a number of seconds, or `None` if overflow
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    duration
        .num_nanoseconds()
        .map(|ns| ns as f64 / NANOS_PER_SECOND as f64)
}

/// Convert a period in seconds into a `std::time::Duration`.
///
/// Negative or non-finite periods map to a zero duration.
pub fn seconds_to_std(period_s: f64) -> std::time::Duration {
    if period_s.is_finite() && period_s > 0.0 {
        std::time::Duration::from_secs_f64(period_s)
    }
    else {
        std::time::Duration::from_secs(0)
    }
}
