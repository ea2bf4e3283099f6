//! Timestamp utilities

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Convert fractional seconds (media element clock) to a Duration.
///
/// Negative and non-finite inputs clamp to zero; values beyond the
/// `Duration` range saturate.
pub fn secs_to_duration(secs: f64) -> std::time::Duration {
    if !secs.is_finite() || secs <= 0.0 {
        return std::time::Duration::ZERO;
    }
    std::time::Duration::try_from_secs_f64(secs).unwrap_or(std::time::Duration::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
    }

    #[test]
    fn test_secs_to_duration_whole_seconds() {
        assert_eq!(secs_to_duration(2.0), Duration::from_secs(2));
    }

    #[test]
    fn test_secs_to_duration_fractional() {
        assert_eq!(secs_to_duration(0.25), Duration::from_millis(250));
    }

    #[test]
    fn test_secs_to_duration_rejects_garbage() {
        assert_eq!(secs_to_duration(-1.0), Duration::ZERO);
        assert_eq!(secs_to_duration(f64::NAN), Duration::ZERO);
        assert_eq!(secs_to_duration(f64::INFINITY), Duration::ZERO);
    }

    #[test]
    fn test_secs_to_duration_saturates_on_overflow() {
        assert_eq!(secs_to_duration(1e20), Duration::MAX);
        assert_eq!(secs_to_duration(f64::MAX), Duration::MAX);
    }
}
