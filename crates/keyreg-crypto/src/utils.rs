//! Common utility functions.

use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current Unix timestamp in milliseconds.
///
/// A clock set before the Unix epoch yields 0.
pub fn current_timestamp_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_timestamp_millis() {
        let ts1 = current_timestamp_millis();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let ts2 = current_timestamp_millis();

        assert!(ts2 > ts1, "Timestamp should increase with time");
        assert!(
            ts1 > 1_600_000_000_000,
            "Timestamp should be reasonable (after Sep 2020)"
        );
    }
}
