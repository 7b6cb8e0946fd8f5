//! Exponential backoff for the minor path dwell requirement.

use std::time::Duration;

/// Double `current`, capped at `max`.
pub fn next_dwell(current: Duration, max: Duration) -> Duration {
    current.saturating_mul(2).min(max)
}
