//! Exponential backoff.

use std::time::Duration;

/// Delay after failed attempt `attempt` (1-based): `base * factor^(attempt-1)`, capped at `max`.
pub fn calculate_backoff(attempt: u32, base: Duration, factor: u32, max: Duration) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let multiplier = f64::from(factor).powi(attempt.saturating_sub(1).min(i32::MAX as u32) as i32);
    let secs = base.as_secs_f64() * multiplier;

    if !secs.is_finite() || secs >= max.as_secs_f64() {
        max
    } else {
        Duration::from_secs_f64(secs)
    }
}
