//! Wait-time estimation.
//!
//! Pure functions mapping a queue position (and an optional
//! reception-quoted override) to an estimated wait in minutes. No I/O;
//! callers must pass the entry's *current* position — nothing is cached.

/// Fixed base added to every computed estimate, in minutes.
pub const BASE_WAIT_MINUTES: i64 = 5;

/// Default minutes of service time assumed per patient ahead.
pub const DEFAULT_MINUTES_PER_PATIENT: i64 = 15;

/// Estimate the wait in minutes for a patient at `position` (1-based).
///
/// A quoted wait from reception always wins, including an explicit quote
/// of zero. Without a quote the estimate is 15 minutes per patient ahead
/// plus a 5-minute base, floored at zero.
#[must_use]
pub fn estimate_wait(position: i64, quoted_minutes: Option<i64>) -> i64 {
    estimate_wait_at_rate(position, quoted_minutes, DEFAULT_MINUTES_PER_PATIENT)
}

/// Estimate the wait using a configurable per-patient rate
/// (the `default_wait_time_minutes` tenant setting).
#[must_use]
pub fn estimate_wait_at_rate(
    position: i64,
    quoted_minutes: Option<i64>,
    minutes_per_patient: i64,
) -> i64 {
    if let Some(quoted) = quoted_minutes {
        return quoted;
    }
    ((position - 1) * minutes_per_patient + BASE_WAIT_MINUTES).max(0)
}

/// Render a minute count for patient-facing messages: `"35 min"` under an
/// hour, `"1h 5m"` otherwise.
#[must_use]
pub fn format_wait(minutes: i64) -> String {
    if minutes < 60 {
        format!("{minutes} min")
    } else {
        let hours = minutes / 60;
        let mins = minutes % 60;
        format!("{hours}h {mins}m")
    }
}
