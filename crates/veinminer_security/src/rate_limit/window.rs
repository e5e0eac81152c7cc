//! Window arithmetic for the limiter.

use veinminer_core::Millis;

/// Length of the short window.
pub const MINUTE_MS: Millis = 60_000;

/// Length of the daily window.
pub const DAY_MS: Millis = 86_400_000;

/// Start of the day window containing `now`.
///
/// Days begin `offset_ms` past midnight UTC. Times before the first
/// boundary fall into the window starting at 0.
#[must_use]
pub fn day_start(now: Millis, offset_ms: Millis) -> Millis {
    let offset = offset_ms % DAY_MS;
    if now < offset {
        return 0;
    }
    offset + (now - offset) / DAY_MS * DAY_MS
}

/// First instant of the next day window.
#[must_use]
pub fn next_day_start(now: Millis, offset_ms: Millis) -> Millis {
    let offset = offset_ms % DAY_MS;
    if now < offset {
        return offset;
    }
    day_start(now, offset_ms) + DAY_MS
}

/// True once the minute window opened at `start` has elapsed.
#[must_use]
pub fn minute_elapsed(start: Millis, now: Millis) -> bool {
    now >= start.saturating_add(MINUTE_MS)
}
