//! Wall-clock access behind a trait.
//!
//! Session expiry and daily-stat rollover both compare against the current
//! time; routing every read through [`Clock`] keeps those comparisons
//! deterministic under test.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Local, TimeZone, Utc};

/// The calendar-day format used for daily-stat rollover, e.g. `Mon Aug 03 2026`.
pub const DAY_FORMAT: &str = "%a %b %d %Y";

pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Current instant as epoch milliseconds.
    fn now_ms(&self) -> i64 {
        self.now().timestamp_millis()
    }

    /// Today's calendar day in the reader's timezone, formatted with
    /// [`DAY_FORMAT`].
    fn today(&self) -> String;
}

/// Production clock: real wall clock, local calendar days.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> String {
        Local::now().format(DAY_FORMAT).to_string()
    }
}

/// Manually advanced clock for tests and simulations. Calendar days are
/// derived from the held instant in UTC so rollover is reproducible.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    pub fn at(now_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(now_ms),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: i64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.now_ms.load(Ordering::SeqCst))
            .single()
            .unwrap_or_default()
    }

    fn today(&self) -> String {
        self.now().format(DAY_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::at(1_000);
        assert_eq!(clock.now_ms(), 1_000);
        clock.advance(500);
        assert_eq!(clock.now_ms(), 1_500);
        clock.set(0);
        assert_eq!(clock.now_ms(), 0);
    }

    #[test]
    fn today_changes_across_midnight() {
        // 2026-08-03T23:59:00Z and one minute later.
        let clock = ManualClock::at(1_785_715_140_000);
        let before = clock.today();
        clock.advance(60_000);
        assert_ne!(before, clock.today());
    }

    #[test]
    fn day_format_matches_expected_shape() {
        let clock = ManualClock::at(0);
        assert_eq!(clock.today(), "Thu Jan 01 1970");
    }
}
