//! Daily and all-time usage statistics.
//!
//! `todayStats` rolls over lazily: any read that finds a stale date resets
//! the record to zeros under the new date. `allTimeStats` is cumulative
//! and only ever cleared by an explicit user reset.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, DAY_FORMAT};
use crate::error::StoreError;
use crate::store::{keys, Store};

/// Counters for the current calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    #[serde(default)]
    pub focus_time_ms: i64,
    #[serde(default)]
    pub blocked_count: u64,
    #[serde(default)]
    pub session_count: u64,
    #[serde(default)]
    pub emergency_breaks: u64,
    #[serde(default)]
    pub date: String,
}

impl DailyStats {
    /// Zeroed counters under the given calendar day.
    pub fn fresh(date: String) -> Self {
        Self {
            focus_time_ms: 0,
            blocked_count: 0,
            session_count: 0,
            emergency_breaks: 0,
            date,
        }
    }
}

/// Cumulative counters; never auto-reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllTimeStats {
    #[serde(default)]
    pub total_focus_time_ms: i64,
    #[serde(default)]
    pub total_sessions: u64,
    #[serde(default)]
    pub total_blocked: u64,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub best_streak: u32,
    /// Last day that ended a session; drives the streak counters.
    #[serde(default)]
    pub last_active_date: Option<String>,
}

/// Reads and read-modify-writes over the two stat records.
pub struct StatsTracker<'a, S: Store> {
    store: &'a S,
    clock: &'a dyn Clock,
}

impl<'a, S: Store> StatsTracker<'a, S> {
    pub fn new(store: &'a S, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    /// Today's counters. A stale stored date resets the record to zeros
    /// under the new date, discarding prior counts.
    pub fn today(&self) -> Result<DailyStats, StoreError> {
        let today = self.clock.today();
        match self.store.get::<DailyStats>(keys::TODAY_STATS)? {
            Some(stats) if stats.date == today => Ok(stats),
            _ => {
                let fresh = DailyStats::fresh(today);
                self.store.set(keys::TODAY_STATS, &fresh)?;
                Ok(fresh)
            }
        }
    }

    pub fn all_time(&self) -> Result<AllTimeStats, StoreError> {
        Ok(self.store.get(keys::ALL_TIME_STATS)?.unwrap_or_default())
    }

    /// Count a session start.
    pub fn record_session_start(&self) -> Result<(), StoreError> {
        let mut daily = self.today()?;
        daily.session_count += 1;
        self.store.set(keys::TODAY_STATS, &daily)?;

        let mut all = self.all_time()?;
        all.total_sessions += 1;
        self.store.set(keys::ALL_TIME_STATS, &all)
    }

    /// Credit focus time for an ended session and advance the day streak.
    pub fn record_session_end(&self, focus_ms: i64) -> Result<(), StoreError> {
        let mut daily = self.today()?;
        daily.focus_time_ms += focus_ms;
        self.store.set(keys::TODAY_STATS, &daily)?;

        let today = self.clock.today();
        let mut all = self.all_time()?;
        all.total_focus_time_ms += focus_ms;
        self.update_streak(&mut all, &today);
        self.store.set(keys::ALL_TIME_STATS, &all)
    }

    /// Count a blocked navigation. The bump applies only when the stored
    /// date already equals today; otherwise it is silently dropped, with
    /// no rollover. Increments arriving across a day boundary before any
    /// read has rolled the record over are lost.
    pub fn increment_blocked_count(&self) -> Result<bool, StoreError> {
        let today = self.clock.today();
        let Some(mut daily) = self.store.get::<DailyStats>(keys::TODAY_STATS)? else {
            return Ok(false);
        };
        if daily.date != today {
            return Ok(false);
        }
        daily.blocked_count += 1;
        self.store.set(keys::TODAY_STATS, &daily)?;

        let mut all = self.all_time()?;
        all.total_blocked += 1;
        self.store.set(keys::ALL_TIME_STATS, &all)?;
        Ok(true)
    }

    /// Count an emergency break.
    pub fn increment_emergency_breaks(&self) -> Result<(), StoreError> {
        let mut daily = self.today()?;
        daily.emergency_breaks += 1;
        self.store.set(keys::TODAY_STATS, &daily)
    }

    /// Zero both records. Explicit user action only.
    pub fn reset(&self) -> Result<(), StoreError> {
        self.store
            .set(keys::TODAY_STATS, &DailyStats::fresh(self.clock.today()))?;
        self.store.set(keys::ALL_TIME_STATS, &AllTimeStats::default())
    }

    fn update_streak(&self, all: &mut AllTimeStats, today: &str) {
        let parse = |s: &str| NaiveDate::parse_from_str(s, DAY_FORMAT).ok();
        let streak = match all.last_active_date.as_deref() {
            Some(last) if last == today => all.current_streak.max(1),
            Some(last) => match (parse(last), parse(today)) {
                (Some(last_day), Some(today_day))
                    if today_day.pred_opt() == Some(last_day) =>
                {
                    all.current_streak + 1
                }
                _ => 1,
            },
            None => 1,
        };
        all.current_streak = streak;
        all.best_streak = all.best_streak.max(streak);
        all.last_active_date = Some(today.to_string());
    }
}
