//! Well-known store keys. Components coordinate only through these.

pub const BLOCKED_SITES: &str = "blockedSites";
pub const DEFAULT_SESSION_DURATION: &str = "defaultSessionDuration";
pub const IS_ACTIVE: &str = "isActive";
pub const CURRENT_SESSION: &str = "currentSession";
pub const SETTINGS: &str = "settings";
pub const TODAY_STATS: &str = "todayStats";
pub const ALL_TIME_STATS: &str = "allTimeStats";
/// Deadline for the single one-shot wake-up timer.
pub const WAKEUP: &str = "wakeup";
