//! # Focus Shield Core Library
//!
//! This library provides the core logic for Focus Shield, a timed
//! site-blocking focus tool. It implements a CLI-first philosophy where
//! every operation is available via a standalone CLI binary; any GUI is a
//! thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Session Controller**: wall-clock-based session lifecycle that
//!   requires the caller to periodically invoke `tick()` so the single
//!   wake-up deadline can fire
//! - **Store**: SQLite-backed key-value store shared by every component,
//!   plus TOML-based host configuration
//! - **Blocking**: hostname matching and the installed block-rule set
//! - **Page Guard**: per-page block check, debounced SPA re-checks, and
//!   overlay/badge view models
//!
//! ## Key Components
//!
//! - [`SessionController`]: session start/end, wake-up handling, message
//!   protocol dispatch
//! - [`Database`]: key-value store and session history persistence
//! - [`SettingsManager`]: settings record and block-list CRUD
//! - [`PageGuard`]: per-page lifecycle glue

pub mod blocking;
pub mod clock;
pub mod error;
pub mod guard;
pub mod protocol;
pub mod quotes;
pub mod session;
pub mod settings;
pub mod stats;
pub mod store;

pub use blocking::{BlockRule, MemoryRuleFilter, RuleFilter, SqliteRuleFilter};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, FilterError, ImportError, StoreError, ValidationError};
pub use guard::{GuardView, PageGuard};
pub use protocol::{Broadcast, Notice, Request, Response, TabOpener};
pub use session::{
    EndReason, RestoreOutcome, Session, SessionController, SessionEvent, SessionPhase,
    SessionSnapshot, Wakeup, WakeupKind,
};
pub use settings::{PresetCategory, Settings, SettingsManager};
pub use stats::{AllTimeStats, DailyStats, StatsTracker};
pub use store::{Config, Database, Store};
