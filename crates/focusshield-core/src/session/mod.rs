//! Focus session lifecycle.

mod controller;

pub use controller::{RestoreOutcome, SessionController, SessionSnapshot};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A timed focus interval. Exists in the store only while a session is
/// live; cleared back to null on any end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Epoch milliseconds at start.
    pub start_time: i64,
    /// Planned length in milliseconds.
    pub duration: i64,
    /// Always `start_time + duration`.
    pub end_time: i64,
}

impl Session {
    pub fn new(start_time: i64, duration: i64) -> Self {
        Self {
            start_time,
            duration,
            end_time: start_time + duration,
        }
    }

    /// Milliseconds until expiry, floored at zero.
    pub fn remaining_ms(&self, now_ms: i64) -> i64 {
        (self.end_time - now_ms).max(0)
    }
}

/// The single persisted one-shot timer. Leveled: writing a new deadline
/// replaces any prior one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wakeup {
    /// Epoch milliseconds at which the wake-up fires.
    pub when: i64,
    pub kind: WakeupKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WakeupKind {
    /// Natural session expiry.
    Expiry,
    /// Pending emergency break; the friction delay is running.
    EmergencyBreak,
}

/// Where the session state machine currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionPhase {
    Idle,
    ActiveCounting,
    ActiveExpiring,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EndReason {
    /// The wake-up fired at `endTime`.
    Natural,
    /// The user stopped the session.
    Manual,
    /// The emergency-break delay elapsed.
    EmergencyBreak,
}

impl EndReason {
    pub fn as_str(self) -> &'static str {
        match self {
            EndReason::Natural => "natural",
            EndReason::Manual => "manual",
            EndReason::EmergencyBreak => "emergencyBreak",
        }
    }
}

/// Every externally visible session transition produces an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SessionEvent {
    SessionStarted {
        session: Session,
        at: DateTime<Utc>,
    },
    SessionEnded {
        session: Option<Session>,
        reason: EndReason,
        /// Focus time credited, clamped to the planned duration.
        focus_ms: i64,
        at: DateTime<Utc>,
    },
    /// A session ran to its natural end; surfaces the user-facing
    /// completion notification.
    SessionCompleted {
        session: Option<Session>,
        focus_ms: i64,
        at: DateTime<Utc>,
    },
    BreakPending {
        fires_at: i64,
        at: DateTime<Utc>,
    },
    BreakCancelled {
        at: DateTime<Utc>,
    },
}
