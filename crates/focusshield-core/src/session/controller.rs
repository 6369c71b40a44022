//! The session controller.
//!
//! Owns session start/end, the single wake-up deadline, the installed
//! block-rule set, and the message protocol. Operates on wall-clock reads
//! through [`Clock`] with no internal threads; the caller invokes
//! [`SessionController::tick`] periodically and due wake-ups fire there.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{EndReason, Session, SessionEvent, SessionPhase, Wakeup, WakeupKind};
use crate::blocking::{derive_rules, BlockRule, RuleFilter};
use crate::clock::Clock;
use crate::error::{CoreError, FilterError, ValidationError};
use crate::protocol::{Broadcast, Notice, NullBroadcast, NullTabOpener, Request, Response, TabOpener};
use crate::quotes;
use crate::settings::SettingsManager;
use crate::stats::StatsTracker;
use crate::store::{keys, Store};

/// Full session state as seen from the store, for status displays.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    /// True only while the flag is set and `endTime` is still ahead.
    pub is_active: bool,
    pub session: Option<Session>,
    pub remaining_ms: i64,
    pub wakeup: Option<Wakeup>,
}

/// What restart recovery found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RestoreOutcome {
    /// No session was stored.
    Idle,
    /// A live session was found; the wake-up was re-armed.
    Rearmed,
    /// A stored session had already expired and was forced to idle.
    Expired,
}

pub struct SessionController<'a, S: Store> {
    store: &'a S,
    clock: &'a dyn Clock,
    filter: Box<dyn RuleFilter + 'a>,
    broadcast: Box<dyn Broadcast + 'a>,
    opener: Box<dyn TabOpener + 'a>,
    redirect_base: String,
}

impl<'a, S: Store> SessionController<'a, S> {
    pub fn new(store: &'a S, clock: &'a dyn Clock, filter: Box<dyn RuleFilter + 'a>) -> Self {
        Self {
            store,
            clock,
            filter,
            broadcast: Box::new(NullBroadcast),
            opener: Box::new(NullTabOpener),
            redirect_base: "focusshield:blocked".to_string(),
        }
    }

    pub fn with_broadcast(mut self, broadcast: Box<dyn Broadcast + 'a>) -> Self {
        self.broadcast = broadcast;
        self
    }

    pub fn with_opener(mut self, opener: Box<dyn TabOpener + 'a>) -> Self {
        self.opener = opener;
        self
    }

    pub fn with_redirect_base(mut self, redirect_base: impl Into<String>) -> Self {
        self.redirect_base = redirect_base.into();
        self
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a focus session. A session already running is replaced, the
    /// same way re-arming the wake-up replaces its deadline.
    pub fn start_session(&mut self, duration_min: u32) -> Result<SessionEvent, CoreError> {
        if duration_min == 0 {
            return Err(ValidationError::InvalidValue {
                field: "durationMinutes".into(),
                message: "must be at least 1".into(),
            }
            .into());
        }

        let now = self.clock.now_ms();
        let session = Session::new(now, i64::from(duration_min) * 60_000);
        let wakeup = Wakeup {
            when: session.end_time,
            kind: WakeupKind::Expiry,
        };
        self.store.set_many(&[
            (keys::IS_ACTIVE, serde_json::to_string(&true)?),
            (keys::CURRENT_SESSION, serde_json::to_string(&session)?),
            (keys::WAKEUP, serde_json::to_string(&wakeup)?),
        ])?;

        let sites = SettingsManager::new(self.store).blocked_sites()?;
        self.start_blocking(&sites)?;

        StatsTracker::new(self.store, self.clock).record_session_start()?;
        self.notify(Notice::SessionStarted);

        tracing::info!(duration_min, "focus session started");
        Ok(SessionEvent::SessionStarted {
            session,
            at: self.now(),
        })
    }

    /// End the current session. Idempotent: with nothing to end this is a
    /// no-op returning `None`, with no error and no counter changes.
    pub fn end_session(&mut self, reason: EndReason) -> Result<Option<SessionEvent>, CoreError> {
        let active: bool = self.store.get(keys::IS_ACTIVE)?.unwrap_or(false);
        let session = self.current_session()?;
        if !active && session.is_none() {
            return Ok(None);
        }

        let focus_ms = session
            .map(|s| (self.clock.now_ms() - s.start_time).clamp(0, s.duration))
            .unwrap_or(0);

        self.store.set_many(&[
            (keys::IS_ACTIVE, serde_json::to_string(&false)?),
            (keys::CURRENT_SESSION, "null".to_string()),
            (keys::WAKEUP, "null".to_string()),
        ])?;
        self.stop_blocking()?;

        let stats = StatsTracker::new(self.store, self.clock);
        stats.record_session_end(focus_ms)?;
        if reason == EndReason::EmergencyBreak {
            stats.increment_emergency_breaks()?;
        }

        self.notify(Notice::SessionEnded);
        tracing::info!(reason = reason.as_str(), focus_ms, "focus session ended");
        Ok(Some(SessionEvent::SessionEnded {
            session,
            reason,
            focus_ms,
            at: self.now(),
        }))
    }

    /// Arm the emergency-break friction delay. The session keeps running
    /// until the delay elapses; [`SessionController::tick`] performs the
    /// actual stop.
    pub fn request_emergency_break(&mut self) -> Result<SessionEvent, CoreError> {
        let active: bool = self.store.get(keys::IS_ACTIVE)?.unwrap_or(false);
        if !active || self.current_session()?.is_none() {
            return Err(ValidationError::InvalidValue {
                field: "session".into(),
                message: "no active session to break".into(),
            }
            .into());
        }

        let delay_s = SettingsManager::new(self.store).load()?.emergency_break_delay;
        let fires_at = self.clock.now_ms() + i64::from(delay_s) * 1_000;
        self.store.set(
            keys::WAKEUP,
            &Wakeup {
                when: fires_at,
                kind: WakeupKind::EmergencyBreak,
            },
        )?;
        Ok(SessionEvent::BreakPending {
            fires_at,
            at: self.now(),
        })
    }

    /// Withdraw a pending emergency break, re-arming expiry from the
    /// stored `endTime`. Returns `None` when no break is pending.
    pub fn cancel_emergency_break(&mut self) -> Result<Option<SessionEvent>, CoreError> {
        let pending = matches!(
            self.wakeup()?,
            Some(Wakeup {
                kind: WakeupKind::EmergencyBreak,
                ..
            })
        );
        let Some(session) = self.current_session()? else {
            return Ok(None);
        };
        if !pending {
            return Ok(None);
        }
        self.store.set(
            keys::WAKEUP,
            &Wakeup {
                when: session.end_time,
                kind: WakeupKind::Expiry,
            },
        )?;
        Ok(Some(SessionEvent::BreakCancelled { at: self.now() }))
    }

    /// Fire the wake-up if its deadline has passed. Call periodically.
    pub fn tick(&mut self) -> Result<Option<SessionEvent>, CoreError> {
        let Some(wakeup) = self.wakeup()? else {
            return Ok(None);
        };
        if self.clock.now_ms() < wakeup.when {
            return Ok(None);
        }

        match wakeup.kind {
            WakeupKind::Expiry => match self.end_session(EndReason::Natural)? {
                Some(SessionEvent::SessionEnded {
                    session, focus_ms, ..
                }) => Ok(Some(SessionEvent::SessionCompleted {
                    session,
                    focus_ms,
                    at: self.now(),
                })),
                _ => {
                    // Orphaned deadline with no session behind it.
                    self.store.set(keys::WAKEUP, &serde_json::Value::Null)?;
                    Ok(None)
                }
            },
            WakeupKind::EmergencyBreak => {
                let ended = self.end_session(EndReason::EmergencyBreak)?;
                if ended.is_none() {
                    self.store.set(keys::WAKEUP, &serde_json::Value::Null)?;
                }
                Ok(ended)
            }
        }
    }

    /// Restart recovery: re-arm a live session's wake-up, or force an
    /// expired one to idle. Installed rules persist natively and are
    /// re-derived on the next start, not here.
    pub fn restore(&mut self) -> Result<RestoreOutcome, CoreError> {
        let active: bool = self.store.get(keys::IS_ACTIVE)?.unwrap_or(false);
        let session = self.current_session()?;

        match session {
            Some(session) if active => {
                if self.clock.now_ms() < session.end_time {
                    self.store.set(
                        keys::WAKEUP,
                        &Wakeup {
                            when: session.end_time,
                            kind: WakeupKind::Expiry,
                        },
                    )?;
                    Ok(RestoreOutcome::Rearmed)
                } else {
                    self.end_session(EndReason::Natural)?;
                    Ok(RestoreOutcome::Expired)
                }
            }
            _ => {
                if self.wakeup()?.is_some() {
                    self.store.set(keys::WAKEUP, &serde_json::Value::Null)?;
                }
                Ok(RestoreOutcome::Idle)
            }
        }
    }

    /// Install rules for the given hosts, replacing any installed set.
    pub fn start_blocking(&mut self, sites: &[String]) -> Result<(), FilterError> {
        self.filter
            .replace_all(&derive_rules(sites, &self.redirect_base))
    }

    /// Remove all installed rules.
    pub fn stop_blocking(&mut self) -> Result<(), FilterError> {
        self.filter.clear()
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Whether navigating to `url` should be blocked right now. Fails
    /// closed to "not blocked": store errors, a missing list, an inactive
    /// session and malformed URLs all answer `false`.
    pub fn is_url_blocked(&self, url: &str) -> bool {
        crate::blocking::check_url_blocked(self.store, url)
    }

    /// Per-navigation hook: counts a blocked hit (subject to the stored
    /// stat date matching today) and reports the verdict.
    pub fn on_navigation(&mut self, url: &str) -> Result<bool, CoreError> {
        let active: bool = self.store.get(keys::IS_ACTIVE)?.unwrap_or(false);
        if !active {
            return Ok(false);
        }
        let blocked = self.is_url_blocked(url);
        if blocked {
            StatsTracker::new(self.store, self.clock).increment_blocked_count()?;
        }
        Ok(blocked)
    }

    pub fn phase(&self) -> SessionPhase {
        let Ok(snapshot) = self.try_snapshot() else {
            return SessionPhase::Idle;
        };
        snapshot.phase
    }

    /// Current state, with failures degraded to an idle snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.try_snapshot().unwrap_or(SessionSnapshot {
            phase: SessionPhase::Idle,
            is_active: false,
            session: None,
            remaining_ms: 0,
            wakeup: None,
        })
    }

    fn try_snapshot(&self) -> Result<SessionSnapshot, CoreError> {
        let flag: bool = self.store.get(keys::IS_ACTIVE)?.unwrap_or(false);
        let session = self.current_session()?;
        let wakeup = self.wakeup()?;
        let now = self.clock.now_ms();

        let is_active = flag && session.map(|s| now < s.end_time).unwrap_or(false);
        let phase = if !is_active {
            SessionPhase::Idle
        } else if matches!(
            wakeup,
            Some(Wakeup {
                kind: WakeupKind::EmergencyBreak,
                ..
            })
        ) {
            SessionPhase::ActiveExpiring
        } else {
            SessionPhase::ActiveCounting
        };

        Ok(SessionSnapshot {
            phase,
            is_active,
            session,
            remaining_ms: session.map(|s| s.remaining_ms(now)).unwrap_or(0),
            wakeup,
        })
    }

    /// Currently installed block rules, for status displays.
    pub fn installed_rules(&self) -> Result<Vec<BlockRule>, FilterError> {
        self.filter.installed()
    }

    // ── Message protocol ─────────────────────────────────────────────

    /// Dispatch one request. Every variant answers; failures become an
    /// error payload for the caller, never a panic and never a retry.
    pub fn handle(&mut self, request: Request) -> Response {
        match request {
            Request::StartBlocking { sites } => match self.start_blocking(&sites) {
                Ok(()) => Response::ok(),
                Err(e) => Response::error(e.to_string()),
            },
            Request::StopBlocking => match self.stop_blocking() {
                Ok(()) => Response::ok(),
                Err(e) => Response::error(e.to_string()),
            },
            Request::CheckIfBlocked { url } => Response::Blocked {
                blocked: self.is_url_blocked(&url),
            },
            Request::IncrementBlockedCount => {
                match StatsTracker::new(self.store, self.clock).increment_blocked_count() {
                    // Dropped increments still acknowledge; the caller
                    // cannot act on the distinction.
                    Ok(_) => Response::ok(),
                    Err(e) => Response::error(e.to_string()),
                }
            }
            Request::GetMotivationalQuote => Response::Quote {
                quote: quotes::random_quote().to_string(),
            },
            Request::OpenNewTab => match self.opener.open_new_tab() {
                Ok(()) => Response::ok(),
                Err(e) => Response::error(e.to_string()),
            },
            Request::SettingsUpdated { .. } => {
                tracing::debug!("settings updated");
                Response::ok()
            }
        }
    }

    /// Parse and dispatch a raw JSON request. An unparseable or unknown
    /// action gets an explicit error payload.
    pub fn handle_json(&mut self, raw: &str) -> Response {
        match serde_json::from_str::<Request>(raw) {
            Ok(request) => self.handle(request),
            Err(_) => Response::error("Unknown action"),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn current_session(&self) -> Result<Option<Session>, CoreError> {
        Ok(self
            .store
            .get::<Option<Session>>(keys::CURRENT_SESSION)?
            .flatten())
    }

    fn wakeup(&self) -> Result<Option<Wakeup>, CoreError> {
        Ok(self.store.get::<Option<Wakeup>>(keys::WAKEUP)?.flatten())
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Best-effort broadcast; a missing listener is not an error.
    fn notify(&mut self, notice: Notice) {
        if let Err(e) = self.broadcast.send(notice) {
            tracing::debug!(?notice, "notice not delivered: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::blocking::MemoryRuleFilter;
    use crate::clock::ManualClock;
    use crate::settings::Settings;
    use crate::stats::DailyStats;
    use crate::store::Database;

    struct SharedBroadcast(Rc<RefCell<Vec<Notice>>>);

    impl Broadcast for SharedBroadcast {
        fn send(&mut self, notice: Notice) -> Result<(), CoreError> {
            self.0.borrow_mut().push(notice);
            Ok(())
        }
    }

    struct FailingBroadcast;

    impl Broadcast for FailingBroadcast {
        fn send(&mut self, _notice: Notice) -> Result<(), CoreError> {
            Err(CoreError::Custom("no listener".into()))
        }
    }

    fn setup<'a>(db: &'a Database, clock: &'a ManualClock) -> SessionController<'a, Database> {
        crate::store::initialize(db, clock).unwrap();
        SessionController::new(db, clock, Box::new(MemoryRuleFilter::new(100)))
    }

    fn setup_with_notices<'a>(
        db: &'a Database,
        clock: &'a ManualClock,
        notices: Rc<RefCell<Vec<Notice>>>,
    ) -> SessionController<'a, Database> {
        crate::store::initialize(db, clock).unwrap();
        SessionController::new(db, clock, Box::new(MemoryRuleFilter::new(100)))
            .with_broadcast(Box::new(SharedBroadcast(notices)))
    }

    #[test]
    fn start_sets_exact_end_time_and_active_flag() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::at(1_000_000);
        let mut controller = setup(&db, &clock);

        controller.start_session(25).unwrap();

        let session: Session = db
            .get::<Option<Session>>(keys::CURRENT_SESSION)
            .unwrap()
            .flatten()
            .unwrap();
        assert_eq!(session.end_time - session.start_time, 25 * 60_000);
        assert_eq!(session.start_time, 1_000_000);
        assert!(db.get::<bool>(keys::IS_ACTIVE).unwrap().unwrap());
        assert_eq!(controller.phase(), SessionPhase::ActiveCounting);
    }

    #[test]
    fn start_installs_one_rule_per_blocked_site() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::at(0);
        let mut controller = setup(&db, &clock);
        db.set(keys::BLOCKED_SITES, &vec!["a.com".to_string(), "b.com".to_string()])
            .unwrap();

        controller.start_session(5).unwrap();

        let rules = controller.installed_rules().unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].hostname, "a.com");
        assert_eq!(rules[0].id, 1);
    }

    #[test]
    fn start_rejects_zero_duration() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::at(0);
        let mut controller = setup(&db, &clock);
        assert!(controller.start_session(0).is_err());
    }

    #[test]
    fn end_session_is_idempotent() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::at(0);
        let mut controller = setup(&db, &clock);
        controller.start_session(25).unwrap();

        assert!(controller.end_session(EndReason::Manual).unwrap().is_some());
        let before: DailyStats = db.get(keys::TODAY_STATS).unwrap().unwrap();

        // Second call: no event, no error, no counter movement.
        assert!(controller.end_session(EndReason::Manual).unwrap().is_none());
        let after: DailyStats = db.get(keys::TODAY_STATS).unwrap().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn end_clears_state_rules_and_wakeup() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::at(0);
        let mut controller = setup(&db, &clock);
        controller.start_session(25).unwrap();

        controller.end_session(EndReason::Manual).unwrap();

        assert!(!db.get::<bool>(keys::IS_ACTIVE).unwrap().unwrap());
        assert!(db
            .get::<Option<Session>>(keys::CURRENT_SESSION)
            .unwrap()
            .flatten()
            .is_none());
        assert!(db
            .get::<Option<Wakeup>>(keys::WAKEUP)
            .unwrap()
            .flatten()
            .is_none());
        assert!(controller.installed_rules().unwrap().is_empty());
    }

    #[test]
    fn end_credits_elapsed_focus_time_clamped() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::at(0);
        let mut controller = setup(&db, &clock);
        controller.start_session(25).unwrap();
        clock.advance(10 * 60_000);

        let event = controller.end_session(EndReason::Manual).unwrap().unwrap();
        match event {
            SessionEvent::SessionEnded { focus_ms, .. } => assert_eq!(focus_ms, 10 * 60_000),
            other => panic!("expected SessionEnded, got {other:?}"),
        }

        // Ending long after expiry never credits more than planned.
        controller.start_session(5).unwrap();
        clock.advance(60 * 60_000);
        let event = controller.end_session(EndReason::Manual).unwrap().unwrap();
        match event {
            SessionEvent::SessionEnded { focus_ms, .. } => assert_eq!(focus_ms, 5 * 60_000),
            other => panic!("expected SessionEnded, got {other:?}"),
        }
    }

    #[test]
    fn broadcasts_are_sent_on_start_and_end() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::at(0);
        let notices = Rc::new(RefCell::new(Vec::new()));
        let mut controller = setup_with_notices(&db, &clock, notices.clone());

        controller.start_session(25).unwrap();
        controller.end_session(EndReason::Manual).unwrap();

        assert_eq!(
            *notices.borrow(),
            vec![Notice::SessionStarted, Notice::SessionEnded]
        );
    }

    #[test]
    fn broadcast_failure_is_swallowed() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::at(0);
        crate::store::initialize(&db, &clock).unwrap();
        let mut controller =
            SessionController::new(&db, &clock, Box::new(MemoryRuleFilter::new(100)))
                .with_broadcast(Box::new(FailingBroadcast));

        controller.start_session(25).unwrap();
        assert!(controller.end_session(EndReason::Manual).unwrap().is_some());
    }

    #[test]
    fn tick_fires_completion_at_end_time() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::at(0);
        let mut controller = setup(&db, &clock);
        controller.start_session(25).unwrap();

        clock.advance(25 * 60_000 - 1);
        assert!(controller.tick().unwrap().is_none());

        clock.advance(1);
        let event = controller.tick().unwrap().unwrap();
        assert!(matches!(event, SessionEvent::SessionCompleted { .. }));
        assert_eq!(controller.phase(), SessionPhase::Idle);

        // Wake-up is one-shot.
        assert!(controller.tick().unwrap().is_none());
    }

    #[test]
    fn restore_rearms_a_live_session() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::at(0);
        let mut controller = setup(&db, &clock);
        controller.start_session(25).unwrap();
        // Simulate a restart losing the armed deadline.
        db.set(keys::WAKEUP, &serde_json::Value::Null).unwrap();

        clock.advance(60_000);
        assert_eq!(controller.restore().unwrap(), RestoreOutcome::Rearmed);
        let wakeup = db
            .get::<Option<Wakeup>>(keys::WAKEUP)
            .unwrap()
            .flatten()
            .unwrap();
        assert_eq!(wakeup.when, 25 * 60_000);
        assert_eq!(wakeup.kind, WakeupKind::Expiry);
    }

    #[test]
    fn restore_forces_an_expired_session_to_idle() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::at(0);
        let mut controller = setup(&db, &clock);
        controller.start_session(25).unwrap();

        clock.advance(26 * 60_000);
        assert_eq!(controller.restore().unwrap(), RestoreOutcome::Expired);
        assert!(!db.get::<bool>(keys::IS_ACTIVE).unwrap().unwrap());
        assert!(db
            .get::<Option<Session>>(keys::CURRENT_SESSION)
            .unwrap()
            .flatten()
            .is_none());
        // No timer re-armed.
        assert!(db
            .get::<Option<Wakeup>>(keys::WAKEUP)
            .unwrap()
            .flatten()
            .is_none());
    }

    #[test]
    fn restore_with_no_session_is_idle() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::at(0);
        let mut controller = setup(&db, &clock);
        assert_eq!(controller.restore().unwrap(), RestoreOutcome::Idle);
    }

    #[test]
    fn emergency_break_waits_for_the_delay() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::at(0);
        let mut controller = setup(&db, &clock);
        controller.start_session(25).unwrap();

        let event = controller.request_emergency_break().unwrap();
        match event {
            SessionEvent::BreakPending { fires_at, .. } => assert_eq!(fires_at, 10_000),
            other => panic!("expected BreakPending, got {other:?}"),
        }
        assert_eq!(controller.phase(), SessionPhase::ActiveExpiring);

        // Still counting until the delay elapses.
        clock.advance(9_999);
        assert!(controller.tick().unwrap().is_none());

        clock.advance(1);
        let event = controller.tick().unwrap().unwrap();
        match event {
            SessionEvent::SessionEnded { reason, .. } => {
                assert_eq!(reason, EndReason::EmergencyBreak);
            }
            other => panic!("expected SessionEnded, got {other:?}"),
        }
        let stats: DailyStats = db.get(keys::TODAY_STATS).unwrap().unwrap();
        assert_eq!(stats.emergency_breaks, 1);
    }

    #[test]
    fn emergency_break_can_be_cancelled() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::at(0);
        let mut controller = setup(&db, &clock);
        controller.start_session(25).unwrap();
        controller.request_emergency_break().unwrap();

        assert!(controller.cancel_emergency_break().unwrap().is_some());
        assert_eq!(controller.phase(), SessionPhase::ActiveCounting);

        // The break deadline passing no longer ends the session.
        clock.advance(11_000);
        assert!(controller.tick().unwrap().is_none());

        // Expiry fires at the original end time.
        clock.set(25 * 60_000);
        assert!(matches!(
            controller.tick().unwrap().unwrap(),
            SessionEvent::SessionCompleted { .. }
        ));
    }

    #[test]
    fn emergency_break_requires_an_active_session() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::at(0);
        let mut controller = setup(&db, &clock);
        assert!(controller.request_emergency_break().is_err());
        assert!(controller.cancel_emergency_break().unwrap().is_none());
    }

    #[test]
    fn blocked_query_fails_closed_when_idle() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::at(0);
        let controller = setup(&db, &clock);
        assert!(!controller.is_url_blocked("https://facebook.com/"));
    }

    #[test]
    fn blocked_query_fails_closed_on_malformed_url() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::at(0);
        let mut controller = setup(&db, &clock);
        controller.start_session(25).unwrap();
        assert!(!controller.is_url_blocked("definitely not a url"));
    }

    #[test]
    fn blocked_query_matches_while_active() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::at(0);
        let mut controller = setup(&db, &clock);
        controller.start_session(25).unwrap();

        assert!(controller.is_url_blocked("https://www.facebook.com/feed"));
        assert!(controller.is_url_blocked("https://mail.facebook.com/"));
        assert!(!controller.is_url_blocked("https://notfacebook.com/"));
        assert!(!controller.is_url_blocked("https://example.org/"));
    }

    #[test]
    fn navigation_hook_counts_blocked_hits() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::at(0);
        let mut controller = setup(&db, &clock);
        controller.start_session(25).unwrap();

        assert!(controller.on_navigation("https://facebook.com/").unwrap());
        assert!(!controller.on_navigation("https://example.org/").unwrap());

        let stats: DailyStats = db.get(keys::TODAY_STATS).unwrap().unwrap();
        assert_eq!(stats.blocked_count, 1);
    }

    #[test]
    fn navigation_hook_is_inert_when_idle() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::at(0);
        let mut controller = setup(&db, &clock);
        assert!(!controller.on_navigation("https://facebook.com/").unwrap());
    }

    #[test]
    fn protocol_round_trips() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::at(0);
        let mut controller = setup(&db, &clock);
        controller.start_session(25).unwrap();

        let response = controller.handle_json(
            r#"{"action": "checkIfBlocked", "url": "https://www.reddit.com/r/rust"}"#,
        );
        assert_eq!(response, Response::Blocked { blocked: true });

        let response = controller.handle(Request::GetMotivationalQuote);
        assert!(matches!(response, Response::Quote { .. }));

        let response = controller.handle(Request::StopBlocking);
        assert_eq!(response, Response::ok());
        assert!(controller.installed_rules().unwrap().is_empty());

        let response = controller.handle(Request::StartBlocking {
            sites: vec!["news.com".into()],
        });
        assert_eq!(response, Response::ok());
        assert_eq!(controller.installed_rules().unwrap().len(), 1);
    }

    #[test]
    fn unknown_action_gets_an_error_payload() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::at(0);
        let mut controller = setup(&db, &clock);

        let response = controller.handle_json(r#"{"action": "flyToTheMoon"}"#);
        assert_eq!(response, Response::error("Unknown action"));
        let response = controller.handle_json("{garbage");
        assert_eq!(response, Response::error("Unknown action"));
    }

    #[test]
    fn settings_updated_is_acknowledged_only() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::at(0);
        let mut controller = setup(&db, &clock);

        let response = controller.handle(Request::SettingsUpdated {
            settings: Settings::default(),
            blocked_sites: vec!["a.com".into()],
        });
        assert_eq!(response, Response::ok());
        // Informational only: the stored list is untouched.
        let sites: Vec<String> = db.get(keys::BLOCKED_SITES).unwrap().unwrap();
        assert_ne!(sites, vec!["a.com".to_string()]);
    }

    #[test]
    fn snapshot_reports_remaining_time() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::at(0);
        let mut controller = setup(&db, &clock);
        controller.start_session(25).unwrap();
        clock.advance(5 * 60_000);

        let snapshot = controller.snapshot();
        assert!(snapshot.is_active);
        assert_eq!(snapshot.remaining_ms, 20 * 60_000);
    }

    #[test]
    fn expired_but_unticked_session_reads_as_idle() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::at(0);
        let mut controller = setup(&db, &clock);
        controller.start_session(25).unwrap();
        clock.advance(30 * 60_000);

        // The flag is still set but endTime has passed.
        let snapshot = controller.snapshot();
        assert!(!snapshot.is_active);
        assert_eq!(snapshot.phase, SessionPhase::Idle);
        assert_eq!(snapshot.remaining_ms, 0);
    }
}
