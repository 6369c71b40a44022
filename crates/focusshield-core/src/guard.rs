//! Per-page guard lifecycle.
//!
//! One guard exists per loaded page. It checks the page's URL on load,
//! re-checks after client-side route changes with a short debounce (so an
//! in-flight URL is not checked while still stale), and reacts to session
//! broadcasts without a full round trip. Rendering is out of scope; the
//! guard produces view models only.

use serde::Serialize;

use crate::blocking::check_url_blocked;
use crate::clock::Clock;
use crate::protocol::Notice;
use crate::quotes;
use crate::session::Session;
use crate::settings::SettingsManager;
use crate::store::{keys, Store};

/// Delay between a detected URL change and the re-check.
pub const RECHECK_DEBOUNCE_MS: i64 = 100;

/// What the page should currently show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GuardView {
    /// Full-page block overlay with a live countdown.
    Overlay {
        remaining: String,
        quote: Option<String>,
    },
    /// Small status badge.
    Badge { status: String },
    Hidden,
}

pub struct PageGuard<'a, S: Store> {
    store: &'a S,
    clock: &'a dyn Clock,
    url: String,
    blocked: bool,
    overlay_quote: Option<String>,
    /// Deadline for a debounced re-check, epoch ms.
    pending_check_at: Option<i64>,
}

impl<'a, S: Store> PageGuard<'a, S> {
    /// Guard for a freshly loaded page; runs the block check immediately.
    pub fn on_load(store: &'a S, clock: &'a dyn Clock, url: impl Into<String>) -> Self {
        let mut guard = Self {
            store,
            clock,
            url: url.into(),
            blocked: false,
            overlay_quote: None,
            pending_check_at: None,
        };
        guard.run_check();
        guard
    }

    /// Client-side navigation (SPA route change, back/forward). The check
    /// runs after [`RECHECK_DEBOUNCE_MS`]; a newer change supersedes a
    /// pending one.
    pub fn on_url_change(&mut self, url: impl Into<String>) {
        self.url = url.into();
        self.pending_check_at = Some(self.clock.now_ms() + RECHECK_DEBOUNCE_MS);
    }

    /// Session broadcasts toggle the overlay/badge without a round trip.
    pub fn on_notice(&mut self, notice: Notice) {
        match notice {
            Notice::SessionStarted => {}
            Notice::SessionEnded => {
                self.blocked = false;
                self.overlay_quote = None;
            }
            Notice::CheckBlock => self.run_check(),
        }
    }

    /// Run a due debounced check. Returns the refreshed view when a check
    /// ran, `None` otherwise.
    pub fn poll(&mut self) -> Option<GuardView> {
        let due = self.pending_check_at?;
        if self.clock.now_ms() < due {
            return None;
        }
        self.pending_check_at = None;
        self.run_check();
        Some(self.view())
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Current view model. The countdown is recomputed from the stored
    /// `endTime` on every call, never from a locally ticking clock.
    pub fn view(&self) -> GuardView {
        let settings = SettingsManager::new(self.store).load().unwrap_or_default();

        if self.blocked {
            let remaining = self
                .session()
                .map(|s| s.remaining_ms(self.clock.now_ms()))
                .unwrap_or(0);
            return GuardView::Overlay {
                remaining: format_countdown(remaining),
                quote: self.overlay_quote.clone(),
            };
        }

        if !settings.show_focus_reminder {
            return GuardView::Hidden;
        }
        let status = match self.active_session() {
            Some(session) => {
                let minutes = session.remaining_ms(self.clock.now_ms()) / 60_000;
                format!("{minutes}m left")
            }
            None => "Ready".to_string(),
        };
        GuardView::Badge { status }
    }

    fn run_check(&mut self) {
        let was_blocked = self.blocked;
        self.blocked = check_url_blocked(self.store, &self.url);
        if self.blocked && !was_blocked {
            let settings = SettingsManager::new(self.store).load().unwrap_or_default();
            self.overlay_quote = settings
                .enable_motivational_quotes
                .then(|| quotes::random_quote().to_string());
        } else if !self.blocked {
            self.overlay_quote = None;
        }
    }

    fn session(&self) -> Option<Session> {
        self.store
            .get::<Option<Session>>(keys::CURRENT_SESSION)
            .ok()
            .flatten()
            .flatten()
    }

    fn active_session(&self) -> Option<Session> {
        let active = self
            .store
            .get::<bool>(keys::IS_ACTIVE)
            .ok()
            .flatten()
            .unwrap_or(false);
        if !active {
            return None;
        }
        self.session()
    }
}

fn format_countdown(remaining_ms: i64) -> String {
    let remaining_ms = remaining_ms.max(0);
    let minutes = remaining_ms / 60_000;
    let seconds = (remaining_ms % 60_000) / 1_000;
    format!("{minutes}:{seconds:02} remaining")
}
