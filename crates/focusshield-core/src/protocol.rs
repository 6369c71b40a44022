//! One-shot message protocol between components.
//!
//! Requests and responses are JSON-shaped; the `action` tag selects the
//! variant. Unknown actions produce an explicit error payload instead of
//! being dropped. Notices are fire-and-forget broadcasts; a missing or
//! failing listener is never an error for the sender.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::settings::Settings;

/// A request to the session controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    /// Install block rules for the given hosts.
    StartBlocking { sites: Vec<String> },
    /// Remove all installed block rules.
    StopBlocking,
    /// Query whether a URL is currently blocked.
    CheckIfBlocked { url: String },
    /// Bump today's blocked counter, if the stored date matches.
    IncrementBlockedCount,
    /// Pick one of the fixed quotes at random.
    GetMotivationalQuote,
    /// Open a neutral browser tab.
    OpenNewTab,
    /// Informational only; acknowledged and otherwise ignored.
    #[serde(rename_all = "camelCase")]
    SettingsUpdated {
        settings: Settings,
        blocked_sites: Vec<String>,
    },
}

/// Response payloads, shaped like the bare objects listeners expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Success { success: bool },
    Blocked { blocked: bool },
    Quote { quote: String },
    Error { error: String },
}

impl Response {
    pub fn ok() -> Self {
        Response::Success { success: true }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Response::Error {
            error: message.into(),
        }
    }
}

/// Fire-and-forget notification to listening UIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Notice {
    SessionStarted,
    SessionEnded,
    /// Ask page guards to re-run their block check.
    CheckBlock,
}

/// Broadcast sink for notices. Senders swallow delivery failures.
pub trait Broadcast {
    fn send(&mut self, notice: Notice) -> Result<(), CoreError>;
}

/// Sink with no listener attached; every send quietly succeeds.
#[derive(Debug, Default)]
pub struct NullBroadcast;

impl Broadcast for NullBroadcast {
    fn send(&mut self, _notice: Notice) -> Result<(), CoreError> {
        Ok(())
    }
}

/// Opens a neutral browser tab.
pub trait TabOpener {
    fn open_new_tab(&self) -> Result<(), CoreError>;
}

/// Desktop opener: hands the URL to the default browser.
#[derive(Debug)]
pub struct SystemTabOpener {
    url: String,
}

impl SystemTabOpener {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl TabOpener for SystemTabOpener {
    fn open_new_tab(&self) -> Result<(), CoreError> {
        open::that_detached(&self.url)?;
        Ok(())
    }
}

/// Opener that does nothing; for tests and headless hosts.
#[derive(Debug, Default)]
pub struct NullTabOpener;

impl TabOpener for NullTabOpener {
    fn open_new_tab(&self) -> Result<(), CoreError> {
        Ok(())
    }
}
