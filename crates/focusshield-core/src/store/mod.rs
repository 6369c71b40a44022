//! Persistent key-value store shared by every component.
//!
//! The store is the single source of truth: components read it fresh
//! rather than caching across restarts, and every mutation is a
//! read-modify-write on the specific keys involved. There are no
//! transactions across keys and no compare-and-swap; the last write
//! observed by the store wins.

mod config;
pub mod database;
pub mod keys;

pub use config::Config;
pub use database::{Database, SessionRecord};

use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};

use crate::clock::Clock;
use crate::error::StoreError;
use crate::settings::{Settings, DEFAULT_BLOCKED_SITES};
use crate::stats::DailyStats;

/// String-key to JSON-value mapping, injected into each component.
pub trait Store {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Write several keys in one call. Per-key last-write-wins semantics
    /// still apply; implementations may batch but must not reorder.
    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        for (key, value) in entries {
            self.set_raw(key, value)?;
        }
        Ok(())
    }

    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.get_raw(key)? {
            Some(raw) => serde_json::from_str(&raw).map(Some).map_err(|e| {
                StoreError::Corrupt {
                    key: key.to_string(),
                    message: e.to_string(),
                }
            }),
            None => Ok(None),
        }
    }

    fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|e| StoreError::Corrupt {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.set_raw(key, &raw)
    }
}

/// Returns `~/.config/focusshield[-dev]/` based on FOCUSSHIELD_ENV.
///
/// Set FOCUSSHIELD_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOCUSSHIELD_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("focusshield-dev")
    } else {
        base_dir.join("focusshield")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Seed defaults for any key that is not yet present. Existing values are
/// never overwritten, so re-running on every launch is safe.
pub fn initialize<S: Store>(store: &S, clock: &dyn Clock) -> Result<(), StoreError> {
    seed(store, keys::BLOCKED_SITES, &DEFAULT_BLOCKED_SITES.to_vec())?;
    seed(store, keys::DEFAULT_SESSION_DURATION, &25u32)?;
    seed(store, keys::IS_ACTIVE, &false)?;
    seed(store, keys::CURRENT_SESSION, &serde_json::Value::Null)?;
    seed(store, keys::SETTINGS, &Settings::default())?;
    seed(store, keys::TODAY_STATS, &DailyStats::fresh(clock.today()))?;
    Ok(())
}

fn seed<S: Store, T: Serialize>(store: &S, key: &str, value: &T) -> Result<(), StoreError> {
    if store.get_raw(key)?.is_none() {
        store.set(key, value)?;
    }
    Ok(())
}
