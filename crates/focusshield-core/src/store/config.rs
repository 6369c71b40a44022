//! TOML-based application configuration.
//!
//! Holds host-level options that are not user Settings: the installed-rule
//! limit for the network filter, the redirect target for block rules, and
//! the URL opened as a "neutral" tab.
//!
//! Configuration is stored at `~/.config/focusshield/config.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::data_dir;

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/focusshield/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Upper bound on installed block rules. Rule removal always clears
    /// the full `1..=max_block_rules` id range.
    #[serde(default = "default_max_block_rules")]
    pub max_block_rules: usize,
    /// Base URL blocked navigations are redirected to; the blocked
    /// hostname is appended as a `site` query parameter.
    #[serde(default = "default_redirect_base")]
    pub redirect_base: String,
    /// URL opened for the "new tab" escape action.
    #[serde(default = "default_new_tab_url")]
    pub new_tab_url: String,
}

fn default_max_block_rules() -> usize {
    100
}
fn default_redirect_base() -> String {
    "focusshield:blocked".into()
}
fn default_new_tab_url() -> String {
    "about:blank".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_block_rules: default_max_block_rules(),
            redirect_base: default_redirect_base(),
            new_tab_url: default_new_tab_url(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
