//! User settings and the blocked-site list.
//!
//! The `settings` store key holds one flat record; partial records merge
//! over defaults on load, so a missing key never fails a reader. Every
//! change writes the full record back (auto-save semantics, no staged
//! edits).

mod presets;
mod sites;
mod transfer;

pub use presets::PresetCategory;
pub use sites::normalize_site;
pub use transfer::{
    export_settings, export_stats, import_settings, ImportSummary, SettingsExport, StatsExport,
    EXPORT_VERSION,
};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, StoreError, ValidationError};
use crate::store::{keys, Store};

/// Sites seeded into a fresh install's block list.
pub const DEFAULT_BLOCKED_SITES: [&str; 12] = [
    "facebook.com",
    "twitter.com",
    "youtube.com",
    "reddit.com",
    "instagram.com",
    "tiktok.com",
    "netflix.com",
    "twitch.tv",
    "linkedin.com",
    "snapchat.com",
    "pinterest.com",
    "tumblr.com",
];

/// User settings record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Default focus session length in minutes.
    #[serde(default = "default_session_duration")]
    pub default_session_duration: u32,
    /// Suggested break length in minutes.
    #[serde(default = "default_break_duration")]
    pub break_duration: u32,
    /// Friction delay before an emergency break takes effect, in seconds.
    #[serde(default = "default_emergency_break_delay")]
    pub emergency_break_delay: u32,
    #[serde(default = "default_true")]
    pub enable_notifications: bool,
    #[serde(default)]
    pub enable_sounds: bool,
    #[serde(default = "default_true")]
    pub enable_motivational_quotes: bool,
    #[serde(default)]
    pub strict_mode: bool,
    #[serde(default = "default_true")]
    pub block_subdomains: bool,
    #[serde(default = "default_true")]
    pub show_focus_reminder: bool,
    #[serde(default)]
    pub enable_schedule: bool,
    #[serde(default)]
    pub schedule_weekdays: bool,
    #[serde(default = "default_weekday_start")]
    pub weekday_start: String,
    #[serde(default = "default_weekday_end")]
    pub weekday_end: String,
    #[serde(default)]
    pub schedule_weekends: bool,
    #[serde(default = "default_weekend_start")]
    pub weekend_start: String,
    #[serde(default = "default_weekend_end")]
    pub weekend_end: String,
}

fn default_session_duration() -> u32 {
    25
}
fn default_break_duration() -> u32 {
    5
}
fn default_emergency_break_delay() -> u32 {
    10
}
fn default_true() -> bool {
    true
}
fn default_weekday_start() -> String {
    "09:00".into()
}
fn default_weekday_end() -> String {
    "17:00".into()
}
fn default_weekend_start() -> String {
    "10:00".into()
}
fn default_weekend_end() -> String {
    "16:00".into()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_session_duration: default_session_duration(),
            break_duration: default_break_duration(),
            emergency_break_delay: default_emergency_break_delay(),
            enable_notifications: true,
            enable_sounds: false,
            enable_motivational_quotes: true,
            strict_mode: false,
            block_subdomains: true,
            show_focus_reminder: true,
            enable_schedule: false,
            schedule_weekdays: false,
            weekday_start: default_weekday_start(),
            weekday_end: default_weekday_end(),
            schedule_weekends: false,
            weekend_start: default_weekend_start(),
            weekend_end: default_weekend_end(),
        }
    }
}

impl Settings {
    /// Get one field as a display string, by its camelCase store name.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match json.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set one field by its camelCase store name, parsing `value` against
    /// the field's current type.
    ///
    /// # Errors
    /// Returns an error for unknown keys or unparseable values.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ValidationError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ValidationError::InvalidValue {
            field: key.to_string(),
            message: e.to_string(),
        })?;
        let Some(obj) = json.as_object_mut() else {
            return Err(ValidationError::InvalidValue {
                field: key.to_string(),
                message: "settings record is not an object".into(),
            });
        };
        let existing = obj.get(key).ok_or_else(|| ValidationError::InvalidValue {
            field: key.to_string(),
            message: "unknown settings key".into(),
        })?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(value.parse::<bool>().map_err(
                |_| ValidationError::InvalidValue {
                    field: key.to_string(),
                    message: format!("cannot parse '{value}' as bool"),
                },
            )?),
            serde_json::Value::Number(_) => {
                let n = value
                    .parse::<u64>()
                    .map_err(|_| ValidationError::InvalidValue {
                        field: key.to_string(),
                        message: format!("cannot parse '{value}' as number"),
                    })?;
                serde_json::Value::Number(n.into())
            }
            _ => serde_json::Value::String(value.to_string()),
        };
        obj.insert(key.to_string(), new_value);

        *self = serde_json::from_value(json).map_err(|e| ValidationError::InvalidValue {
            field: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

/// CRUD over the settings record and the blocked-site list.
pub struct SettingsManager<'a, S: Store> {
    store: &'a S,
}

impl<'a, S: Store> SettingsManager<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Load settings, merging a partial stored record over defaults.
    pub fn load(&self) -> Result<Settings, StoreError> {
        Ok(self.store.get(keys::SETTINGS)?.unwrap_or_default())
    }

    /// Full-record write.
    pub fn save(&self, settings: &Settings) -> Result<(), StoreError> {
        self.store.set(keys::SETTINGS, settings)
    }

    pub fn reset_to_defaults(&self) -> Result<(), StoreError> {
        self.save(&Settings::default())?;
        self.store.set(
            keys::BLOCKED_SITES,
            &DEFAULT_BLOCKED_SITES
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>(),
        )
    }

    /// The current block list, defaulting to the seeded sites.
    pub fn blocked_sites(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.store.get(keys::BLOCKED_SITES)?.unwrap_or_else(|| {
            DEFAULT_BLOCKED_SITES.iter().map(|s| s.to_string()).collect()
        }))
    }

    fn save_sites(&self, sites: &[String]) -> Result<(), StoreError> {
        self.store.set(keys::BLOCKED_SITES, &sites.to_vec())
    }

    /// Replace the block list wholesale (import path).
    pub fn replace_sites(&self, sites: &[String]) -> Result<(), StoreError> {
        self.save_sites(sites)
    }

    /// Normalize, validate and append one domain. Returns the stored form.
    ///
    /// # Errors
    /// Invalid syntax or an exact duplicate aborts with nothing applied.
    pub fn add_site(&self, input: &str) -> Result<String, CoreError> {
        let domain = normalize_site(input)?;
        let mut sites = self.blocked_sites()?;
        if sites.contains(&domain) {
            return Err(ValidationError::DuplicateDomain { domain }.into());
        }
        sites.push(domain.clone());
        self.save_sites(&sites)?;
        Ok(domain)
    }

    /// Remove one domain by its exact stored form.
    pub fn remove_site(&self, domain: &str) -> Result<(), CoreError> {
        let mut sites = self.blocked_sites()?;
        let before = sites.len();
        sites.retain(|site| site != domain);
        if sites.len() == before {
            return Err(ValidationError::UnknownDomain {
                domain: domain.to_string(),
            }
            .into());
        }
        self.save_sites(&sites)?;
        Ok(())
    }

    /// Replace one entry in place, keeping list order. Returns the stored
    /// form of the replacement.
    pub fn edit_site(&self, old: &str, new: &str) -> Result<String, CoreError> {
        let domain = normalize_site(new)?;
        let mut sites = self.blocked_sites()?;
        let Some(slot) = sites.iter().position(|site| site == old) else {
            return Err(ValidationError::UnknownDomain {
                domain: old.to_string(),
            }
            .into());
        };
        if sites.iter().any(|site| site == &domain) && sites[slot] != domain {
            return Err(ValidationError::DuplicateDomain { domain }.into());
        }
        sites[slot] = domain.clone();
        self.save_sites(&sites)?;
        Ok(domain)
    }

    /// Append a curated category, skipping entries already present.
    /// Returns how many were newly added.
    pub fn add_preset(&self, category: PresetCategory) -> Result<usize, StoreError> {
        let mut sites = self.blocked_sites()?;
        let mut added = 0;
        for site in category.sites() {
            if !sites.iter().any(|existing| existing == site) {
                sites.push(site.to_string());
                added += 1;
            }
        }
        if added > 0 {
            self.save_sites(&sites)?;
        }
        Ok(added)
    }
}
