//! Settings and statistics import/export documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Settings, SettingsManager};
use crate::clock::Clock;
use crate::error::{CoreError, ImportError};
use crate::stats::{AllTimeStats, DailyStats, StatsTracker};
use crate::store::Store;

pub const EXPORT_VERSION: &str = "1.0.0";

/// Exported settings document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsExport {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub settings: Settings,
    pub blocked_sites: Vec<String>,
}

/// Exported statistics document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsExport {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub today_stats: DailyStats,
    pub all_time_stats: AllTimeStats,
}

/// Result of a settings import.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub blocked_sites: usize,
}

/// Snapshot current settings and block list into an export document.
pub fn export_settings<S: Store>(
    manager: &SettingsManager<'_, S>,
    clock: &dyn Clock,
) -> Result<SettingsExport, CoreError> {
    Ok(SettingsExport {
        version: EXPORT_VERSION.to_string(),
        timestamp: clock.now(),
        settings: manager.load()?,
        blocked_sites: manager.blocked_sites()?,
    })
}

/// Snapshot today's and all-time statistics into an export document.
pub fn export_stats<S: Store>(
    tracker: &StatsTracker<'_, S>,
    clock: &dyn Clock,
) -> Result<StatsExport, CoreError> {
    Ok(StatsExport {
        version: EXPORT_VERSION.to_string(),
        timestamp: clock.now(),
        today_stats: tracker.today()?,
        all_time_stats: tracker.all_time()?,
    })
}

/// Apply an exported settings document: settings merge over defaults, the
/// block list is replaced wholesale. Nothing is applied unless both
/// required fields are present and `confirmed` is set.
pub fn import_settings<S: Store>(
    manager: &SettingsManager<'_, S>,
    raw: &str,
    confirmed: bool,
) -> Result<ImportSummary, CoreError> {
    let document: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| ImportError::Malformed(e.to_string()))?;
    let settings_value = document
        .get("settings")
        .ok_or(ImportError::MissingField("settings"))?;
    let sites_value = document
        .get("blockedSites")
        .ok_or(ImportError::MissingField("blockedSites"))?;

    if !confirmed {
        return Err(ImportError::NotConfirmed.into());
    }

    // Partial settings fill in from defaults via the record's serde
    // defaults; unknown fields are ignored.
    let settings: Settings = serde_json::from_value(settings_value.clone())
        .map_err(|e| ImportError::Malformed(e.to_string()))?;
    let blocked_sites: Vec<String> = serde_json::from_value(sites_value.clone())
        .map_err(|e| ImportError::Malformed(e.to_string()))?;

    manager.save(&settings)?;
    manager.replace_sites(&blocked_sites)?;
    Ok(ImportSummary {
        blocked_sites: blocked_sites.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::store::{keys, Database};

    #[test]
    fn export_then_import_round_trips() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::at(1_700_000_000_000);
        let mgr = SettingsManager::new(&db);

        let mut settings = Settings::default();
        settings.default_session_duration = 50;
        settings.strict_mode = true;
        mgr.save(&settings).unwrap();
        db.set(keys::BLOCKED_SITES, &vec!["a.com".to_string(), "b.com".to_string()])
            .unwrap();

        let doc = export_settings(&mgr, &clock).unwrap();
        let raw = serde_json::to_string(&doc).unwrap();

        // Wipe, then import.
        mgr.reset_to_defaults().unwrap();
        let summary = import_settings(&mgr, &raw, true).unwrap();

        assert_eq!(summary.blocked_sites, 2);
        assert_eq!(mgr.load().unwrap(), settings);
        assert_eq!(
            mgr.blocked_sites().unwrap(),
            vec!["a.com".to_string(), "b.com".to_string()]
        );
    }

    #[test]
    fn import_merges_partial_settings_over_defaults() {
        let db = Database::open_memory().unwrap();
        let mgr = SettingsManager::new(&db);
        let raw = r#"{
            "version": "1.0.0",
            "timestamp": "2026-08-05T00:00:00Z",
            "settings": {"breakDuration": 12},
            "blockedSites": ["x.com"]
        }"#;

        import_settings(&mgr, raw, true).unwrap();
        let loaded = mgr.load().unwrap();
        assert_eq!(loaded.break_duration, 12);
        assert_eq!(loaded.default_session_duration, 25);
    }

    #[test]
    fn import_requires_both_fields() {
        let db = Database::open_memory().unwrap();
        let mgr = SettingsManager::new(&db);

        let missing_sites = r#"{"settings": {}}"#;
        let err = import_settings(&mgr, missing_sites, true).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Import(ImportError::MissingField("blockedSites"))
        ));

        let missing_settings = r#"{"blockedSites": []}"#;
        let err = import_settings(&mgr, missing_settings, true).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Import(ImportError::MissingField("settings"))
        ));
    }

    #[test]
    fn import_refuses_without_confirmation() {
        let db = Database::open_memory().unwrap();
        let mgr = SettingsManager::new(&db);
        db.set(keys::BLOCKED_SITES, &vec!["keep.com".to_string()])
            .unwrap();
        let raw = r#"{"settings": {}, "blockedSites": ["x.com"]}"#;

        let err = import_settings(&mgr, raw, false).unwrap_err();
        assert!(matches!(err, CoreError::Import(ImportError::NotConfirmed)));
        // Nothing applied.
        assert_eq!(mgr.blocked_sites().unwrap(), vec!["keep.com".to_string()]);
    }

    #[test]
    fn malformed_document_is_rejected() {
        let db = Database::open_memory().unwrap();
        let mgr = SettingsManager::new(&db);
        assert!(import_settings(&mgr, "{not json", true).is_err());
    }

    #[test]
    fn stats_export_carries_both_records() {
        let db = Database::open_memory().unwrap();
        let clock = ManualClock::at(1_700_000_000_000);
        let tracker = StatsTracker::new(&db, &clock);

        let doc = export_stats(&tracker, &clock).unwrap();
        assert_eq!(doc.version, EXPORT_VERSION);
        assert_eq!(doc.today_stats.date, clock.today());

        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("todayStats").is_some());
        assert!(json.get("allTimeStats").is_some());
    }
}
