use std::path::PathBuf;

use clap::Subcommand;
use focusshield_core::settings::{export_settings, export_stats, import_settings};
use focusshield_core::{Database, SettingsManager, StatsTracker, SystemClock};

#[derive(Subcommand)]
pub enum TransferAction {
    /// Write settings and the block list to a JSON document
    ExportSettings {
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Apply a previously exported settings document
    ImportSettings {
        file: PathBuf,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Write statistics to a JSON document
    ExportStats {
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub fn run(action: TransferAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let clock = SystemClock;

    match action {
        TransferAction::ExportSettings { output } => {
            let manager = SettingsManager::new(&db);
            let document = export_settings(&manager, &clock)?;
            emit(output, &serde_json::to_string_pretty(&document)?)?;
        }
        TransferAction::ImportSettings { file, yes } => {
            let raw = std::fs::read_to_string(&file)?;
            if !yes
                && !super::confirm("Import these settings? This overwrites your configuration.")?
            {
                println!("aborted");
                return Ok(());
            }
            let manager = SettingsManager::new(&db);
            let summary = import_settings(&manager, &raw, true)?;
            println!("imported {} blocked sites", summary.blocked_sites);
        }
        TransferAction::ExportStats { output } => {
            let tracker = StatsTracker::new(&db, &clock);
            let document = export_stats(&tracker, &clock)?;
            emit(output, &serde_json::to_string_pretty(&document)?)?;
        }
    }
    Ok(())
}

fn emit(output: Option<PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            std::fs::write(&path, content)?;
            println!("wrote {}", path.display());
        }
        None => println!("{content}"),
    }
    Ok(())
}
