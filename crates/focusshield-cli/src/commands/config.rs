use clap::Subcommand;
use focusshield_core::{Database, SettingsManager};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the full settings record as JSON
    Show,
    /// Get one settings value by its camelCase key
    Get { key: String },
    /// Set one settings value (full record is written back)
    Set { key: String, value: String },
    /// Reset settings and the block list to defaults
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let manager = SettingsManager::new(&db);

    match action {
        ConfigAction::Show => {
            let settings = manager.load()?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        ConfigAction::Get { key } => {
            let settings = manager.load()?;
            match settings.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown settings key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut settings = manager.load()?;
            settings.set(&key, &value)?;
            manager.save(&settings)?;
            println!("{key} = {value}");
        }
        ConfigAction::Reset { yes } => {
            if !yes && !super::confirm("Reset all settings to defaults? This cannot be undone.")? {
                println!("aborted");
                return Ok(());
            }
            manager.reset_to_defaults()?;
            println!("settings reset to defaults");
        }
    }
    Ok(())
}
