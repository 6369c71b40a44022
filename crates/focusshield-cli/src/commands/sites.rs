use clap::Subcommand;
use focusshield_core::{Database, PresetCategory, SettingsManager};

#[derive(Subcommand)]
pub enum SitesAction {
    /// List blocked sites
    List,
    /// Add a domain to the block list
    Add { domain: String },
    /// Remove a domain from the block list
    Remove { domain: String },
    /// Replace one entry with another, keeping its position
    Edit { old: String, new: String },
    /// Add a curated category: social, entertainment, news or shopping
    Preset { category: PresetCategory },
}

pub fn run(action: SitesAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let manager = SettingsManager::new(&db);

    match action {
        SitesAction::List => {
            let sites = manager.blocked_sites()?;
            println!("{}", serde_json::to_string_pretty(&sites)?);
        }
        SitesAction::Add { domain } => {
            let stored = manager.add_site(&domain)?;
            println!("added {stored}");
        }
        SitesAction::Remove { domain } => {
            manager.remove_site(&domain)?;
            println!("removed {domain}");
        }
        SitesAction::Edit { old, new } => {
            let stored = manager.edit_site(&old, &new)?;
            println!("updated {old} -> {stored}");
        }
        SitesAction::Preset { category } => {
            let added = manager.add_preset(category)?;
            if added > 0 {
                println!("added {added} {category} sites");
            } else {
                println!("all {category} sites are already blocked");
            }
        }
    }
    Ok(())
}
