use clap::Subcommand;
use focusshield_core::{Database, StatsTracker, SystemClock};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's stats
    Today,
    /// All-time stats
    All,
    /// Zero both records
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let clock = SystemClock;
    let tracker = StatsTracker::new(&db, &clock);

    match action {
        StatsAction::Today => {
            let stats = tracker.today()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::All => {
            let stats = tracker.all_time()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Reset { yes } => {
            if !yes && !super::confirm("Reset all statistics? This cannot be undone.")? {
                println!("aborted");
                return Ok(());
            }
            tracker.reset()?;
            println!("statistics reset");
        }
    }
    Ok(())
}
