use std::time::Duration;

use chrono::TimeZone;
use clap::Subcommand;
use focusshield_core::protocol::SystemTabOpener;
use focusshield_core::{
    Config, Database, EndReason, SessionController, SessionEvent, SettingsManager,
    SqliteRuleFilter, SystemClock,
};

#[derive(Subcommand)]
pub enum SessionAction {
    /// Start a focus session
    Start {
        /// Length in minutes; defaults to the configured session duration
        #[arg(short, long)]
        minutes: Option<u32>,
    },
    /// Stop the current session
    Stop,
    /// Request an emergency break (confirmation plus delay friction)
    Break {
        /// Cancel a pending break instead
        #[arg(long)]
        cancel: bool,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
        /// Skip the friction delay (for scripting)
        #[arg(long)]
        now: bool,
    },
    /// Print the current session state as JSON (fires due wake-ups first)
    Status,
    /// Re-arm or expire a stored session after a restart
    Restore,
    /// Recent session history
    History {
        #[arg(long, default_value = "10")]
        limit: usize,
    },
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let cfg = Config::load_or_default();
    let clock = SystemClock;
    focusshield_core::store::initialize(&db, &clock)?;

    let mut controller = SessionController::new(
        &db,
        &clock,
        Box::new(SqliteRuleFilter::new(&db, cfg.max_block_rules)),
    )
    .with_opener(Box::new(SystemTabOpener::new(cfg.new_tab_url.clone())))
    .with_redirect_base(cfg.redirect_base.clone());

    match action {
        SessionAction::Start { minutes } => {
            let minutes = match minutes {
                Some(m) => m,
                None => SettingsManager::new(&db).load()?.default_session_duration,
            };
            let event = controller.start_session(minutes)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        SessionAction::Stop => match controller.end_session(EndReason::Manual)? {
            Some(event) => {
                record_end(&db, &event)?;
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
            None => println!("{{\"type\": \"idle\"}}"),
        },
        SessionAction::Break { cancel, yes, now } => {
            run_break(&db, &mut controller, cancel, yes, now)?;
        }
        SessionAction::Status => {
            if let Some(event) = controller.tick()? {
                record_end(&db, &event)?;
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
            let snapshot = controller.snapshot();
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        SessionAction::Restore => {
            let outcome = controller.restore()?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        SessionAction::History { limit } => {
            let history = db.session_history(limit)?;
            println!("{}", serde_json::to_string_pretty(&history)?);
        }
    }
    Ok(())
}

fn run_break(
    db: &Database,
    controller: &mut SessionController<'_, Database>,
    cancel: bool,
    yes: bool,
    now: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if cancel {
        match controller.cancel_emergency_break()? {
            Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
            None => println!("{{\"type\": \"noPendingBreak\"}}"),
        }
        return Ok(());
    }

    if !yes
        && !super::confirm(
            "Emergency break will end your focus session early and is recorded in your stats. Continue?",
        )?
    {
        println!("aborted");
        return Ok(());
    }

    if now {
        match controller.end_session(EndReason::EmergencyBreak)? {
            Some(event) => {
                record_end(db, &event)?;
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
            None => println!("{{\"type\": \"idle\"}}"),
        }
        return Ok(());
    }

    let pending = controller.request_emergency_break()?;
    println!("{}", serde_json::to_string_pretty(&pending)?);

    // Sit out the friction delay, then let the wake-up fire.
    loop {
        std::thread::sleep(Duration::from_millis(500));
        if let Some(event) = controller.tick()? {
            record_end(db, &event)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
            return Ok(());
        }
    }
}

/// Persist an ended session to the history table.
fn record_end(db: &Database, event: &SessionEvent) -> Result<(), Box<dyn std::error::Error>> {
    let (session, focus_ms, reason, at) = match event {
        SessionEvent::SessionEnded {
            session: Some(session),
            focus_ms,
            reason,
            at,
        } => (session, *focus_ms, reason.as_str(), *at),
        SessionEvent::SessionCompleted {
            session: Some(session),
            focus_ms,
            at,
        } => (session, *focus_ms, EndReason::Natural.as_str(), *at),
        _ => return Ok(()),
    };

    let started_at = chrono::Utc
        .timestamp_millis_opt(session.start_time)
        .single()
        .unwrap_or(at);
    db.record_session(
        started_at,
        at,
        (session.duration / 60_000).max(0) as u64,
        focus_ms,
        reason,
    )?;
    Ok(())
}
