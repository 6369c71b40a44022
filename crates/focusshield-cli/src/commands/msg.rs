use focusshield_core::protocol::SystemTabOpener;
use focusshield_core::{Config, Database, SessionController, SqliteRuleFilter, SystemClock};

/// Dispatch one raw protocol request and print the response payload.
/// Unknown actions come back as an error payload, exit code 0.
pub fn run(json: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let cfg = Config::load_or_default();
    let clock = SystemClock;

    let mut controller = SessionController::new(
        &db,
        &clock,
        Box::new(SqliteRuleFilter::new(&db, cfg.max_block_rules)),
    )
    .with_opener(Box::new(SystemTabOpener::new(cfg.new_tab_url.clone())))
    .with_redirect_base(cfg.redirect_base.clone());

    let response = controller.handle_json(json);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
