use focusshield_core::{Config, Database, SessionController, SqliteRuleFilter, SystemClock};

/// Print the block verdict for a URL. With `count`, behave like a real
/// navigation and bump today's blocked counter on a hit.
pub fn run(url: &str, count: bool) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let cfg = Config::load_or_default();
    let clock = SystemClock;

    let mut controller = SessionController::new(
        &db,
        &clock,
        Box::new(SqliteRuleFilter::new(&db, cfg.max_block_rules)),
    );
    let blocked = if count {
        controller.on_navigation(url)?
    } else {
        controller.is_url_blocked(url)
    };
    println!("{}", serde_json::json!({ "blocked": blocked }));
    Ok(())
}
