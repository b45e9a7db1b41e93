use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};
use rusqlite::Connection;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped in test mode)
///  - the SQLite database and all pending migrations
///  - the data directory with an empty accounts.json and readings/
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.data_dir.clone(), cli.test)?;

    println!("⚙️  Initializing rTaskMeter…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database    : {}", cfg.database);
    println!("📁 Data dir    : {}", cfg.data_dir);

    let conn = Connection::open(cfg.database_path())?;
    for version in init_db(&conn)? {
        success(format!("Migration applied: {version}"));
    }

    success(format!("Database initialized at {}", cfg.database));

    // internal log (non-blocking)
    if let Err(e) = log::ttlog(
        &conn,
        "init",
        "Database initialized",
        &format!("Database initialized at {}", cfg.database),
    ) {
        warning(format!("Failed to write internal log: {}", e));
    }

    println!("🎉 rTaskMeter initialization completed!");
    Ok(())
}
