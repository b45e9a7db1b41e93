use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Check if the `tasks` table exists.
fn tasks_table_exists(conn: &Connection) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name='tasks'")?;
    let exists: Option<String> = stmt.query_row([], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Create the `tasks` table.
///
/// The column layout matches databases created by the first (SQLAlchemy)
/// deployment, so an existing `data.db` can be opened as-is.
fn create_tasks_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id    INTEGER,
            start_time DATETIME,
            end_time   DATETIME
        );
        "#,
    )?;
    Ok(())
}

fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

const IDX_USER_START: &str = "20251016_0001_tasks_user_start_index";

fn migrate_add_user_start_index(conn: &Connection) -> Result<bool> {
    if migration_applied(conn, IDX_USER_START)? {
        return Ok(false);
    }

    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_tasks_user_start ON tasks(user_id, start_time);",
    )?;
    mark_applied(conn, IDX_USER_START, "Added (user_id, start_time) index to tasks")?;
    Ok(true)
}

const NORMALIZE_TS: &str = "20251016_0002_normalize_task_timestamps";

/// Rows written without fractional seconds ("YYYY-MM-DD HH:MM:SS") compare
/// wrongly against the fixed-width format; pad them with ".000000".
fn migrate_normalize_timestamps(conn: &Connection) -> Result<bool> {
    if migration_applied(conn, NORMALIZE_TS)? {
        return Ok(false);
    }

    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "UPDATE tasks SET start_time = start_time || '.000000' WHERE length(start_time) = 19",
        [],
    )?;
    tx.execute(
        "UPDATE tasks SET end_time = end_time || '.000000' WHERE length(end_time) = 19",
        [],
    )?;
    mark_applied(&tx, NORMALIZE_TS, "Padded task timestamps to microsecond precision")?;
    tx.commit()?;
    Ok(true)
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db(). Returns the versions applied by this call, so the
/// caller decides how to report them.
pub fn run_pending_migrations(conn: &Connection) -> Result<Vec<&'static str>> {
    let mut applied = Vec::new();

    // 1) Ensure log table
    ensure_log_table(conn)?;

    // 2) Ensure tasks table
    if !tasks_table_exists(conn)? {
        create_tasks_table(conn)?;
    }

    // 3) Versioned migrations
    if migrate_add_user_start_index(conn)? {
        applied.push(IDX_USER_START);
    }
    if migrate_normalize_timestamps(conn)? {
        applied.push(NORMALIZE_TS);
    }

    Ok(applied)
}
