use crate::errors::{AppError, AppResult};
use crate::models::task::TaskRecord;
use crate::utils::time::{from_db_str, to_db_str};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

fn parse_ts(idx: usize, s: &str) -> Result<NaiveDateTime> {
    from_db_str(s).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidTimestamp(s.to_string())),
        )
    })
}

pub fn map_row(row: &Row) -> Result<TaskRecord> {
    let start_str: String = row.get("start_time")?;
    let end_str: Option<String> = row.get("end_time")?;

    let start_time = parse_ts(2, &start_str)?;
    let end_time = match end_str {
        Some(s) => Some(parse_ts(3, &s)?),
        None => None,
    };

    Ok(TaskRecord {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        start_time,
        end_time,
    })
}

/// Insert a running task and return its generated id.
pub fn insert_task(conn: &Connection, user_id: i64, start: &NaiveDateTime) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO tasks (user_id, start_time, end_time) VALUES (?1, ?2, NULL)",
        params![user_id, to_db_str(start)],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Insert a task with explicit bounds. Returns the new id.
///
/// Test helper: seeds past or cross-midnight intervals for
/// `tests/tracker_tests.rs` and the `db` unit tests.
#[doc(hidden)]
pub fn insert_task_record(
    conn: &Connection,
    user_id: i64,
    start: &NaiveDateTime,
    end: Option<&NaiveDateTime>,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO tasks (user_id, start_time, end_time) VALUES (?1, ?2, ?3)",
        params![user_id, to_db_str(start), end.map(to_db_str)],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Set `end_time` on task `id`. Returns the number of rows touched (0 or 1).
pub fn set_end_time(conn: &Connection, id: i64, end: &NaiveDateTime) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE tasks SET end_time = ?1 WHERE id = ?2",
        params![to_db_str(end), id],
    )?;
    Ok(n)
}

pub fn load_task(conn: &Connection, id: i64) -> AppResult<Option<TaskRecord>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, user_id, start_time, end_time FROM tasks WHERE id = ?1",
    )?;
    let task = stmt.query_row([id], map_row).optional()?;
    Ok(task)
}

/// Tasks of `user_id` whose interval touches `[day_start, day_end]`:
/// started before the window closes and either still running or ended
/// after it opened.
pub fn load_tasks_overlapping(
    conn: &Connection,
    user_id: i64,
    day_start: &NaiveDateTime,
    day_end: &NaiveDateTime,
) -> AppResult<Vec<TaskRecord>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, user_id, start_time, end_time FROM tasks
         WHERE user_id = ?1
           AND start_time <= ?2
           AND (end_time >= ?3 OR end_time IS NULL)
         ORDER BY start_time ASC, id ASC",
    )?;

    let rows = stmt.query_map(
        params![user_id, to_db_str(day_end), to_db_str(day_start)],
        map_row,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
