use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

/// Aggregate figures about the `tasks` table.
#[derive(Debug, Default, PartialEq)]
pub struct TaskStats {
    pub total: i64,
    pub running: i64,
    pub users: i64,
    pub first_start: Option<String>,
    pub last_start: Option<String>,
}

pub fn task_stats(pool: &DbPool) -> rusqlite::Result<TaskStats> {
    let (total, running, users): (i64, i64, i64) = pool.conn.query_row(
        "SELECT COUNT(*),
                IFNULL(SUM(CASE WHEN end_time IS NULL THEN 1 ELSE 0 END), 0),
                COUNT(DISTINCT user_id)
         FROM tasks",
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;

    let first_start: Option<String> = pool
        .conn
        .query_row("SELECT MIN(start_time) FROM tasks", [], |row| row.get(0))
        .optional()?
        .flatten();

    let last_start: Option<String> = pool
        .conn
        .query_row("SELECT MAX(start_time) FROM tasks", [], |row| row.get(0))
        .optional()?
        .flatten();

    Ok(TaskStats {
        total,
        running,
        users,
        first_start,
        last_start,
    })
}

pub fn print_db_info(pool: &DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) TASK COUNTS
    //
    let stats = task_stats(pool)?;
    println!(
        "{}• Total tasks:{} {}{}{}",
        CYAN, RESET, GREEN, stats.total, RESET
    );
    println!("{}• Running tasks:{} {}", CYAN, RESET, stats.running);
    println!("{}• Distinct users:{} {}", CYAN, RESET, stats.users);

    //
    // 3) START RANGE
    //
    let fmt = |v: &Option<String>| v.clone().unwrap_or_else(|| format!("{GREY}--{RESET}"));

    println!("{}• Start range:{}", CYAN, RESET);
    println!("    from: {}", fmt(&stats.first_start));
    println!("    to:   {}", fmt(&stats.last_start));

    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::queries::{insert_task, insert_task_record};
    use chrono::NaiveDateTime;

    #[test]
    fn stats_count_running_and_users() {
        let pool = DbPool::in_memory().unwrap();
        assert_eq!(task_stats(&pool).unwrap(), TaskStats::default());

        let t = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
        insert_task_record(&pool.conn, 1, &t("2025-01-01 08:00:00"), Some(&t("2025-01-01 09:00:00")))
            .unwrap();
        insert_task(&pool.conn, 2, &t("2025-02-01 08:00:00")).unwrap();

        let stats = task_stats(&pool).unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.running, 1);
        assert_eq!(stats.users, 2);
        assert_eq!(stats.first_start.as_deref(), Some("2025-01-01 08:00:00.000000"));
        assert_eq!(stats.last_start.as_deref(), Some("2025-02-01 08:00:00.000000"));
    }
}
