use crate::core::calculator::overlap::overlap_seconds;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{insert_task, load_task, load_tasks_overlapping, set_end_time};
use crate::errors::{AppError, AppResult};
use crate::models::task::{TaskRecord, TaskTime};
use crate::utils::date::{day_bounds, day_window};
use crate::utils::time::{now, to_db_str};
use chrono::{NaiveDate, NaiveDateTime};

/// High-level business logic for tracking task intervals.
///
/// Every operation has an `*_at` variant taking the clock value explicitly;
/// the plain variants read the local wall clock.
pub struct TrackLogic;

impl TrackLogic {
    /// Start a task for `user_id`. Returns the generated task id.
    pub fn track(pool: &mut DbPool, user_id: i64) -> AppResult<i64> {
        Self::track_at(pool, user_id, now())
    }

    pub fn track_at(pool: &mut DbPool, user_id: i64, at: NaiveDateTime) -> AppResult<i64> {
        let id = insert_task(&pool.conn, user_id, &at)?;

        ttlog(
            &pool.conn,
            "track",
            &format!("task {id}"),
            &format!("user {user_id} started at {}", to_db_str(&at)),
        )?;

        Ok(id)
    }

    /// Stop task `id` and return it as stored after the update.
    pub fn stop(pool: &mut DbPool, id: i64) -> AppResult<TaskRecord> {
        Self::stop_at(pool, id, now())
    }

    pub fn stop_at(pool: &mut DbPool, id: i64, at: NaiveDateTime) -> AppResult<TaskRecord> {
        let tx = pool.conn.transaction()?;

        let task = load_task(&tx, id)?.ok_or(AppError::TaskNotFound(id))?;
        if at < task.start_time {
            return Err(AppError::InvalidInput(format!(
                "task {id} cannot end before it started ({})",
                to_db_str(&task.start_time)
            )));
        }

        set_end_time(&tx, id, &at)?;
        ttlog(
            &tx,
            "stop",
            &format!("task {id}"),
            &format!("user {} stopped at {}", task.user_id, to_db_str(&at)),
        )?;
        tx.commit()?;

        load_task(&pool.conn, id)?.ok_or(AppError::TaskNotFound(id))
    }

    /// Tasks of `user_id` overlapping `date`, each with the seconds spent that day.
    pub fn times(pool: &mut DbPool, user_id: i64, date: NaiveDate) -> AppResult<Vec<TaskTime>> {
        Self::times_at(pool, user_id, date, now())
    }

    /// Running tasks are measured up to `at`.
    pub fn times_at(
        pool: &mut DbPool,
        user_id: i64,
        date: NaiveDate,
        at: NaiveDateTime,
    ) -> AppResult<Vec<TaskTime>> {
        let (day_start, day_end) = day_bounds(date);
        let (window_start, window_end) = day_window(date);

        let tasks = load_tasks_overlapping(&pool.conn, user_id, &day_start, &day_end)?;

        Ok(tasks
            .into_iter()
            .map(|task| {
                let end = task.end_time.unwrap_or(at);
                let time_spent = overlap_seconds(task.start_time, end, window_start, window_end);
                TaskTime { task, time_spent }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::log::load_log;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn track_and_stop_are_logged() {
        let mut pool = DbPool::in_memory().unwrap();

        let id = TrackLogic::track_at(&mut pool, 3, ts("2025-03-10 09:00:00")).unwrap();
        let stopped = TrackLogic::stop_at(&mut pool, id, ts("2025-03-10 09:45:00")).unwrap();

        assert_eq!(stopped.id, id);
        assert_eq!(stopped.user_id, 3);
        assert_eq!(stopped.end_time, Some(ts("2025-03-10 09:45:00")));

        let ops: Vec<String> = load_log(&pool.conn)
            .unwrap()
            .into_iter()
            .map(|(_, _, op, _, _)| op)
            .filter(|op| op != "migration_applied")
            .collect();
        assert_eq!(ops, vec!["track", "stop"]);
    }

    #[test]
    fn stop_unknown_task_is_an_error() {
        let mut pool = DbPool::in_memory().unwrap();
        let err = TrackLogic::stop(&mut pool, 42).unwrap_err();
        assert!(matches!(err, AppError::TaskNotFound(42)));
    }

    #[test]
    fn stop_before_start_is_rejected() {
        let mut pool = DbPool::in_memory().unwrap();
        let id = TrackLogic::track_at(&mut pool, 1, ts("2025-03-10 09:00:00")).unwrap();

        let err = TrackLogic::stop_at(&mut pool, id, ts("2025-03-10 08:00:00")).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(load_task(&pool.conn, id).unwrap().unwrap().is_running());
    }

    #[test]
    fn running_task_is_measured_until_now() {
        let mut pool = DbPool::in_memory().unwrap();
        TrackLogic::track_at(&mut pool, 1, ts("2025-03-10 10:00:00")).unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let times = TrackLogic::times_at(&mut pool, 1, date, ts("2025-03-10 10:20:00")).unwrap();

        assert_eq!(times.len(), 1);
        assert_eq!(times[0].time_spent, 1200.0);
        assert!(times[0].task.is_running());
    }
}
