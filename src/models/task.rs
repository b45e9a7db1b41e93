use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One tracked interval, as stored in the `tasks` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: i64,
    pub user_id: i64,
    pub start_time: NaiveDateTime,  // ⇔ tasks.start_time (TEXT, fixed width)
    pub end_time: Option<NaiveDateTime>, // ⇔ tasks.end_time (NULL while running)
}

impl TaskRecord {
    pub fn is_running(&self) -> bool {
        self.end_time.is_none()
    }
}

/// A task together with the seconds it overlaps a queried day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskTime {
    #[serde(flatten)]
    pub task: TaskRecord,
    pub time_spent: f64,
}

/// Body of `POST /track`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTask {
    pub user_id: i64,
}

/// Body of `POST /stop`, and response of `POST /track`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskId {
    pub id: i64,
}
