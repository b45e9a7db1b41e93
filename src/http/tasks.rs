use crate::core::tracker::TrackLogic;
use crate::errors::AppResult;
use crate::http::{AppState, run_blocking};
use crate::models::task::{NewTask, TaskId, TaskRecord, TaskTime};
use crate::utils::date::parse_date_strict;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;

pub fn get_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/track", post(track))
        .route("/stop", post(stop))
        .route("/times", get(times))
}

#[derive(Debug, Deserialize)]
pub struct TimesQuery {
    pub user_id: i64,
    pub date: String,
}

pub async fn track(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> AppResult<Json<TaskId>> {
    let Json(NewTask { user_id }) = payload?;

    let id = run_blocking(move || {
        let mut pool = state.pool();
        TrackLogic::track(&mut pool, user_id)
    })
    .await?;

    tracing::info!(task_id = id, user_id, "task started");
    Ok(Json(TaskId { id }))
}

pub async fn stop(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TaskId>, JsonRejection>,
) -> AppResult<Json<TaskRecord>> {
    let Json(TaskId { id }) = payload?;

    let task = run_blocking(move || {
        let mut pool = state.pool();
        TrackLogic::stop(&mut pool, id)
    })
    .await?;

    tracing::info!(task_id = id, user_id = task.user_id, "task stopped");
    Ok(Json(task))
}

pub async fn times(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TimesQuery>, QueryRejection>,
) -> AppResult<Json<Vec<TaskTime>>> {
    let Query(q) = query?;
    let date = parse_date_strict(&q.date)?;

    let times = run_blocking(move || {
        let mut pool = state.pool();
        TrackLogic::times(&mut pool, q.user_id, date)
    })
    .await?;

    Ok(Json(times))
}
