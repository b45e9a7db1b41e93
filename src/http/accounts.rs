use crate::errors::AppResult;
use crate::http::{AppState, run_blocking};
use crate::models::account::{AccountRecord, ContractAddresses, LookupField};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub fn get_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/getaccounts", get(get_accounts))
        .route("/getuser/{user_id}", get(get_user))
        .route("/gethepek/{hepek_id}", get(get_hepek))
        .route("/getinfo/{info_id}", get(get_info))
        .route("/readings/{info}/{hepek}", get(get_readings))
        .route("/api", post(update_meter))
        .route("/setcontracts", post(set_contracts))
}

#[derive(Debug, Serialize)]
pub struct Status {
    pub status: &'static str,
}

const OK: Status = Status { status: "ok" };

pub async fn get_accounts(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<AccountRecord>>> {
    let accounts = run_blocking(move || state.accounts.list_all()).await?;
    Ok(Json(accounts))
}

async fn lookup(
    state: Arc<AppState>,
    field: LookupField,
    value: String,
) -> AppResult<Json<Option<AccountRecord>>> {
    let found = run_blocking(move || state.accounts.lookup(field, &value)).await?;
    Ok(Json(found))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Option<AccountRecord>>> {
    lookup(state, LookupField::User, user_id).await
}

pub async fn get_hepek(
    State(state): State<Arc<AppState>>,
    Path(hepek_id): Path<String>,
) -> AppResult<Json<Option<AccountRecord>>> {
    lookup(state, LookupField::Hepek, hepek_id).await
}

pub async fn get_info(
    State(state): State<Arc<AppState>>,
    Path(info_id): Path<String>,
) -> AppResult<Json<Option<AccountRecord>>> {
    lookup(state, LookupField::Info, info_id).await
}

pub async fn get_readings(
    State(state): State<Arc<AppState>>,
    Path((info, hepek)): Path<(String, String)>,
) -> AppResult<Json<Vec<Value>>> {
    let key = format!("{info}_{hepek}");
    let entries = run_blocking(move || state.readings.entries(&key)).await?;
    Ok(Json(entries))
}

/// Upsert the account, then log its `meter` reading if one was sent.
/// A reading that cannot be stored rejects the whole update.
pub async fn update_meter(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AccountRecord>, JsonRejection>,
) -> AppResult<Json<Status>> {
    let Json(record) = payload?;
    let hepek = record.hepek.clone();

    let (outcome, stored) = run_blocking(move || {
        state.readings.check(&record)?;
        let outcome = state.accounts.upsert(record.clone())?;
        let stored = state.readings.record(&record)?;
        Ok((outcome, stored))
    })
    .await?;

    tracing::info!(%hepek, ?outcome, readings = ?stored, "account updated");
    Ok(Json(OK))
}

pub async fn set_contracts(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ContractAddresses>, JsonRejection>,
) -> AppResult<Json<Status>> {
    let Json(addrs) = payload?;

    let changed = run_blocking(move || state.accounts.update_contracts(&addrs)).await?;

    tracing::info!(changed, "contract addresses updated");
    Ok(Json(OK))
}
