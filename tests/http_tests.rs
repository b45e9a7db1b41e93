use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use rtaskmeter::db::pool::DbPool;
use rtaskmeter::http::{AppState, router};
use rtaskmeter::store::{AccountStore, ReadingsLog};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    let state = AppState::new(
        DbPool::in_memory().expect("in-memory db"),
        AccountStore::in_memory(),
        ReadingsLog::in_memory(1440),
    );
    router(Arc::new(state))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.expect("response");
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::get(uri).body(Body::empty()).expect("request");
    send(app, req).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    send(app, req).await
}

#[tokio::test]
async fn health_and_version_routes() {
    let app = app();

    assert_eq!(get(&app, "/healthz").await, (StatusCode::OK, json!("OK")));

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["acc_api"].as_str().expect("version").starts_with('v'));

    let (status, body) = get(&app, "/ver").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("acc version").is_some());
}

#[tokio::test]
async fn track_stop_and_times() {
    let app = app();

    let (status, body) = post(&app, "/track", json!({"user_id": 4})).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_i64().expect("task id");

    let (status, task) = post(&app, "/stop", json!({"id": id})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["id"], json!(id));
    assert_eq!(task["user_id"], json!(4));
    assert!(task["end_time"].is_string());

    let today = chrono::Local::now().date_naive().format("%Y-%m-%d");
    let (status, times) = get(&app, &format!("/times?user_id=4&date={today}")).await;
    assert_eq!(status, StatusCode::OK);
    let times = times.as_array().expect("array");
    assert_eq!(times.len(), 1);
    assert!(times[0]["time_spent"].as_f64().expect("seconds") >= 0.0);
}

#[tokio::test]
async fn unknown_task_is_404() {
    let app = app();

    let (status, body) = post(&app, "/stop", json!({"id": 777})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], json!("task_not_found"));
}

#[tokio::test]
async fn malformed_input_is_400() {
    let app = app();

    let (status, body) = get(&app, "/times?user_id=1&date=10-03-2025").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("invalid_date"));

    let (status, _) = get(&app, "/times?user_id=abc&date=2025-03-10").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post(&app, "/track", json!({"user": 1})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("invalid_input"));
}

#[tokio::test]
async fn account_updates_and_lookups() {
    let app = app();

    let (status, body) = post(
        &app,
        "/acc/api",
        json!({"user": "adi", "info": "i1", "hepek": "h1", "meter": {"kwh": 3.5}}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    post(&app, "/acc/api", json!({"user": "bo", "info": "i2", "hepek": "h2"})).await;
    // same hepek: overwrite in place
    post(&app, "/acc/api", json!({"user": "adi2", "info": "i1", "hepek": "h1"})).await;

    let (_, all) = get(&app, "/acc/getaccounts").await;
    let all = all.as_array().expect("array");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0]["user"], json!("adi2"));

    let (status, found) = get(&app, "/acc/gethepek/h2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["user"], json!("bo"));

    assert_eq!(get(&app, "/acc/getinfo/i1").await.1["hepek"], json!("h1"));
    assert_eq!(get(&app, "/acc/getuser/nobody").await, (StatusCode::OK, Value::Null));

    let (status, readings) = get(&app, "/acc/readings/i1/h1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(readings, json!([{"kwh": 3.5}]));
}

#[tokio::test]
async fn set_contracts_updates_all_accounts() {
    let app = app();
    post(&app, "/acc/api", json!({"user": "a", "info": "i1", "hepek": "h1"})).await;
    post(&app, "/acc/api", json!({"user": "b", "info": "i2", "hepek": "h2"})).await;

    let (status, body) = post(
        &app,
        "/acc/setcontracts",
        json!({"energy_contract_address": "0xe", "carbon_contract_address": "0xc"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let (_, all) = get(&app, "/acc/getaccounts").await;
    for a in all.as_array().expect("array") {
        assert_eq!(a["energy_contract_address"], json!("0xe"));
        assert_eq!(a["carbon_contract_address"], json!("0xc"));
        assert_eq!(a["ergon_contract_address"], Value::Null);
    }
}

#[tokio::test]
async fn readings_key_with_path_separator_is_rejected() {
    let app = app();

    let (status, body) = get(&app, "/acc/readings/..%2Fetc/h1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("invalid_key"));
}

#[tokio::test]
async fn rejected_readings_key_leaves_accounts_untouched() {
    let app = app();
    post(&app, "/acc/api", json!({"user": "a", "info": "i1", "hepek": "h1"})).await;

    let (status, body) = post(
        &app,
        "/acc/api",
        json!({"user": "b", "info": "site/1", "hepek": "h2", "meter": {"kwh": 1}}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("invalid_key"));

    let (_, all) = get(&app, "/acc/getaccounts").await;
    assert_eq!(all.as_array().expect("array").len(), 1);
    assert_eq!(all[0]["hepek"], json!("h1"));
    assert!(all[0].get("meter").is_none());
}

#[tokio::test]
async fn dots_inside_identifiers_are_accepted() {
    let app = app();

    let (status, _) = post(
        &app,
        "/acc/api",
        json!({"user": "a", "info": "v1..2", "hepek": "h1", "meter": {"kwh": 2}}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, readings) = get(&app, "/acc/readings/v1..2/h1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(readings, json!([{"kwh": 2}]));
}

#[tokio::test]
async fn set_contracts_null_clears_the_address() {
    let app = app();
    for (info, hepek) in [("i1", "h1"), ("i2", "h2")] {
        post(
            &app,
            "/acc/api",
            json!({"user": "u", "info": info, "hepek": hepek,
                   "energy_contract_address": "0xe", "carbon_contract_address": "0xc"}),
        )
        .await;
    }

    let (status, _) = post(&app, "/acc/setcontracts", json!({"energy_contract_address": null})).await;
    assert_eq!(status, StatusCode::OK);

    let (_, all) = get(&app, "/acc/getaccounts").await;
    for a in all.as_array().expect("array") {
        assert_eq!(a["energy_contract_address"], Value::Null);
        assert_eq!(a["carbon_contract_address"], json!("0xc"));
    }
}
