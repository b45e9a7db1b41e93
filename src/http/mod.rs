//! HTTP surface: task tracking at the root, metering under `/acc`.

pub mod accounts;
pub mod error;
pub mod tasks;

use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::store::{AccountStore, ReadingsLog};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler.
pub struct AppState {
    db: Mutex<DbPool>,
    pub accounts: AccountStore,
    pub readings: ReadingsLog,
}

impl AppState {
    pub fn new(pool: DbPool, accounts: AccountStore, readings: ReadingsLog) -> Self {
        Self {
            db: Mutex::new(pool),
            accounts,
            readings,
        }
    }

    /// Open the database (running migrations) and the file stores named by `cfg`.
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        let pool = DbPool::open_initialized(cfg.database_path())?;
        let accounts = AccountStore::open(cfg.accounts_path());
        let readings = ReadingsLog::open(cfg.readings_path(), cfg.readings_capacity);
        Ok(Self::new(pool, accounts, readings))
    }

    pub fn pool(&self) -> MutexGuard<'_, DbPool> {
        self.db.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Run blocking storage work off the async workers.
pub async fn run_blocking<T, F>(f: F) -> AppResult<T>
where
    F: FnOnce() -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Other(format!("storage worker failed: {e}")))?
}

fn version() -> String {
    format!("v{}", env!("CARGO_PKG_VERSION"))
}

async fn root() -> Json<Value> {
    Json(json!({ "acc_api": version() }))
}

async fn healthz() -> Json<&'static str> {
    Json("OK")
}

async fn ver() -> Json<Value> {
    Json(json!({ "acc version": version() }))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/ver", get(ver))
        .merge(tasks::get_router())
        .nest("/acc", accounts::get_router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(state: AppState, addr: SocketAddr) -> AppResult<()> {
    let app = router(Arc::new(state));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
