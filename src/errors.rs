//! Unified application error type.
//! All modules (db, core, store, http, cli) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Input errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid account key: {0}")]
    InvalidKey(String),

    // ---------------------------
    // Lookup errors
    // ---------------------------
    #[error("Task {0} not found")]
    TaskNotFound(i64),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl AppError {
    /// True for errors caused by the caller's input rather than by storage.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::InvalidDate(_)
                | AppError::InvalidInput(_)
                | AppError::InvalidKey(_)
                | AppError::TaskNotFound(_)
        )
    }

    /// Short machine-readable code used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Io(_) => "io_error",
            AppError::Json(_) => "json_error",
            AppError::Yaml(_) => "yaml_error",
            AppError::Db(_) => "database_error",
            AppError::InvalidDate(_) => "invalid_date",
            AppError::InvalidTimestamp(_) => "invalid_timestamp",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::InvalidKey(_) => "invalid_key",
            AppError::TaskNotFound(_) => "task_not_found",
            AppError::Config(_) | AppError::ConfigLoad | AppError::ConfigSave => "config_error",
            AppError::Other(_) => "internal_error",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
