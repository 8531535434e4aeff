//! Unified application error type.
//! All modules (db, core, cli, export) return AppError so that the caller
//! (the CLI dispatcher) can turn every failure into one consistent message.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    // ---------------------------
    // Domain errors
    // ---------------------------
    /// Malformed or out-of-range input (non-positive quantity, empty name, ...).
    #[error("Validation error: {0}")]
    Validation(String),

    /// An invariant would be broken (second open timesheet, product still in use, ...).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A business rule or a permission check refused the operation.
    #[error("Not allowed: {0}")]
    Policy(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(what: &str, id: i64) -> Self {
        AppError::NotFound(format!("{what} #{id}"))
    }
}
