//! # psm-db - Platform Storage Manager database tool
//!
//! Seeds and inspects the key/value settings store an embedded device reads
//! at boot.
//!
//! psm-db provides:
//! - A fixed registry of symbolic PSM keys and a resolver for user input
//! - Hex blob encoding of literal values and file contents
//! - A store gateway over the `psm_data` table, backed either by the external
//!   `sqlite3` process or by an embedded SQLite library
//! - Write (upsert) and dump flows used by the `psm-db` binary

pub mod registry;
pub mod encode;
pub mod storage;
pub mod app;
pub mod config;
pub mod logging;
pub mod ui;

// Re-exports for convenient access
pub use registry::{KeyEntry, KeyRegistry, ResolvedKey, resolve_key};
pub use encode::{HexBlob, ValueSource};
pub use storage::{EngineKind, StoreGateway, StoredRecord};
pub use app::{WriteOutcome, WriteRequest};

use std::path::PathBuf;

/// Result type alias for psm-db operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for psm-db operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Usage error: {}", .0.join("; "))]
    Usage(Vec<String>),

    #[error("Invalid key: {0}")]
    KeyResolution(String),

    #[error("{what} not found: {}", .path.display())]
    FileNotFound { what: &'static str, path: PathBuf },

    #[error("Database engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Failed to {operation} the database{}", status_suffix(.status))]
    EngineExecution {
        operation: &'static str,
        status: Option<i32>,
    },

    #[error("Unexpected engine output: {0}")]
    UnexpectedOutput(String),

    #[error("Invalid hex blob: {0}")]
    InvalidBlob(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

fn status_suffix(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!(", return code: {code}"),
        None => ", engine terminated by signal".to_string(),
    }
}
