//! Store Gateway - access to the PSM settings table
//!
//! The store is a single table in an SQLite database file:
//! - psm_data(key INTEGER PRIMARY KEY, value)
//!
//! Two engines implement [`StoreGateway`]: the external `sqlite3` process
//! (statements fed on stdin) and an embedded SQLite library. Both run the
//! exact statements defined in [`schema`].

pub mod schema;
pub mod sqlite;
pub mod process;

pub use process::Sqlite3Process;
pub use sqlite::SqliteStore;

use crate::encode::HexBlob;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Operations on one database file. Each call is a single statement and
/// either fully succeeds or reports failure; nothing is retried.
pub trait StoreGateway {
    /// The backing database file
    fn db_path(&self) -> &Path;

    /// Verify the engine can run at all; returns its version string
    fn check_available(&self) -> Result<String>;

    /// Create the table if absent. Never touches existing rows.
    fn initialize(&self) -> Result<()>;

    /// Insert the record, replacing any previous value for `key`
    fn upsert(&self, key: i64, value: &HexBlob) -> Result<()>;

    /// Every stored record, ordered by key
    fn dump(&self) -> Result<Vec<StoredRecord>>;
}

/// A row read back from `psm_data`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub key: i64,
    pub value: HexBlob,
    /// SQLite storage class of the value (`blob`, `text`, `null`, ...)
    pub storage_type: String,
}

/// Which database engine backs the gateway
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// External `sqlite3` command-line shell
    #[default]
    #[value(name = "sqlite3")]
    Sqlite3,
    /// SQLite linked into this binary
    Embedded,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Sqlite3 => "sqlite3",
            EngineKind::Embedded => "embedded",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the gateway for `engine` over `db_path`.
///
/// `sqlite3_program` is only used by the process engine.
pub fn open_gateway(engine: EngineKind, sqlite3_program: &Path, db_path: &Path) -> Box<dyn StoreGateway> {
    match engine {
        EngineKind::Sqlite3 => Box::new(Sqlite3Process::new(sqlite3_program, db_path)),
        EngineKind::Embedded => Box::new(SqliteStore::new(db_path)),
    }
}
