//! Embedded SQLite storage implementation

use std::path::{Path, PathBuf};
use rusqlite::{Connection, OpenFlags};
use tracing::debug;
use crate::encode::HexBlob;
use crate::{Error, Result};
use super::{schema, StoreGateway, StoredRecord};

/// Gateway running statements through the linked SQLite library
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open for writing (creates the file if it doesn't exist)
    fn open_rw(&self) -> Result<Connection> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE;
        Ok(Connection::open_with_flags(&self.path, flags)?)
    }

    fn open_ro(&self) -> Result<Connection> {
        Ok(Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY)?)
    }

    /// Helper to read the columns of a dump row
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<(i64, String, String)> {
        Ok((row.get(0)?, row.get(1)?, row.get(2)?))
    }
}

impl StoreGateway for SqliteStore {
    fn db_path(&self) -> &Path {
        &self.path
    }

    fn check_available(&self) -> Result<String> {
        let version = rusqlite::version().to_string();
        debug!("embedded sqlite version: {}", version);
        Ok(version)
    }

    fn initialize(&self) -> Result<()> {
        debug!("input_text: {}", schema::CREATE_PSM_DATA_TABLE);
        self.open_rw()?.execute(schema::CREATE_PSM_DATA_TABLE, [])?;
        Ok(())
    }

    fn upsert(&self, key: i64, value: &HexBlob) -> Result<()> {
        let statement = schema::upsert_statement(key, value);
        debug!("input_text: {}", statement);
        self.open_rw()?.execute(&statement, [])?;
        Ok(())
    }

    fn dump(&self) -> Result<Vec<StoredRecord>> {
        debug!("input_text: {}", schema::SELECT_ALL_RECORDS);
        let conn = self.open_ro()?;
        let mut stmt = conn.prepare(schema::SELECT_ALL_RECORDS)?;
        let rows = stmt
            .query_map([], Self::row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(key, value, storage_type)| {
                let value = HexBlob::parse(&value)
                    .map_err(|e| Error::UnexpectedOutput(format!("key {key}: {e}")))?;
                Ok(StoredRecord { key, value, storage_type })
            })
            .collect()
    }
}
